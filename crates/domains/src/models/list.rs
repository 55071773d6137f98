use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BoardId, ListId};
use crate::errors::Result;
use crate::validation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: ListId,
    pub title: String,
    /// Sort key within the board, ascending. Unique among siblings
    pub position: f64,
    /// Free-form display color
    pub color: Option<String>,
    pub board_id: BoardId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewList {
    pub title: String,
    pub position: f64,
    pub color: Option<String>,
    pub board_id: BoardId,
}

/// A column of cards on a board, ordered among its siblings by `position`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct List {
    state: ListRecord,
}

impl List {
    pub fn create(id: ListId, input: NewList, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            state: ListRecord {
                id,
                title: validation::title("Title", &input.title)?,
                position: validation::position(input.position)?,
                color: validation::optional_text(input.color),
                board_id: input.board_id,
                created_at: now,
                updated_at: now,
            },
        })
    }

    pub fn restore(state: ListRecord) -> Self {
        Self { state }
    }

    pub fn id(&self) -> ListId {
        self.state.id
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn color(&self) -> Option<&str> {
        self.state.color.as_deref()
    }

    pub fn board_id(&self) -> BoardId {
        self.state.board_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.updated_at
    }

    pub fn record(&self) -> &ListRecord {
        &self.state
    }

    pub fn rename(&mut self, title: &str) -> Result<()> {
        self.state.title = validation::title("Title", title)?;
        Ok(())
    }

    pub fn recolor(&mut self, color: Option<String>) {
        self.state.color = validation::optional_text(color);
    }

    pub fn reposition(&mut self, position: f64) -> Result<()> {
        self.state.position = validation::position(position)?;
        Ok(())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.state.updated_at = now;
    }
}
