use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BoardId, LabelId};
use crate::errors::Result;
use crate::validation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub id: LabelId,
    pub name: String,
    /// Always `#RRGGBB`, uppercase.
    pub color: String,
    pub board_id: BoardId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLabel {
    pub name: String,
    pub color: String,
    pub board_id: BoardId,
}

/// A named, colored tag scoped to one board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Label {
    state: LabelRecord,
}

impl Label {
    pub fn create(id: LabelId, input: NewLabel, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            state: LabelRecord {
                id,
                name: validation::label_name(&input.name)?,
                color: validation::hex_color(&input.color)?,
                board_id: input.board_id,
                created_at: now,
            },
        })
    }

    pub fn restore(state: LabelRecord) -> Self {
        Self { state }
    }

    pub fn id(&self) -> LabelId {
        self.state.id
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn color(&self) -> &str {
        &self.state.color
    }

    pub fn board_id(&self) -> BoardId {
        self.state.board_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at
    }

    pub fn record(&self) -> &LabelRecord {
        &self.state
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        self.state.name = validation::label_name(name)?;
        Ok(())
    }

    pub fn recolor(&mut self, color: &str) -> Result<()> {
        self.state.color = validation::hex_color(color)?;
        Ok(())
    }
}
