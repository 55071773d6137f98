//! Card use cases.
//!
//! A card moves through `Active ⇄ Archived` and carries independent
//! attributes (assignee, dates, cover, position, list). `update` may touch
//! several attributes at once but always yields a single activity.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use domains::audit::ChangeSet;
use domains::ordering::{self, PositionAllocator, PositionUpdate};
use domains::{
    validation, ActivityAction, Board, Card, CardId, DomainError, EntityType, List, ListId,
    NewActivity, NewCard, Result, UserId,
};
use serde_json::json;

use crate::audit::AuditRecorder;
use crate::context::Ports;
use crate::resolve::{CardScope, Intent, Resolver};

#[derive(Debug, Clone)]
pub struct CreateCard {
    pub actor_id: UserId,
    pub list_id: ListId,
    pub title: String,
    pub description: Option<String>,
    /// Appended after the last card when absent.
    pub position: Option<f64>,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub assignee_id: Option<UserId>,
}

/// `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone)]
pub struct UpdateCard {
    pub actor_id: UserId,
    pub card_id: CardId,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub assignee_id: Option<Option<UserId>>,
    pub cover_url: Option<Option<String>>,
}

impl UpdateCard {
    pub fn new(actor_id: UserId, card_id: CardId) -> Self {
        Self {
            actor_id,
            card_id,
            title: None,
            description: None,
            due_date: None,
            start_date: None,
            assignee_id: None,
            cover_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MoveCard {
    pub actor_id: UserId,
    pub card_id: CardId,
    pub list_id: ListId,
    /// Appended after the destination's last card when absent.
    pub position: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ReorderCards {
    pub actor_id: UserId,
    pub list_id: ListId,
    pub positions: Vec<PositionUpdate<CardId>>,
}

#[derive(Debug, Clone, Copy)]
pub struct CardRef {
    pub actor_id: UserId,
    pub card_id: CardId,
}

#[derive(Clone)]
pub struct CardService {
    ports: Ports,
    audit: AuditRecorder,
    positions: PositionAllocator,
}

fn ensure_date_order(
    start: Option<DateTime<Utc>>,
    due: Option<DateTime<Utc>>,
) -> Result<()> {
    if let (Some(start), Some(due)) = (start, due) {
        if start > due {
            return Err(DomainError::validation(
                "Start date cannot be after due date",
            ));
        }
    }
    Ok(())
}

fn sort_by_position(cards: &mut [Card]) {
    cards.sort_by(|a, b| a.position().total_cmp(&b.position()));
}

impl CardService {
    pub fn new(ports: Ports, audit: AuditRecorder, positions: PositionAllocator) -> Self {
        Self {
            ports,
            audit,
            positions,
        }
    }

    /// Assignees must exist and belong to the card's board.
    async fn ensure_assignable(&self, board: &Board, user_id: UserId) -> Result<()> {
        let user = Resolver::new(&self.ports).user(user_id).await?;
        if board.is_owner(user.id())
            || self.ports.boards.is_member(board.id(), user.id()).await?
        {
            return Ok(());
        }
        Err(DomainError::validation(
            "Assignee must be a member of this board",
        ))
    }

    /// Positions of the other cards in `list_id`.
    async fn sibling_positions(
        &self,
        list_id: ListId,
        except: Option<CardId>,
    ) -> Result<Vec<f64>> {
        Ok(self
            .ports
            .cards
            .find_by_list(list_id)
            .await?
            .iter()
            .filter(|c| Some(c.id()) != except)
            .map(Card::position)
            .collect())
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, list = %req.list_id))]
    pub async fn create(&self, req: CreateCard) -> Result<Card> {
        let scoped = Resolver::new(&self.ports)
            .list_scope(req.actor_id, req.list_id, Intent::Mutate)
            .await?;
        scoped.scope.access().ensure_edit()?;

        let title = validation::title("Title", &req.title)?;
        ensure_date_order(req.start_date, req.due_date)?;
        if let Some(assignee) = req.assignee_id {
            self.ensure_assignable(&scoped.scope.board, assignee).await?;
        }

        let list = &scoped.list;
        let siblings = self.sibling_positions(list.id(), None).await?;
        let position = match req.position {
            Some(p) => {
                ordering::ensure_position_free(p, siblings, format!("list {}", list.id()))?
            }
            None => self.positions.next(siblings),
        };

        let card = Card::create(
            CardId::from(self.ports.ids.next_id()),
            NewCard {
                title,
                description: req.description,
                position,
                due_date: req.due_date,
                start_date: req.start_date,
                list_id: list.id(),
                creator_id: scoped.scope.actor.id(),
                assignee_id: req.assignee_id,
            },
            self.ports.clock.now(),
        )?;
        self.ports.cards.save(&card).await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Create,
                    EntityType::Card,
                    card.id(),
                    card.title(),
                    scoped.scope.actor.id(),
                    list.board_id(),
                )
                .with_card(card.id())
                .with_data(json!({ "list": list.title() }))
                .with_description(format!("added card {} to {}", card.title(), list.title())),
            )
            .await?;

        Ok(card)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, card = %req.card_id))]
    pub async fn get(&self, req: CardRef) -> Result<Card> {
        let scoped = Resolver::new(&self.ports)
            .card_scope(req.actor_id, req.card_id, Intent::Read)
            .await?;
        scoped.scope.access().ensure_view()?;
        Ok(scoped.card)
    }

    /// Cards of a list ordered by position.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_list(
        &self,
        actor_id: UserId,
        list_id: ListId,
        include_archived: bool,
    ) -> Result<Vec<Card>> {
        let scoped = Resolver::new(&self.ports)
            .list_scope(actor_id, list_id, Intent::Read)
            .await?;
        scoped.scope.access().ensure_view()?;

        let mut cards: Vec<Card> = self
            .ports
            .cards
            .find_by_list(list_id)
            .await?
            .into_iter()
            .filter(|c| include_archived || !c.is_archived())
            .collect();
        sort_by_position(&mut cards);
        Ok(cards)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, card = %req.card_id))]
    pub async fn update(&self, req: UpdateCard) -> Result<Card> {
        let CardScope { card, list, scope } = Resolver::new(&self.ports)
            .card_scope(req.actor_id, req.card_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        let mut card = card;
        let mut changes = ChangeSet::new();

        if let Some(title) = req.title {
            let title = validation::title("Title", &title)?;
            let before = card.title().to_string();
            card.rename(title);
            changes.track("title", "title", before.as_str(), card.title());
        }
        if let Some(description) = req.description {
            let before = card.description().map(str::to_string);
            card.set_description(description);
            let after = card.description().map(str::to_string);
            changes.track("description", "description", &before, &after);
        }
        if let Some(due_date) = req.due_date {
            let before = card.due_date();
            card.set_due_date(due_date);
            changes.track("due_date", "due date", &before, &card.due_date());
        }
        if let Some(start_date) = req.start_date {
            let before = card.start_date();
            card.set_start_date(start_date);
            changes.track("start_date", "start date", &before, &card.start_date());
        }
        if let Some(assignee) = req.assignee_id {
            let before = card.assignee_id();
            match assignee {
                Some(user_id) if before != Some(user_id) => {
                    self.ensure_assignable(&scope.board, user_id).await?;
                    card.assign(user_id);
                }
                Some(_) => {}
                None => card.unassign(),
            }
            changes.track("assignee_id", "assignee", &before, &card.assignee_id());
        }
        if let Some(cover_url) = req.cover_url {
            let before = card.cover_url().map(str::to_string);
            card.set_cover(cover_url);
            let after = card.cover_url().map(str::to_string);
            changes.track("cover_url", "cover", &before, &after);
        }

        if changes.is_empty() {
            tracing::debug!("card update changed nothing");
            return Ok(card);
        }
        if changes.contains("due_date") || changes.contains("start_date") {
            ensure_date_order(card.start_date(), card.due_date())?;
        }

        card.touch(self.ports.clock.now());
        self.ports.cards.save(&card).await?;
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Update,
                    EntityType::Card,
                    card.id(),
                    card.title(),
                    scope.actor.id(),
                    list.board_id(),
                )
                .with_card(card.id())
                .with_changes(&changes),
            )
            .await?;

        Ok(card)
    }

    /// Moves a card to another list (or another slot of its own list) on the
    /// same board.
    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, card = %req.card_id, target = %req.list_id))]
    pub async fn move_card(&self, req: MoveCard) -> Result<Card> {
        let resolver = Resolver::new(&self.ports);
        let CardScope {
            card,
            list: source,
            scope,
        } = resolver
            .card_scope(req.actor_id, req.card_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        let target: List = if req.list_id == source.id() {
            source.clone()
        } else {
            resolver.list(req.list_id).await?
        };
        if target.board_id() != source.board_id() {
            tracing::warn!(
                source_board = %source.board_id(),
                target_board = %target.board_id(),
                "rejected cross-board move"
            );
            return Err(DomainError::validation(
                "Cannot move card between different boards",
            ));
        }

        let siblings = self.sibling_positions(target.id(), Some(card.id())).await?;
        let position = match req.position {
            Some(p) if target.id() == source.id() && p == card.position() => p,
            Some(p) => {
                ordering::ensure_position_free(p, siblings, format!("list {}", target.id()))?
            }
            None => self.positions.next(siblings),
        };

        let mut card = card;
        let mut changes = ChangeSet::new();
        let (from_list, from_position) = (card.list_id(), card.position());
        card.move_to(target.id(), position)?;
        changes.track("list_id", "list", &from_list, &card.list_id());
        changes.track("position", "position", &from_position, &card.position());

        if changes.is_empty() {
            return Ok(card);
        }

        card.touch(self.ports.clock.now());
        self.ports.cards.save(&card).await?;

        let description = if source.id() == target.id() {
            format!("moved card {} within {}", card.title(), target.title())
        } else {
            format!(
                "moved card {} from {} to {}",
                card.title(),
                source.title(),
                target.title()
            )
        };
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Move,
                    EntityType::Card,
                    card.id(),
                    card.title(),
                    scope.actor.id(),
                    target.board_id(),
                )
                .with_card(card.id())
                .with_data(changes.to_data())
                .with_description(description),
            )
            .await?;

        Ok(card)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, list = %req.list_id, count = req.positions.len()))]
    pub async fn reorder(&self, req: ReorderCards) -> Result<Vec<Card>> {
        let scoped = Resolver::new(&self.ports)
            .list_scope(req.actor_id, req.list_id, Intent::Mutate)
            .await?;
        scoped.scope.access().ensure_edit()?;

        let list = &scoped.list;
        let mut current = self.ports.cards.find_by_list(list.id()).await?;
        let children: HashSet<CardId> = current.iter().map(Card::id).collect();
        ordering::validate_reorder(
            &req.positions,
            &children,
            "Card",
            format!("list {}", list.id()),
        )?;
        ordering::ensure_batch_fits(
            &req.positions,
            current.iter().map(|c| (c.id(), c.position())),
            format!("list {}", list.id()),
        )?;

        if req.positions.is_empty() {
            sort_by_position(&mut current);
            return Ok(current);
        }

        self.ports
            .cards
            .reorder(list.id(), req.positions.clone())
            .await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Reorder,
                    EntityType::List,
                    list.id(),
                    list.title(),
                    scoped.scope.actor.id(),
                    list.board_id(),
                )
                .with_data(json!({ "positions": req.positions }))
                .with_description(format!(
                    "reordered {} cards in {}",
                    req.positions.len(),
                    list.title()
                )),
            )
            .await?;

        let mut cards = self.ports.cards.find_by_list(list.id()).await?;
        sort_by_position(&mut cards);
        Ok(cards)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, card = %req.card_id))]
    pub async fn archive(&self, req: CardRef) -> Result<Card> {
        self.set_archived(req, true).await
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, card = %req.card_id))]
    pub async fn unarchive(&self, req: CardRef) -> Result<Card> {
        self.set_archived(req, false).await
    }

    async fn set_archived(&self, req: CardRef, archived: bool) -> Result<Card> {
        let CardScope { card, list, scope } = Resolver::new(&self.ports)
            .card_scope(req.actor_id, req.card_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        let mut card = card;
        let (action, verb) = if archived {
            card.archive()?;
            (ActivityAction::Archive, "archived")
        } else {
            card.unarchive()?;
            (ActivityAction::Unarchive, "restored")
        };
        card.touch(self.ports.clock.now());
        self.ports.cards.save(&card).await?;

        self.audit
            .record(
                NewActivity::new(
                    action,
                    EntityType::Card,
                    card.id(),
                    card.title(),
                    scope.actor.id(),
                    list.board_id(),
                )
                .with_card(card.id())
                .with_description(format!("{verb} card {}", card.title())),
            )
            .await?;

        Ok(card)
    }

    /// Records the activity first; the card is only deleted once that succeeded.
    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, card = %req.card_id))]
    pub async fn delete(&self, req: CardRef) -> Result<()> {
        let CardScope { card, list, scope } = Resolver::new(&self.ports)
            .card_scope(req.actor_id, req.card_id, Intent::Mutate)
            .await?;
        scope.access().ensure_delete_card(&card)?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Delete,
                    EntityType::Card,
                    card.id(),
                    card.title(),
                    scope.actor.id(),
                    list.board_id(),
                )
                .with_card(card.id())
                .with_data(json!({ "title": card.title(), "list": list.title() }))
                .with_description(format!("deleted card {} from {}", card.title(), list.title())),
            )
            .await?;

        self.ports.cards.delete(card.id()).await?;
        Ok(())
    }
}
