//! Label use cases, including attaching labels to cards.

use domains::audit::ChangeSet;
use domains::{
    ActivityAction, BoardId, CardId, DomainError, EntityType, Label, LabelId, NewActivity,
    NewLabel, Result, UserId,
};
use serde_json::json;

use crate::audit::AuditRecorder;
use crate::context::Ports;
use crate::resolve::{CardScope, Intent, LabelScope, Resolver};

#[derive(Debug, Clone)]
pub struct CreateLabel {
    pub actor_id: UserId,
    pub board_id: BoardId,
    pub name: String,
    /// `#RRGGBB`, any case.
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct UpdateLabel {
    pub actor_id: UserId,
    pub label_id: LabelId,
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct LabelRef {
    pub actor_id: UserId,
    pub label_id: LabelId,
}

#[derive(Debug, Clone, Copy)]
pub struct CardLabel {
    pub actor_id: UserId,
    pub card_id: CardId,
    pub label_id: LabelId,
}

#[derive(Clone)]
pub struct LabelService {
    ports: Ports,
    audit: AuditRecorder,
}

impl LabelService {
    pub fn new(ports: Ports, audit: AuditRecorder) -> Self {
        Self { ports, audit }
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id))]
    pub async fn create(&self, req: CreateLabel) -> Result<Label> {
        let scope = Resolver::new(&self.ports)
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        let label = Label::create(
            LabelId::from(self.ports.ids.next_id()),
            NewLabel {
                name: req.name,
                color: req.color,
                board_id: scope.board.id(),
            },
            self.ports.clock.now(),
        )?;
        self.ports.labels.save(&label).await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Create,
                    EntityType::Label,
                    label.id(),
                    label.name(),
                    scope.actor.id(),
                    scope.board.id(),
                )
                .with_data(json!({ "color": label.color() }))
                .with_description(format!("created label {}", label.name())),
            )
            .await?;

        Ok(label)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_for_board(&self, actor_id: UserId, board_id: BoardId) -> Result<Vec<Label>> {
        let scope = Resolver::new(&self.ports)
            .board_scope(actor_id, board_id, Intent::Read)
            .await?;
        scope.access().ensure_view()?;
        Ok(self.ports.labels.find_by_board(board_id).await?)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, label = %req.label_id))]
    pub async fn update(&self, req: UpdateLabel) -> Result<Label> {
        let LabelScope { label, scope } = Resolver::new(&self.ports)
            .label_scope(req.actor_id, req.label_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        let mut label = label;
        let mut changes = ChangeSet::new();
        if let Some(name) = req.name {
            let before = label.name().to_string();
            label.rename(&name)?;
            changes.track("name", "name", before.as_str(), label.name());
        }
        if let Some(color) = req.color {
            let before = label.color().to_string();
            label.recolor(&color)?;
            changes.track("color", "color", before.as_str(), label.color());
        }

        if changes.is_empty() {
            return Ok(label);
        }

        self.ports.labels.save(&label).await?;
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Update,
                    EntityType::Label,
                    label.id(),
                    label.name(),
                    scope.actor.id(),
                    scope.board.id(),
                )
                .with_changes(&changes),
            )
            .await?;

        Ok(label)
    }

    /// Records the activity first; the label is only deleted once that succeeded.
    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, label = %req.label_id))]
    pub async fn delete(&self, req: LabelRef) -> Result<()> {
        let LabelScope { label, scope } = Resolver::new(&self.ports)
            .label_scope(req.actor_id, req.label_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Delete,
                    EntityType::Label,
                    label.id(),
                    label.name(),
                    scope.actor.id(),
                    scope.board.id(),
                )
                .with_data(json!({ "name": label.name(), "color": label.color() }))
                .with_description(format!("deleted label {}", label.name())),
            )
            .await?;

        self.ports.labels.delete(label.id()).await?;
        Ok(())
    }

    /// User → Card → List → Board → role, then the label.
    async fn card_and_label(&self, req: CardLabel) -> Result<(CardScope, Label)> {
        let resolver = Resolver::new(&self.ports);
        let scoped = resolver
            .card_scope(req.actor_id, req.card_id, Intent::Mutate)
            .await?;
        scoped.scope.access().ensure_edit()?;

        let label = resolver.label(req.label_id).await?;
        if label.board_id() != scoped.scope.board.id() {
            return Err(DomainError::validation(
                "Label does not belong to this board",
            ));
        }
        Ok((scoped, label))
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, card = %req.card_id, label = %req.label_id))]
    pub async fn attach(&self, req: CardLabel) -> Result<Vec<Label>> {
        let (scoped, label) = self.card_and_label(req).await?;
        let card = &scoped.card;

        if self.ports.labels.card_label_ids(card.id()).await?.contains(&label.id()) {
            return Err(DomainError::already_in_state(
                "Label is already attached to this card",
            ));
        }
        self.ports.labels.attach(card.id(), label.id()).await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::AttachLabel,
                    EntityType::Card,
                    card.id(),
                    card.title(),
                    scoped.scope.actor.id(),
                    scoped.scope.board.id(),
                )
                .with_card(card.id())
                .with_data(json!({ "label": label.name() }))
                .with_description(format!("added label {} to {}", label.name(), card.title())),
            )
            .await?;

        Ok(self.ports.labels.find_by_card(card.id()).await?)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, card = %req.card_id, label = %req.label_id))]
    pub async fn detach(&self, req: CardLabel) -> Result<Vec<Label>> {
        let (scoped, label) = self.card_and_label(req).await?;
        let card = &scoped.card;

        if !self.ports.labels.card_label_ids(card.id()).await?.contains(&label.id()) {
            return Err(DomainError::already_in_state(
                "Label is not attached to this card",
            ));
        }
        self.ports.labels.detach(card.id(), label.id()).await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::DetachLabel,
                    EntityType::Card,
                    card.id(),
                    card.title(),
                    scoped.scope.actor.id(),
                    scoped.scope.board.id(),
                )
                .with_card(card.id())
                .with_data(json!({ "label": label.name() }))
                .with_description(format!(
                    "removed label {} from {}",
                    label.name(),
                    card.title()
                )),
            )
            .await?;

        Ok(self.ports.labels.find_by_card(card.id()).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_for_card(&self, actor_id: UserId, card_id: CardId) -> Result<Vec<Label>> {
        let scoped = Resolver::new(&self.ports)
            .card_scope(actor_id, card_id, Intent::Read)
            .await?;
        scoped.scope.access().ensure_view()?;
        Ok(self.ports.labels.find_by_card(card_id).await?)
    }
}
