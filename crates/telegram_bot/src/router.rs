//! Screen router.
//!
//! [`transition`] is a pure function from the current conversation state and
//! an inbound event to the next state plus one effect. [`Router::dispatch`]
//! runs the effect against the ledger while holding the owner's state lock,
//! and commits the next state only when the effect succeeded. Back and
//! cancel events are the exception: they always end the active flow.

use chrono::{Timelike, Utc};
use chrono_tz::Tz;
use engine::{
    Amount, EngineError, FieldValue, FilterIntent, Ledger, TransactionKind, fields,
};

use crate::{
    callbacks::{Action, FilterChoice},
    commands::Command,
    state::{ConversationState, SessionStore},
    ui::{self, Screen},
};

pub(crate) const DEFAULT_LIST_LIMIT: usize = 50;

/// An inbound event, already attributed to one owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Command(Command),
    /// Text typed by the user. Non-text messages arrive as an empty string.
    FreeText(String),
    Button(Action),
}

impl Event {
    /// Back navigation and cancel commands end the active flow even when the
    /// screen they lead to cannot be loaded.
    fn cancels_flow(&self) -> bool {
        matches!(
            self,
            Event::Command(Command::Start | Command::Cancel)
                | Event::Button(
                    Action::BackToMenu | Action::BackToView | Action::BackToTransaction(_)
                )
        )
    }
}

/// The single side effect of an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    Render(Screen),
    Insert {
        kind: TransactionKind,
        amount: Amount,
        category: String,
    },
    List(FilterIntent),
    Show(i64),
    Update {
        id: i64,
        value: FieldValue,
    },
    Delete(i64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Transition {
    pub next: ConversationState,
    pub effect: Effect,
}

impl Transition {
    fn to(next: ConversationState, effect: Effect) -> Self {
        Self { next, effect }
    }

    fn idle(effect: Effect) -> Self {
        Self::to(ConversationState::Idle, effect)
    }

    /// Keeps `state` as is and answers with `screen`.
    fn stay(state: &ConversationState, screen: Screen) -> Self {
        Self::to(state.clone(), Effect::Render(screen))
    }
}

pub(crate) fn transition(state: &ConversationState, event: &Event) -> Transition {
    match event {
        Event::Command(Command::Start) => Transition::idle(Effect::Render(ui::welcome())),
        Event::Command(Command::Cancel) => Transition::idle(Effect::Render(ui::home())),
        Event::Command(Command::Help) => Transition::stay(state, ui::help()),
        Event::Button(action) => on_button(*action),
        Event::FreeText(text) => on_text(state, text),
    }
}

/// Buttons never depend on the previous state: flow-entry buttons replace
/// whatever flow was active, every other button leaves the owner idle.
fn on_button(action: Action) -> Transition {
    match action {
        Action::Record(kind) => Transition::to(
            ConversationState::AwaitingAmount { kind },
            Effect::Render(ui::ask_amount(kind)),
        ),
        Action::View | Action::BackToView => Transition::idle(Effect::Render(ui::filter_menu())),
        Action::Filter(FilterChoice::Value(filter)) => Transition::to(
            ConversationState::AwaitingFilterValue { filter },
            Effect::Render(ui::ask_filter_value(filter)),
        ),
        Action::Filter(FilterChoice::Kind(kind)) => {
            Transition::idle(Effect::List(FilterIntent::Kind(kind)))
        }
        Action::Filter(FilterChoice::All) => Transition::idle(Effect::List(FilterIntent::None)),
        Action::Show(id) | Action::BackToTransaction(id) => Transition::idle(Effect::Show(id)),
        Action::Edit(id) => Transition::idle(Effect::Render(ui::edit_menu(id))),
        Action::EditField { field, id } => Transition::to(
            ConversationState::AwaitingEditValue { id, field },
            Effect::Render(ui::ask_field_value(field)),
        ),
        Action::Delete(id) => Transition::idle(Effect::Render(ui::confirm_delete(id))),
        Action::ConfirmDelete(id) => Transition::idle(Effect::Delete(id)),
        Action::BackToMenu => Transition::idle(Effect::Render(ui::home())),
    }
}

fn on_text(state: &ConversationState, text: &str) -> Transition {
    match state {
        ConversationState::Idle => Transition::stay(state, ui::use_the_buttons()),
        ConversationState::AwaitingAmount { kind } => match Amount::parse_positive(text) {
            Ok(amount) => Transition::to(
                ConversationState::AwaitingCategory {
                    kind: *kind,
                    amount,
                },
                Effect::Render(ui::ask_category()),
            ),
            Err(_) => Transition::stay(state, ui::retry_amount()),
        },
        ConversationState::AwaitingCategory { kind, amount } => {
            match fields::normalize_category(text) {
                Ok(category) => Transition::idle(Effect::Insert {
                    kind: *kind,
                    amount: *amount,
                    category,
                }),
                Err(_) => Transition::stay(state, ui::retry_category()),
            }
        }
        ConversationState::AwaitingFilterValue { filter } => match filter.parse_value(text) {
            Ok(intent) => Transition::idle(Effect::List(intent)),
            Err(_) => Transition::stay(state, ui::retry_filter_value(*filter)),
        },
        ConversationState::AwaitingEditValue { id, field } => {
            match FieldValue::parse(*field, text) {
                Ok(value) => Transition::idle(Effect::Update { id: *id, value }),
                Err(_) => Transition::stay(state, ui::retry_field_value(*field)),
            }
        }
    }
}

/// Routes events of every owner to the ledger and back to screens.
#[derive(Clone)]
pub(crate) struct Router {
    ledger: Ledger,
    sessions: SessionStore,
    timezone: Tz,
    list_limit: usize,
}

impl Router {
    pub(crate) fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            sessions: SessionStore::default(),
            timezone: Tz::UTC,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub(crate) fn timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub(crate) fn list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit.max(1);
        self
    }

    /// Handles one event of `owner` and returns the screen to render.
    ///
    /// Errors never escape: input errors re-prompt, missing records reset the
    /// owner to idle, storage failures keep the state so the user can retry.
    /// Back and cancel events leave the owner idle whatever the outcome.
    pub(crate) async fn dispatch(&self, owner: &str, event: Event) -> Screen {
        let screen = self.step(owner, event).await;
        self.sessions.release(owner).await;
        screen
    }

    async fn step(&self, owner: &str, event: Event) -> Screen {
        let mut state = self.sessions.lock(owner).await;
        let Transition { next, effect } = transition(&state, &event);
        tracing::debug!(owner, from = ?*state, to = ?next, "routing event");

        if event.cancels_flow() {
            *state = ConversationState::Idle;
        }

        match self.execute(owner, effect).await {
            Ok(screen) => {
                *state = next;
                screen
            }
            Err(EngineError::NotFound(what)) => {
                tracing::debug!(owner, "{what} not found");
                *state = ConversationState::Idle;
                ui::not_found()
            }
            Err(err) if err.is_validation() => ui::rejected(&err.to_string()),
            Err(err) => {
                tracing::error!(owner, "storage failure: {err}");
                ui::storage_failure()
            }
        }
    }

    async fn execute(&self, owner: &str, effect: Effect) -> Result<Screen, EngineError> {
        match effect {
            Effect::Render(screen) => Ok(screen),
            Effect::Insert {
                kind,
                amount,
                category,
            } => {
                let now = Utc::now().with_timezone(&self.timezone).naive_local();
                let now = now.with_nanosecond(0).unwrap_or(now);
                let id = self
                    .ledger
                    .insert(owner, kind, amount, &category, now)
                    .await?;
                tracing::info!(owner, id, "transaction recorded");
                Ok(ui::saved(kind, amount, &category))
            }
            Effect::List(filter) => {
                let limit = u64::try_from(self.list_limit)
                    .unwrap_or(u64::MAX)
                    .saturating_add(1);
                let rows = self
                    .ledger
                    .list_latest(owner, &filter, Some(limit))
                    .await?;
                Ok(ui::list(&rows, self.list_limit))
            }
            Effect::Show(id) => {
                let tx = self.ledger.get(owner, id).await?;
                Ok(ui::detail(&tx))
            }
            Effect::Update { id, value } => {
                let field = value.field();
                let tx = self.ledger.update(owner, id, value).await?;
                tracing::info!(owner, id, field = field.as_str(), "transaction updated");
                Ok(ui::updated(&tx))
            }
            Effect::Delete(id) => {
                self.ledger.delete(owner, id).await?;
                tracing::info!(owner, id, "transaction deleted");
                Ok(ui::deleted())
            }
        }
    }

    #[cfg(test)]
    async fn state_of(&self, owner: &str) -> ConversationState {
        self.sessions.get(owner).await
    }
}
