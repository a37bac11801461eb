use std::{collections::HashMap, sync::Arc};

use engine::{Amount, FilterType, RecordField, TransactionKind};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// What an owner is in the middle of doing.
///
/// Each variant carries exactly the data collected so far for its flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum ConversationState {
    #[default]
    Idle,
    AwaitingAmount {
        kind: TransactionKind,
    },
    AwaitingCategory {
        kind: TransactionKind,
        amount: Amount,
    },
    AwaitingFilterValue {
        filter: FilterType,
    },
    AwaitingEditValue {
        id: i64,
        field: RecordField,
    },
}

/// In-memory conversation states keyed by owner.
///
/// Each owner gets its own lock, so a read-modify-write of one owner's state
/// never waits on another owner.
#[derive(Clone, Default)]
pub(crate) struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<ConversationState>>>>>,
}

impl SessionStore {
    /// Locks the state of `owner`, creating it as `Idle` on first use.
    ///
    /// Hold the guard for the whole event so two updates of the same owner
    /// cannot interleave.
    pub(crate) async fn lock(&self, owner: &str) -> OwnedMutexGuard<ConversationState> {
        let slot = {
            let mut guard = self.inner.lock().await;
            guard.entry(owner.to_string()).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// Forgets `owner` once it is idle and no event holds or awaits its lock.
    ///
    /// New lock holders clone the slot under the map lock, so a strong count
    /// of one means nobody else can be using it.
    pub(crate) async fn release(&self, owner: &str) {
        let mut map = self.inner.lock().await;
        let idle = map.get(owner).is_some_and(|slot| {
            Arc::strong_count(slot) == 1
                && slot
                    .try_lock()
                    .is_ok_and(|state| *state == ConversationState::Idle)
        });
        if idle {
            map.remove(owner);
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn get(&self, owner: &str) -> ConversationState {
        self.lock(owner).await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn states_start_idle_and_are_per_owner() {
        let store = SessionStore::default();
        *store.lock("alice").await = ConversationState::AwaitingAmount {
            kind: TransactionKind::Income,
        };

        assert_eq!(store.get("bob").await, ConversationState::Idle);
        assert_eq!(
            store.get("alice").await,
            ConversationState::AwaitingAmount {
                kind: TransactionKind::Income
            }
        );
    }

    #[tokio::test]
    async fn same_owner_updates_are_serialized() {
        let store = SessionStore::default();
        let guard = store.lock("alice").await;

        let contender = {
            let store = store.clone();
            tokio::spawn(async move {
                let mut state = store.lock("alice").await;
                *state = ConversationState::AwaitingFilterValue {
                    filter: FilterType::Year,
                };
            })
        };

        // Another owner is not blocked by alice's lock.
        assert_eq!(store.get("bob").await, ConversationState::Idle);

        drop(guard);
        contender.await.unwrap();
        assert_eq!(
            store.get("alice").await,
            ConversationState::AwaitingFilterValue {
                filter: FilterType::Year
            }
        );
    }

    #[tokio::test]
    async fn release_drops_only_idle_unused_owners() {
        let store = SessionStore::default();
        *store.lock("alice").await = ConversationState::AwaitingAmount {
            kind: TransactionKind::Expense,
        };
        drop(store.lock("bob").await);

        store.release("alice").await;
        store.release("bob").await;
        assert_eq!(store.len().await, 1);

        *store.lock("alice").await = ConversationState::Idle;
        let held = store.lock("alice").await;
        store.release("alice").await;
        assert_eq!(store.len().await, 1);

        drop(held);
        store.release("alice").await;
        assert_eq!(store.len().await, 0);
    }
}
