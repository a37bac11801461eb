//! Transactional store for personal expenses and incomes.
//!
//! The [`Ledger`] owns the `transactions` table. Every operation runs in its
//! own database transaction and addresses rows by `(owner, id)`, so an owner
//! can never read or touch someone else's records.
//!
//! Listings are restricted through the closed [`FilterIntent`] enum, which
//! compiles into a parameterized [`Predicate`]; raw user text is never spliced
//! into SQL.

pub use error::EngineError;
pub use fields::{FieldValue, RecordField, TIMESTAMP_FORMAT};
pub use filters::{FilterIntent, FilterType, Predicate};
pub use money::Amount;
pub use ops::{Ledger, LedgerBuilder};
pub use transactions::{Transaction, TransactionKind};

mod error;
pub mod fields;
mod filters;
mod money;
mod ops;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
