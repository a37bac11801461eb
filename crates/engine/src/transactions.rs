//! Transaction primitives.
//!
//! A `Transaction` is a single expense or income recorded by one owner.

use chrono::NaiveDateTime;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{Amount, EngineError, ResultEngine, fields};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub owner: String,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub category: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner: String,
    pub kind: String,
    pub amount: i64,
    pub category: String,
    pub timestamp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_row(
        owner: &str,
        kind: TransactionKind,
        amount: Amount,
        category: String,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: ActiveValue::NotSet,
            owner: ActiveValue::Set(owner.to_string()),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            amount: ActiveValue::Set(amount.hundredths()),
            category: ActiveValue::Set(category),
            timestamp: ActiveValue::Set(fields::format_timestamp(timestamp)),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            owner: model.owner,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: Amount::new(model.amount),
            category: model.category,
            timestamp: fields::parse_timestamp(&model.timestamp)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, timestamp: &str) -> Model {
        Model {
            id: 7,
            owner: "alice".to_string(),
            kind: kind.to_string(),
            amount: 1250,
            category: "books".to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn stored_row_becomes_a_transaction() {
        let tx = Transaction::try_from(row("income", "2024-03-10 09:30:00")).unwrap();
        assert_eq!(tx.id, 7);
        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, Amount::new(1250));
        assert_eq!(fields::format_timestamp(tx.timestamp), "2024-03-10 09:30:00");
    }

    #[test]
    fn corrupt_rows_are_rejected() {
        assert!(Transaction::try_from(row("refund", "2024-03-10 09:30:00")).is_err());
        assert!(Transaction::try_from(row("expense", "10/03/2024")).is_err());
    }
}
