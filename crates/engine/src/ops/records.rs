use chrono::NaiveDateTime;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    Amount, EngineError, FieldValue, FilterIntent, ResultEngine, Transaction, TransactionKind,
    fields, transactions,
};

use super::{Ledger, with_tx};

fn not_found(id: i64) -> EngineError {
    EngineError::NotFound(format!("transaction {id}"))
}

impl Ledger {
    /// Records a new transaction for `owner` and returns its id.
    ///
    /// Ids are assigned by the database and grow monotonically.
    pub async fn insert(
        &self,
        owner: &str,
        kind: TransactionKind,
        amount: Amount,
        category: &str,
        timestamp: NaiveDateTime,
    ) -> ResultEngine<i64> {
        if !amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        let category = fields::normalize_category(category)?;

        with_tx!(self, |db_tx| {
            let model = transactions::ActiveModel::new_row(owner, kind, amount, category, timestamp)
                .insert(&db_tx)
                .await?;
            Ok(model.id)
        })
    }

    /// Returns the transaction `id` if it belongs to `owner`.
    pub async fn get(&self, owner: &str, id: i64) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(id)
                .filter(transactions::Column::Owner.eq(owner))
                .one(&db_tx)
                .await?
                .ok_or_else(|| not_found(id))?;
            Transaction::try_from(model)
        })
    }

    /// Overwrites one field of an existing transaction.
    ///
    /// The value is validated with the same rules used on insert; a missing
    /// row is reported as [`EngineError::NotFound`] and never created.
    pub async fn update(&self, owner: &str, id: i64, value: FieldValue) -> ResultEngine<Transaction> {
        let value = value.validate()?;

        with_tx!(self, |db_tx| {
            let exists = transactions::Entity::find_by_id(id)
                .filter(transactions::Column::Owner.eq(owner))
                .one(&db_tx)
                .await?
                .is_some();
            if !exists {
                return Err(not_found(id));
            }

            let mut row = transactions::ActiveModel {
                id: ActiveValue::Unchanged(id),
                ..Default::default()
            };
            match value {
                FieldValue::Kind(kind) => row.kind = ActiveValue::Set(kind.as_str().to_string()),
                FieldValue::Amount(amount) => row.amount = ActiveValue::Set(amount.hundredths()),
                FieldValue::Category(category) => row.category = ActiveValue::Set(category),
                FieldValue::Timestamp(ts) => {
                    row.timestamp = ActiveValue::Set(fields::format_timestamp(ts))
                }
            }
            let model = row.update(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    /// Removes the transaction `id` of `owner`.
    pub async fn delete(&self, owner: &str, id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let res = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.eq(id))
                .filter(transactions::Column::Owner.eq(owner))
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(not_found(id));
            }
            Ok(())
        })
    }

    /// Lists every transaction of `owner` matching `filter`.
    ///
    /// Ordering is newest → older by `(timestamp DESC, id DESC)`.
    pub async fn list(&self, owner: &str, filter: &FilterIntent) -> ResultEngine<Vec<Transaction>> {
        self.list_latest(owner, filter, None).await
    }

    /// Same as [`Ledger::list`], keeping at most `limit` rows.
    pub async fn list_latest(
        &self,
        owner: &str,
        filter: &FilterIntent,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find()
                .filter(transactions::Column::Owner.eq(owner))
                .order_by_desc(transactions::Column::Timestamp)
                .order_by_desc(transactions::Column::Id);
            if let Some(predicate) = filter.compile() {
                query = query.filter(predicate.condition());
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }

            let models = query.all(&db_tx).await?;
            models
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}
