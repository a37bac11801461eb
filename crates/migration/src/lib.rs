pub use sea_orm_migration::prelude::*;

mod m20260301_000000_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260301_000000_transactions::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, Database};

    use super::*;

    #[tokio::test]
    async fn up_and_down_leave_a_clean_schema() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        let manager = SchemaManager::new(&db);
        assert!(manager.has_table("transactions").await.unwrap());
        db.execute_unprepared(
            "INSERT INTO transactions (owner, kind, amount, category, timestamp) \
             VALUES ('u', 'expense', 100, 'food', '2024-03-10 09:00:00')",
        )
        .await
        .unwrap();

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("transactions").await.unwrap());
    }
}
