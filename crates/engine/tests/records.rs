use chrono::NaiveDateTime;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Amount, EngineError, FieldValue, FilterIntent, FilterType, Ledger, TIMESTAMP_FORMAT,
    TransactionKind,
};
use migration::MigratorTrait;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (ledger, db)
}

fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap()
}

#[tokio::test]
async fn insert_then_list_returns_the_record() {
    let (ledger, _db) = ledger_with_db().await;

    let id = ledger
        .insert(
            "alice",
            TransactionKind::Expense,
            Amount::new(15000),
            "groceries",
            ts("2024-03-10 09:00:00"),
        )
        .await
        .unwrap();

    let all = ledger.list("alice", &FilterIntent::None).await.unwrap();
    assert_eq!(all.len(), 1);
    let tx = &all[0];
    assert_eq!(tx.id, id);
    assert_eq!(tx.owner, "alice");
    assert_eq!(tx.kind, TransactionKind::Expense);
    assert_eq!(tx.amount, Amount::new(15000));
    assert_eq!(tx.category, "groceries");
    assert_eq!(tx.timestamp, ts("2024-03-10 09:00:00"));
}

#[tokio::test]
async fn insert_rejects_invalid_values() {
    let (ledger, _db) = ledger_with_db().await;
    let now = ts("2024-03-10 09:00:00");

    for amount in [Amount::ZERO, Amount::new(-1)] {
        let err = ledger
            .insert("alice", TransactionKind::Income, amount, "salary", now)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    let err = ledger
        .insert("alice", TransactionKind::Income, Amount::new(100), "  ", now)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert!(ledger.list("alice", &FilterIntent::None).await.unwrap().is_empty());
}

#[tokio::test]
async fn ids_are_unique_and_increasing() {
    let (ledger, _db) = ledger_with_db().await;
    let now = ts("2024-03-10 09:00:00");

    let first = ledger
        .insert("alice", TransactionKind::Expense, Amount::new(100), "a", now)
        .await
        .unwrap();
    let second = ledger
        .insert("bob", TransactionKind::Expense, Amount::new(100), "b", now)
        .await
        .unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn list_orders_by_timestamp_then_id_descending() {
    let (ledger, _db) = ledger_with_db().await;

    let old = ledger
        .insert(
            "alice",
            TransactionKind::Expense,
            Amount::new(100),
            "old",
            ts("2024-01-01 10:00:00"),
        )
        .await
        .unwrap();
    let tie_a = ledger
        .insert(
            "alice",
            TransactionKind::Expense,
            Amount::new(100),
            "tie a",
            ts("2024-02-01 10:00:00"),
        )
        .await
        .unwrap();
    let tie_b = ledger
        .insert(
            "alice",
            TransactionKind::Income,
            Amount::new(100),
            "tie b",
            ts("2024-02-01 10:00:00"),
        )
        .await
        .unwrap();

    let ids: Vec<i64> = ledger
        .list("alice", &FilterIntent::None)
        .await
        .unwrap()
        .into_iter()
        .map(|tx| tx.id)
        .collect();
    assert_eq!(ids, vec![tie_b, tie_a, old]);

    let latest = ledger
        .list_latest("alice", &FilterIntent::None, Some(2))
        .await
        .unwrap();
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].id, tie_b);
}

#[tokio::test]
async fn owners_never_see_each_other() {
    let (ledger, _db) = ledger_with_db().await;
    let id = ledger
        .insert(
            "alice",
            TransactionKind::Expense,
            Amount::new(500),
            "rent",
            ts("2024-03-01 08:00:00"),
        )
        .await
        .unwrap();

    assert!(ledger.list("bob", &FilterIntent::None).await.unwrap().is_empty());
    assert!(matches!(
        ledger.get("bob", id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
    assert!(matches!(
        ledger.delete("bob", id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
    assert!(ledger.get("alice", id).await.is_ok());
}

#[tokio::test]
async fn month_filter_excludes_neighbouring_months() {
    let (ledger, _db) = ledger_with_db().await;
    for raw in [
        "2024-02-29 23:59:59",
        "2024-03-01 00:00:00",
        "2024-03-31 23:59:59",
        "2024-04-01 00:00:00",
    ] {
        ledger
            .insert("alice", TransactionKind::Expense, Amount::new(100), raw, ts(raw))
            .await
            .unwrap();
    }

    let intent = FilterType::Month.parse_value("2024-03").unwrap();
    let march = ledger.list("alice", &intent).await.unwrap();
    let stamps: Vec<String> = march.iter().map(|tx| tx.category.clone()).collect();
    assert_eq!(stamps, vec!["2024-03-31 23:59:59", "2024-03-01 00:00:00"]);

    let day = FilterType::Date.parse_value("2024-02-29").unwrap();
    assert_eq!(ledger.list("alice", &day).await.unwrap().len(), 1);

    let year = FilterType::Year.parse_value("2024").unwrap();
    assert_eq!(ledger.list("alice", &year).await.unwrap().len(), 4);

    let other_year = FilterType::Year.parse_value("2023").unwrap();
    assert!(ledger.list("alice", &other_year).await.unwrap().is_empty());
}

#[tokio::test]
async fn kind_filter_selects_one_kind() {
    let (ledger, _db) = ledger_with_db().await;
    let now = ts("2024-03-10 09:00:00");
    ledger
        .insert("alice", TransactionKind::Expense, Amount::new(100), "food", now)
        .await
        .unwrap();
    let income = ledger
        .insert("alice", TransactionKind::Income, Amount::new(9000), "salary", now)
        .await
        .unwrap();

    let incomes = ledger
        .list("alice", &FilterIntent::Kind(TransactionKind::Income))
        .await
        .unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].id, income);
}

#[tokio::test]
async fn update_changes_only_the_given_field() {
    let (ledger, _db) = ledger_with_db().await;
    let id = ledger
        .insert(
            "alice",
            TransactionKind::Expense,
            Amount::new(15000),
            "groceries",
            ts("2024-03-10 09:00:00"),
        )
        .await
        .unwrap();

    let updated = ledger
        .update("alice", id, FieldValue::Amount(Amount::new(2000)))
        .await
        .unwrap();
    assert_eq!(updated.amount, Amount::new(2000));
    assert_eq!(updated.category, "groceries");

    ledger
        .update("alice", id, FieldValue::Kind(TransactionKind::Income))
        .await
        .unwrap();
    ledger
        .update("alice", id, FieldValue::Timestamp(ts("2023-12-31 23:00:00")))
        .await
        .unwrap();

    let tx = ledger.get("alice", id).await.unwrap();
    assert_eq!(tx.kind, TransactionKind::Income);
    assert_eq!(tx.amount, Amount::new(2000));
    assert_eq!(tx.timestamp, ts("2023-12-31 23:00:00"));
}

#[tokio::test]
async fn invalid_update_leaves_record_untouched() {
    let (ledger, _db) = ledger_with_db().await;
    let id = ledger
        .insert(
            "alice",
            TransactionKind::Expense,
            Amount::new(15000),
            "groceries",
            ts("2024-03-10 09:00:00"),
        )
        .await
        .unwrap();
    let before = ledger.get("alice", id).await.unwrap();

    let err = ledger
        .update("alice", id, FieldValue::Amount(Amount::new(-500)))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    let err = ledger
        .update("alice", id, FieldValue::Category(" ".to_string()))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(ledger.get("alice", id).await.unwrap(), before);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let (ledger, _db) = ledger_with_db().await;

    let err = ledger
        .update("alice", 42, FieldValue::Category("x".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    assert!(ledger.list("alice", &FilterIntent::None).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let (ledger, _db) = ledger_with_db().await;
    let id = ledger
        .insert(
            "alice",
            TransactionKind::Income,
            Amount::new(100),
            "gift",
            ts("2024-03-10 09:00:00"),
        )
        .await
        .unwrap();

    ledger.delete("alice", id).await.unwrap();
    let err = ledger.delete("alice", id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
