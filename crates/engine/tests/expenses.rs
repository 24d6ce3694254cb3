use engine::{Engine, EngineError, NewExpense};
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::new(db)
}

fn candidate(title: &str, amount: i64, date: &str, category: &str) -> NewExpense {
    NewExpense {
        title: title.to_string(),
        amount,
        date: date.to_string(),
        category: category.to_string(),
        created_at: None,
    }
}

#[tokio::test]
async fn create_then_list_returns_the_persisted_record() {
    let engine = engine_with_db().await;

    let created = engine
        .create_expense(candidate("Coffee", 80, "2026-05-10", "food"))
        .await
        .unwrap();

    let listed = engine.list_expenses().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].title, "Coffee");
    assert_eq!(listed[0].amount, 80);
}

#[tokio::test]
async fn list_orders_by_date_then_creation_time() {
    let engine = engine_with_db().await;

    let mut older_same_day = candidate("Breakfast", 60, "2026-05-10", "food");
    older_same_day.created_at = Some(1_000);
    let mut newer_same_day = candidate("Dinner", 250, "2026-05-10", "food");
    newer_same_day.created_at = Some(2_000);
    let mut earlier_date = candidate("Movie", 320, "2026-05-08", "entertainment");
    earlier_date.created_at = Some(9_000);

    engine.create_expense(older_same_day).await.unwrap();
    engine.create_expense(earlier_date).await.unwrap();
    engine.create_expense(newer_same_day).await.unwrap();

    let titles: Vec<String> = engine
        .list_expenses()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, ["Dinner", "Breakfast", "Movie"]);
}

#[tokio::test]
async fn create_assigns_distinct_ids() {
    let engine = engine_with_db().await;

    let first = engine
        .create_expense(candidate("Coffee", 80, "2026-05-10", "food"))
        .await
        .unwrap();
    let second = engine
        .create_expense(candidate("Coffee", 80, "2026-05-10", "food"))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn create_rejects_missing_fields() {
    let engine = engine_with_db().await;

    let err = engine
        .create_expense(candidate("", 80, "2026-05-10", "food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MissingField("title"));

    let err = engine
        .create_expense(candidate("Coffee", 80, "", "food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MissingField("date"));

    let err = engine
        .create_expense(candidate("Coffee", 80, "2026-05-10", ""))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MissingField("category"));

    let err = engine
        .create_expense(candidate("Coffee", 0, "2026-05-10", "food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MissingField("amount"));

    assert!(engine.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_negative_amounts() {
    let engine = engine_with_db().await;

    let err = engine
        .create_expense(candidate("Refund?", -80, "2026-05-10", "food"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn delete_removes_the_record_and_is_idempotent() {
    let engine = engine_with_db().await;

    let created = engine
        .create_expense(candidate("Coffee", 80, "2026-05-10", "food"))
        .await
        .unwrap();

    engine.delete_expense(created.id).await.unwrap();
    assert!(engine.list_expenses().await.unwrap().is_empty());

    // Second delete of the same id is a no-op success.
    engine.delete_expense(created.id).await.unwrap();

    // So is deleting an id that never existed.
    engine.delete_expense(Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn malformed_dates_are_stored_verbatim() {
    let engine = engine_with_db().await;

    engine
        .create_expense(candidate("Mystery", 10, "someday", "other"))
        .await
        .unwrap();

    let listed = engine.list_expenses().await.unwrap();
    assert_eq!(listed[0].date, "someday");
}
