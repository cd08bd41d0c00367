//! End-to-end tests running derived records against in-memory SQLite.

use chrono::{DateTime, TimeZone, Utc};
use oxide_morm::{
    Client, ClientConfig, ClientError, CompileError, Comparison, Compiler, Engine, Filter, Record,
    SelectTarget, SqliteExecutor,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

#[derive(Debug, Clone, Record)]
pub struct Email {
    #[morm("id integer PRIMARY KEY AUTOINCREMENT")]
    pub id: i64,
    pub address: String,
}

#[derive(Debug, Clone, Record)]
pub struct Phone {
    #[morm("id integer")]
    pub id: i64,
    pub number: String,
    pub primary: bool,
}

#[derive(Debug, Clone, Record)]
pub struct User {
    #[morm("id text PRIMARY KEY")]
    pub id: String,
    pub lastname: String,
    pub alias: Option<String>,
    #[morm("created_at integer")]
    pub created_at: DateTime<Utc>,
    pub email: Option<Email>,
    #[morm(":flatten")]
    pub phone: Phone,
    #[morm(":ignore")]
    pub scratch: Vec<String>,
}

async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

async fn create_client() -> (Client, SqlitePool) {
    let pool = create_test_pool().await;
    let client = Client::new(
        Compiler::new(Engine::Sqlite).unwrap(),
        SqliteExecutor::from_pool(pool.clone()),
    );
    client.create_table::<User>().await.unwrap();
    (client, pool)
}

fn user(id: &str, email: Option<&str>) -> User {
    User {
        id: id.to_string(),
        lastname: "Bolanos".to_string(),
        alias: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        email: email.map(|address| Email {
            id: 0,
            address: address.to_string(),
        }),
        phone: Phone {
            id: 7,
            number: "555".to_string(),
            primary: true,
        },
        scratch: vec!["not stored".to_string()],
    }
}

fn by_id(id: &str) -> Filter {
    let mut filter = Filter::new();
    filter.and("id", Comparison::Equal, id);
    filter
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

#[tokio::test]
async fn test_create_table_creates_adjacent_tables() {
    let (_client, pool) = create_client().await;
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('users', 'emails') ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
        tables,
        vec![("emails".to_string(),), ("users".to_string(),)]
    );
}

#[tokio::test]
async fn test_create_table_is_idempotent() {
    let (client, _pool) = create_client().await;
    client.create_table::<User>().await.unwrap();
}

#[tokio::test]
async fn test_insert_chain() {
    let (client, pool) = create_client().await;
    let result = client.insert(&user("00", Some("r@x.io"))).await.unwrap();
    assert_eq!(result.rows_affected, 2);

    let row: (String, Option<String>, i64, i64, String, bool) = sqlx::query_as(
        "SELECT lastname, alias, created_at, Phone_id, number, \"primary\" FROM users WHERE id = '00'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(
        row,
        (
            "Bolanos".to_string(),
            None,
            1_705_314_600_000,
            7,
            "555".to_string(),
            true
        )
    );

    let email: (i64, String) = sqlx::query_as("SELECT Email_id, address FROM emails")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(email, (1, "r@x.io".to_string()));
}

#[tokio::test]
async fn test_insert_without_nested_record() {
    let (client, pool) = create_client().await;
    let result = client.insert(&user("00", None)).await.unwrap();
    assert_eq!(result.rows_affected, 1);
    assert_eq!(count(&pool, "emails").await, 0);
}

#[tokio::test]
async fn test_failed_insert_leaves_nothing_behind() {
    let (client, pool) = create_client().await;
    client.insert(&user("00", Some("a@x.io"))).await.unwrap();

    // the duplicate key fails the parent insert, so the child never runs
    let err = client.insert(&user("00", Some("b@x.io"))).await.unwrap_err();
    assert!(matches!(err, ClientError::Database(_)));
    assert_eq!(count(&pool, "users").await, 1);
    assert_eq!(count(&pool, "emails").await, 1);
}

#[tokio::test]
async fn test_insert_into_other_table() {
    let pool = create_test_pool().await;
    let client = Client::new(
        Compiler::new(Engine::Sqlite).unwrap(),
        SqliteExecutor::from_pool(pool.clone()),
    );
    let statements = client.compiler().create_table_for::<User>(Some("archive")).unwrap();
    assert_eq!(statements.len(), 2);
    client.execute(&statements).await.unwrap();

    client
        .insert_into("archive", &user("00", Some("r@x.io")))
        .await
        .unwrap();
    assert_eq!(count(&pool, "archive").await, 1);
    assert_eq!(count(&pool, "emails").await, 1);
}

#[tokio::test]
async fn test_update() {
    let (client, pool) = create_client().await;
    client.insert(&user("00", None)).await.unwrap();

    let mut changed = user("00", None);
    changed.lastname = "O'Brien".to_string();
    changed.phone.number = "777".to_string();
    let result = client
        .update(&changed, Some(&by_id("00")), &["lastname", "phone"])
        .await
        .unwrap();
    assert_eq!(result.rows_affected, 1);

    let row: (String, String) = sqlx::query_as("SELECT lastname, number FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row, ("O'Brien".to_string(), "777".to_string()));
}

#[tokio::test]
async fn test_update_unknown_field() {
    let (client, _pool) = create_client().await;
    let err = client
        .update(&user("00", None), None, &["scratch"])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Compile(CompileError::FieldNotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete() {
    let (client, pool) = create_client().await;
    client.insert(&user("00", None)).await.unwrap();
    client.insert(&user("01", None)).await.unwrap();

    let err = client.delete::<User>(None).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Compile(CompileError::MissingFilter(_))
    ));
    assert_eq!(count(&pool, "users").await, 2);

    let result = client.delete::<User>(Some(&by_id("00"))).await.unwrap();
    assert_eq!(result.rows_affected, 1);

    let result = client.delete_from("users", Some(&by_id("01"))).await.unwrap();
    assert_eq!(result.rows_affected, 1);
    assert_eq!(count(&pool, "users").await, 0);
}

#[tokio::test]
async fn test_select_sql_runs() {
    let (client, pool) = create_client().await;
    client.insert(&user("00", None)).await.unwrap();

    let sql = client
        .select_sql::<User>(Some(&by_id("00")), SelectTarget::One)
        .unwrap();
    let row: (String, String, Option<String>, i64, i64, String, bool) = sqlx::query_as(&sql)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, "00");
    assert_eq!(row.1, "Bolanos");
    assert_eq!(row.4, 7);
    assert!(row.6);
}

#[tokio::test]
async fn test_drop() {
    let (client, pool) = create_client().await;
    client.drop::<User>().await.unwrap();
    client.drop_table("emails").await.unwrap();
    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert!(tables.is_empty());
}

#[tokio::test]
async fn test_connect_is_lazy() {
    let client = Client::connect(&ClientConfig::new(Engine::Sqlite, "sqlite::memory:").with_max_connections(1))
        .unwrap();
    assert!(!client.executor().is_connected());
    client.create_table::<User>().await.unwrap();
    assert!(client.executor().is_connected());
}

#[test]
fn test_connect_requires_sqlite() {
    let err = Client::connect(&ClientConfig::new(Engine::SqlServer, "mssql://db")).unwrap_err();
    assert!(matches!(err, ClientError::NoExecutor(Engine::SqlServer)));
}
