use carehome_core::db::migrations::latest_version;
use carehome_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().expect("in-memory db opens");

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "snapshots");
    assert_table_exists(&conn, "audit_log");
    assert_table_exists(&conn, "archived_residents");
}

#[test]
fn reopening_a_database_file_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("carehome.db");

    let first = open_db(&path).expect("first open");
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).expect("second open");
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "audit_log");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).expect("raw open");
    conn.execute_batch("PRAGMA user_version = 999;")
        .expect("set user_version");
    drop(conn);

    let err = open_db(&path).expect_err("future schema must fail");
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn audit_log_rejects_update_and_delete() {
    let conn = open_db_in_memory().expect("in-memory db opens");
    conn.execute(
        "INSERT INTO audit_log (recorded_at, actor_id, action, details)
         VALUES ('2024-01-01T10:00:00', 'actor', 'LOGIN', '');",
        [],
    )
    .expect("append succeeds");

    let update = conn.execute("UPDATE audit_log SET details = 'changed';", []);
    assert!(update.is_err());
    let delete = conn.execute("DELETE FROM audit_log;", []);
    assert!(delete.is_err());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM audit_log;", [], |row| row.get(0))
        .expect("count rows");
    assert_eq!(count, 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("read user_version")
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .expect("query sqlite_master");
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
