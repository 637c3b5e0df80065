use forum_core::db::migrations::latest_version;
use forum_core::db::{open_db, open_db_in_memory, DbError};
use forum_core::{RepoError, SqliteForumStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_forum_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "person",
        "forum",
        "topic",
        "post",
        "like_topic",
        "favourite_topic",
        "like_post",
    ] {
        assert_table_exists(&conn, table);
    }
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn reopening_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forum.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute("INSERT INTO forum (title) VALUES ('Kept');", [])
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let title: String = second
        .query_row("SELECT title FROM forum;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(title, "Kept");
}

#[test]
fn opening_newer_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
fn store_rejects_newer_schema_on_foreign_connection() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();

    assert!(matches!(
        SqliteForumStore::try_new(&conn),
        Err(RepoError::Db(DbError::UnsupportedSchemaVersion { .. }))
    ));
}

#[test]
fn schema_rejects_empty_student_id() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO person (name, username, student_id) VALUES ('Ann', 'ann', '');",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
