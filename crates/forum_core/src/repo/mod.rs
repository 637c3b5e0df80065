//! Repository layer: typed SQL access to forum data.
//!
//! # Responsibility
//! - Define per-aggregate data access contracts.
//! - Keep SQL text and row decoding inside the persistence boundary.
//! - Report precondition misses (`TopicNotFound`, `PersonNotFound`,
//!   `ForumTitleTaken`, `UsernameTaken`) separately from transport errors so
//!   the service can classify them.
//!
//! # Invariants
//! - A store is only constructed over a connection carrying the forum schema.
//! - Check-then-write sequences run in one `IMMEDIATE` transaction and are
//!   rolled back explicitly on error.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::TopicId;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod forum_repo;
pub mod person_repo;
pub mod post_repo;
pub mod preference_repo;

pub use forum_repo::{ForumRepository, TopicRecord};
pub use person_repo::PersonRepository;
pub use post_repo::PostRepository;
pub use preference_repo::{PreferenceRepository, TopicPreference};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from forum repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Referenced topic does not exist.
    TopicNotFound(TopicId),
    /// Referenced username does not exist.
    PersonNotFound(String),
    /// A forum with the exact title already exists.
    ForumTitleTaken(String),
    /// The username is already registered.
    UsernameTaken(String),
    /// A write failed and the following rollback failed too; store state is
    /// unknown.
    RollbackFailed {
        error: Box<RepoError>,
        rollback_error: rusqlite::Error,
    },
    /// Required table is missing from the connection schema.
    MissingRequiredTable(&'static str),
    /// Required column is missing from an expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be decoded into a view.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether this error is an expected precondition miss rather
    /// than store breakage.
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            Self::TopicNotFound(_)
                | Self::PersonNotFound(_)
                | Self::ForumTitleTaken(_)
                | Self::UsernameTaken(_)
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::TopicNotFound(id) => write!(f, "no topic with id {id}"),
            Self::PersonNotFound(username) => write!(f, "no person with username `{username}`"),
            Self::ForumTitleTaken(title) => write!(f, "a forum titled `{title}` already exists"),
            Self::UsernameTaken(username) => write!(f, "username `{username}` is already taken"),
            Self::RollbackFailed {
                error,
                rollback_error,
            } => write!(f, "rollback failed: {rollback_error} (after: {error})"),
            Self::MissingRequiredTable(table) => {
                write!(f, "forum store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "forum store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid forum data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::RollbackFailed { rollback_error, .. } => Some(rollback_error),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Every repository contract the query service depends on.
pub trait ForumStore:
    PersonRepository + ForumRepository + PostRepository + PreferenceRepository
{
}

impl<T> ForumStore for T where
    T: PersonRepository + ForumRepository + PostRepository + PreferenceRepository
{
}

/// SQLite-backed forum store over a caller-owned connection.
///
/// The store never opens, closes or migrates the connection.
pub struct SqliteForumStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteForumStore<'conn> {
    /// Creates a store after checking the connection carries the forum schema.
    ///
    /// # Errors
    /// - `Db(UnsupportedSchemaVersion)` when the schema is newer than this build.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for foreign schemas.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_forum_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("person", &["id", "name", "username", "student_id"]),
    ("forum", &["id", "title"]),
    ("topic", &["id", "forum", "title"]),
    ("post", &["id", "topic", "author", "content", "created"]),
    ("like_topic", &["person", "topic"]),
    ("favourite_topic", &["person", "topic"]),
    ("like_post", &["person", "post"]),
];

fn ensure_forum_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let latest_supported = latest_version();
    if actual_version > latest_supported {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported,
        }
        .into());
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Runs `body` inside an `IMMEDIATE` transaction.
///
/// Commits on `Ok`. On `Err` the transaction is rolled back explicitly; a
/// failing rollback is reported as [`RepoError::RollbackFailed`].
pub(crate) fn with_immediate_transaction<T>(
    conn: &Connection,
    body: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    match body(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(error) => match tx.rollback() {
            Ok(()) => Err(error),
            Err(rollback_error) => Err(RepoError::RollbackFailed {
                error: Box::new(error),
                rollback_error,
            }),
        },
    }
}

/// Returns whether a topic row exists.
pub(crate) fn topic_exists(conn: &Connection, topic_id: TopicId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM topic WHERE id = ?1);",
        [topic_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{with_immediate_transaction, RepoError, SqliteForumStore};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn try_new_accepts_migrated_connection() {
        let conn = open_db_in_memory().unwrap();
        assert!(SqliteForumStore::try_new(&conn).is_ok());
    }

    #[test]
    fn try_new_rejects_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            SqliteForumStore::try_new(&conn),
            Err(RepoError::MissingRequiredTable("person"))
        ));
    }

    #[test]
    fn try_new_rejects_table_missing_column() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(
            "DROP TABLE like_post;
             CREATE TABLE like_post (person INTEGER NOT NULL);",
        )
        .unwrap();
        assert!(matches!(
            SqliteForumStore::try_new(&conn),
            Err(RepoError::MissingRequiredColumn {
                table: "like_post",
                column: "post"
            })
        ));
    }

    #[test]
    fn failed_body_is_rolled_back() {
        let conn = open_db_in_memory().unwrap();
        let result: Result<(), RepoError> = with_immediate_transaction(&conn, |tx| {
            tx.execute("INSERT INTO forum (title) VALUES ('kept?');", [])?;
            Err(RepoError::TopicNotFound(9))
        });
        assert!(matches!(result, Err(RepoError::TopicNotFound(9))));

        let forums: i64 = conn
            .query_row("SELECT COUNT(*) FROM forum;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(forums, 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn rollback_of_closed_transaction_is_reported() {
        let conn = open_db_in_memory().unwrap();
        let result: Result<(), RepoError> = with_immediate_transaction(&conn, |tx| {
            tx.execute_batch("COMMIT;")?;
            Err(RepoError::TopicNotFound(9))
        });

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("rollback failed"));
        assert!(!err.is_precondition_failure());
        match err {
            RepoError::RollbackFailed { error, .. } => {
                assert!(matches!(*error, RepoError::TopicNotFound(9)));
            }
            other => panic!("expected RollbackFailed, got {other:?}"),
        }
        assert!(conn.is_autocommit());
    }
}
