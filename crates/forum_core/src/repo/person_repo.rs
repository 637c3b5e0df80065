//! Person repository contract and SQLite implementation.
//!
//! # Invariants
//! - Usernames are the natural key for every cross-reference lookup.
//! - `student_id` is stored as NULL when the person is not a student.
//! - A taken username is reported as `UsernameTaken`, whether it is caught by
//!   the lookup or by the `UNIQUE` constraint.

use super::{with_immediate_transaction, RepoError, RepoResult, SqliteForumStore};
use crate::model::person::NewPerson;
use crate::model::views::PersonView;
use crate::model::PersonId;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

pub(crate) const PERSON_VIEW_COLUMNS: &str = "person.name AS name,
    person.username AS username,
    person.student_id AS student_id";

/// Repository interface for person reads and inserts.
pub trait PersonRepository {
    /// Lists every person as `username -> name`.
    fn list_users(&self) -> RepoResult<HashMap<String, String>>;
    /// Loads one person view by username.
    fn find_person(&self, username: &str) -> RepoResult<Option<PersonView>>;
    /// Resolves a username to its row id.
    fn find_person_id(&self, username: &str) -> RepoResult<Option<PersonId>>;
    /// Inserts a validated person and returns its id.
    ///
    /// # Errors
    /// - `UsernameTaken` when the username is already registered.
    /// - `InvalidData` when `person` fails validation.
    fn insert_person(&self, person: &NewPerson) -> RepoResult<PersonId>;
}

impl PersonRepository for SqliteForumStore<'_> {
    fn list_users(&self) -> RepoResult<HashMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT username, name FROM person;")?;
        let mut rows = stmt.query([])?;
        let mut users = HashMap::new();
        while let Some(row) = rows.next()? {
            users.insert(row.get("username")?, row.get("name")?);
        }
        Ok(users)
    }

    fn find_person(&self, username: &str) -> RepoResult<Option<PersonView>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_VIEW_COLUMNS}
             FROM person
             WHERE username = ?1;"
        ))?;
        let mut rows = stmt.query([username])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_person_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_person_id(&self, username: &str) -> RepoResult<Option<PersonId>> {
        lookup_person_id(self.conn, username)
    }

    fn insert_person(&self, person: &NewPerson) -> RepoResult<PersonId> {
        person.validate().map_err(|err| {
            RepoError::InvalidData(format!("refusing to persist person: {err}"))
        })?;

        with_immediate_transaction(self.conn, |tx| {
            if lookup_person_id(tx, &person.username)?.is_some() {
                return Err(RepoError::UsernameTaken(person.username.clone()));
            }
            insert_person_row(tx, person)
        })
    }
}

fn insert_person_row(conn: &Connection, person: &NewPerson) -> RepoResult<PersonId> {
    let inserted = conn.execute(
        "INSERT INTO person (name, username, student_id) VALUES (?1, ?2, ?3);",
        params![
            person.name.as_str(),
            person.username.as_str(),
            person.student_id.as_deref(),
        ],
    );
    match inserted {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => {
            Err(RepoError::UsernameTaken(person.username.clone()))
        }
        Err(err) => Err(err.into()),
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(crate) fn lookup_person_id(conn: &Connection, username: &str) -> RepoResult<Option<PersonId>> {
    let id = conn
        .query_row(
            "SELECT id FROM person WHERE username = ?1;",
            [username],
            |row| row.get::<_, PersonId>(0),
        )
        .optional()?;
    Ok(id)
}

pub(crate) fn parse_person_row(row: &Row<'_>) -> RepoResult<PersonView> {
    Ok(PersonView {
        name: row.get("name")?,
        username: row.get("username")?,
        student_id: row.get("student_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{insert_person_row, PersonRepository};
    use crate::db::open_db_in_memory;
    use crate::model::person::NewPerson;
    use crate::repo::{RepoError, SqliteForumStore};

    #[test]
    fn insert_person_rejects_taken_username() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteForumStore::try_new(&conn).unwrap();
        let ann = NewPerson::new("Ann", "ann", None).unwrap();

        store.insert_person(&ann).unwrap();
        let again = NewPerson::new("Another Ann", "ann", Some("aa1")).unwrap();
        assert!(matches!(
            store.insert_person(&again),
            Err(RepoError::UsernameTaken(username)) if username == "ann"
        ));
        assert!(conn.is_autocommit());
    }

    #[test]
    fn unique_violation_on_insert_maps_to_username_taken() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO person (name, username) VALUES ('Ann', 'ann');",
            [],
        )
        .unwrap();

        // Skips the lookup, as a racing writer would.
        let err = insert_person_row(&conn, &NewPerson::new("Ann", "ann", None).unwrap())
            .unwrap_err();
        assert!(matches!(err, RepoError::UsernameTaken(ref username) if username == "ann"));
        assert!(err.is_precondition_failure());
    }
}
