//! Topic preference (like/favourite) repository.
//!
//! # Invariants
//! - A `(person, topic)` pair appears at most once per relation; row
//!   presence is the preference state.
//! - Setting a preference is idempotent: insert ignores an existing pair,
//!   delete of a missing pair changes nothing.
//! - Existence checks and the mutation share one `IMMEDIATE` transaction.

use super::person_repo::{lookup_person_id, parse_person_row, PERSON_VIEW_COLUMNS};
use super::{topic_exists, with_immediate_transaction, RepoError, RepoResult, SqliteForumStore};
use crate::model::views::PersonView;
use crate::model::TopicId;
use rusqlite::params;

/// Per-person preference relation over topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicPreference {
    Like,
    Favourite,
}

impl TopicPreference {
    fn table(self) -> &'static str {
        match self {
            Self::Like => "like_topic",
            Self::Favourite => "favourite_topic",
        }
    }
}

/// Repository interface for topic preference relations.
pub trait PreferenceRepository {
    /// Lists people who like a topic, ordered by name then username.
    fn list_likers(&self, topic_id: TopicId) -> RepoResult<Vec<PersonView>>;
    /// Makes the `(username, topic)` pair present (`enabled`) or absent.
    ///
    /// # Errors
    /// - `TopicNotFound` when the topic is missing (checked first).
    /// - `PersonNotFound` when the username is missing.
    /// - `RollbackFailed` when the mutation and its rollback both fail.
    fn set_topic_preference(
        &self,
        preference: TopicPreference,
        username: &str,
        topic_id: TopicId,
        enabled: bool,
    ) -> RepoResult<()>;
}

impl PreferenceRepository for SqliteForumStore<'_> {
    fn list_likers(&self, topic_id: TopicId) -> RepoResult<Vec<PersonView>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_VIEW_COLUMNS}
             FROM person
             JOIN like_topic ON like_topic.person = person.id
             WHERE like_topic.topic = ?1
             ORDER BY person.name ASC, person.username ASC;"
        ))?;
        let mut rows = stmt.query([topic_id])?;
        let mut likers = Vec::new();
        while let Some(row) = rows.next()? {
            likers.push(parse_person_row(row)?);
        }
        Ok(likers)
    }

    fn set_topic_preference(
        &self,
        preference: TopicPreference,
        username: &str,
        topic_id: TopicId,
        enabled: bool,
    ) -> RepoResult<()> {
        let table = preference.table();
        with_immediate_transaction(self.conn, |tx| {
            if !topic_exists(tx, topic_id)? {
                return Err(RepoError::TopicNotFound(topic_id));
            }
            let Some(person_id) = lookup_person_id(tx, username)? else {
                return Err(RepoError::PersonNotFound(username.to_string()));
            };

            if enabled {
                tx.execute(
                    &format!("INSERT OR IGNORE INTO {table} (person, topic) VALUES (?1, ?2);"),
                    params![person_id, topic_id],
                )?;
            } else {
                tx.execute(
                    &format!("DELETE FROM {table} WHERE person = ?1 AND topic = ?2;"),
                    params![person_id, topic_id],
                )?;
            }
            Ok(())
        })
    }
}
