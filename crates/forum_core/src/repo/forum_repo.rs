//! Forum and topic repository contract and SQLite implementation.
//!
//! # Invariants
//! - Forum listings are ordered by title (binary collation), then id.
//! - Topic listings inside a forum are ordered by id.
//! - A forum's "latest" topic is the one with the highest id.
//! - Forum titles are unique (exact match); the check and the insert share
//!   one `IMMEDIATE` transaction.

use super::{with_immediate_transaction, RepoError, RepoResult, SqliteForumStore};
use crate::model::views::{ForumSummaryView, SimpleForumSummaryView, SimpleTopicSummaryView};
use crate::model::{ForumId, TopicId};
use rusqlite::{Connection, OptionalExtension, Row};

/// Topic row joined with its owning forum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
    pub topic_id: TopicId,
    pub forum_id: ForumId,
    pub forum_title: String,
    pub title: String,
}

/// Repository interface for forum and topic reads and forum inserts.
pub trait ForumRepository {
    fn list_forum_summaries(&self) -> RepoResult<Vec<SimpleForumSummaryView>>;
    /// Lists forums with their most recently created topic, if any.
    fn list_forums_with_last_topic(&self) -> RepoResult<Vec<ForumSummaryView>>;
    fn find_forum(&self, forum_id: ForumId) -> RepoResult<Option<SimpleForumSummaryView>>;
    fn list_topics_in_forum(&self, forum_id: ForumId) -> RepoResult<Vec<SimpleTopicSummaryView>>;
    /// Inserts a forum; returns affected row count.
    ///
    /// # Errors
    /// - `ForumTitleTaken` when a forum with the exact title exists.
    fn insert_forum(&self, title: &str) -> RepoResult<usize>;
    fn topic_exists(&self, topic_id: TopicId) -> RepoResult<bool>;
    fn find_topic(&self, topic_id: TopicId) -> RepoResult<Option<TopicRecord>>;
}

impl ForumRepository for SqliteForumStore<'_> {
    fn list_forum_summaries(&self) -> RepoResult<Vec<SimpleForumSummaryView>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title
             FROM forum
             ORDER BY title ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut forums = Vec::new();
        while let Some(row) = rows.next()? {
            forums.push(parse_forum_summary_row(row)?);
        }
        Ok(forums)
    }

    fn list_forums_with_last_topic(&self) -> RepoResult<Vec<ForumSummaryView>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                forum.id AS forum_id,
                forum.title AS forum_title,
                topic.id AS topic_id,
                topic.title AS topic_title
             FROM forum
             LEFT JOIN topic
               ON topic.id = (
                   SELECT MAX(latest.id)
                   FROM topic AS latest
                   WHERE latest.forum = forum.id
               )
             ORDER BY forum.title ASC, forum.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut forums = Vec::new();
        while let Some(row) = rows.next()? {
            let forum_id: ForumId = row.get("forum_id")?;
            let last_topic = match row.get::<_, Option<TopicId>>("topic_id")? {
                Some(topic_id) => Some(SimpleTopicSummaryView {
                    topic_id,
                    forum_id,
                    title: row.get("topic_title")?,
                }),
                None => None,
            };
            forums.push(ForumSummaryView {
                id: forum_id,
                title: row.get("forum_title")?,
                last_topic,
            });
        }
        Ok(forums)
    }

    fn find_forum(&self, forum_id: ForumId) -> RepoResult<Option<SimpleForumSummaryView>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM forum WHERE id = ?1;")?;
        let mut rows = stmt.query([forum_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_forum_summary_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_topics_in_forum(&self, forum_id: ForumId) -> RepoResult<Vec<SimpleTopicSummaryView>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, forum, title
             FROM topic
             WHERE forum = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([forum_id])?;
        let mut topics = Vec::new();
        while let Some(row) = rows.next()? {
            topics.push(SimpleTopicSummaryView {
                topic_id: row.get("id")?,
                forum_id: row.get("forum")?,
                title: row.get("title")?,
            });
        }
        Ok(topics)
    }

    fn insert_forum(&self, title: &str) -> RepoResult<usize> {
        with_immediate_transaction(self.conn, |tx| {
            if forum_title_exists(tx, title)? {
                return Err(RepoError::ForumTitleTaken(title.to_string()));
            }
            let changed = tx.execute("INSERT INTO forum (title) VALUES (?1);", [title])?;
            Ok(changed)
        })
    }

    fn topic_exists(&self, topic_id: TopicId) -> RepoResult<bool> {
        super::topic_exists(self.conn, topic_id)
    }

    fn find_topic(&self, topic_id: TopicId) -> RepoResult<Option<TopicRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT
                    topic.id AS topic_id,
                    topic.title AS topic_title,
                    forum.id AS forum_id,
                    forum.title AS forum_title
                 FROM topic
                 JOIN forum ON forum.id = topic.forum
                 WHERE topic.id = ?1;",
                [topic_id],
                |row| {
                    Ok(TopicRecord {
                        topic_id: row.get("topic_id")?,
                        forum_id: row.get("forum_id")?,
                        forum_title: row.get("forum_title")?,
                        title: row.get("topic_title")?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }
}

fn forum_title_exists(conn: &Connection, title: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM forum WHERE title = ?1);",
        [title],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_forum_summary_row(row: &Row<'_>) -> RepoResult<SimpleForumSummaryView> {
    Ok(SimpleForumSummaryView {
        id: row.get("id")?,
        title: row.get("title")?,
    })
}

#[cfg(test)]
mod tests {
    use super::ForumRepository;
    use crate::db::open_db_in_memory;
    use crate::repo::{RepoError, SqliteForumStore};

    #[test]
    fn insert_forum_rejects_taken_title_without_writing() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteForumStore::try_new(&conn).unwrap();

        assert_eq!(store.insert_forum("Rust").unwrap(), 1);
        assert!(matches!(
            store.insert_forum("Rust"),
            Err(RepoError::ForumTitleTaken(title)) if title == "Rust"
        ));

        let forums: i64 = conn
            .query_row("SELECT COUNT(*) FROM forum;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(forums, 1);
        assert!(conn.is_autocommit());
    }
}
