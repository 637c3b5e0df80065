//! Post repository contract and SQLite implementation.
//!
//! # Invariants
//! - Posts inside a topic are numbered from 1 in ascending id order.
//! - "Latest" means highest `created`, ties broken by highest id.
//! - Like counts come from `like_post`; no rows means zero likes.

use super::{RepoResult, SqliteForumStore};
use crate::model::page::PostWindow;
use crate::model::views::{PostView, SimplePostView};
use crate::model::{PersonId, PostId, TopicId};
use rusqlite::{params, Connection, Row};

const POST_VIEW_SELECT_SQL: &str = "SELECT
    topic.forum AS forum_id,
    post.topic AS topic_id,
    post.id AS post_id,
    (
        SELECT COUNT(*)
        FROM post AS earlier
        WHERE earlier.topic = post.topic
          AND earlier.id <= post.id
    ) AS post_number,
    person.name AS author_name,
    person.username AS author_username,
    post.content AS content,
    post.created AS created
FROM post
JOIN topic ON topic.id = post.topic
JOIN person ON person.id = post.author";

/// Repository interface for post reads and inserts.
pub trait PostRepository {
    fn count_posts(&self, topic_id: TopicId) -> RepoResult<i64>;
    /// Lists lightweight posts in ascending id order.
    fn list_simple_posts(&self, topic_id: TopicId) -> RepoResult<Vec<SimplePostView>>;
    fn latest_post(&self, topic_id: TopicId) -> RepoResult<Option<PostView>>;
    /// Lists full posts inside `window`, in ascending id order.
    fn list_posts(&self, topic_id: TopicId, window: PostWindow) -> RepoResult<Vec<PostView>>;
    /// Inserts a post stamped with the store's current time; returns
    /// affected row count.
    fn insert_post(&self, topic_id: TopicId, author_id: PersonId, text: &str)
        -> RepoResult<usize>;
}

impl PostRepository for SqliteForumStore<'_> {
    fn count_posts(&self, topic_id: TopicId) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM post WHERE topic = ?1;",
            [topic_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_simple_posts(&self, topic_id: TopicId) -> RepoResult<Vec<SimplePostView>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                post.id AS post_id,
                person.name AS author_name,
                post.content AS content,
                post.created AS created
             FROM post
             JOIN person ON person.id = post.author
             WHERE post.topic = ?1
             ORDER BY post.id ASC;",
        )?;
        let mut rows = stmt.query([topic_id])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(SimplePostView {
                post_id: row.get("post_id")?,
                author_name: row.get("author_name")?,
                text: row.get("content")?,
                posted_at: row.get("created")?,
            });
        }
        Ok(posts)
    }

    fn latest_post(&self, topic_id: TopicId) -> RepoResult<Option<PostView>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POST_VIEW_SELECT_SQL}
             WHERE post.topic = ?1
             ORDER BY post.created DESC, post.id DESC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([topic_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_post_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn list_posts(&self, topic_id: TopicId, window: PostWindow) -> RepoResult<Vec<PostView>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POST_VIEW_SELECT_SQL}
             WHERE post.topic = ?1
             ORDER BY post.id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        // SQLite treats a negative LIMIT as "no limit".
        let limit = window.limit.unwrap_or(-1);
        let mut rows = stmt.query(params![topic_id, limit, window.offset])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(self.conn, row)?);
        }
        Ok(posts)
    }

    fn insert_post(
        &self,
        topic_id: TopicId,
        author_id: PersonId,
        text: &str,
    ) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "INSERT INTO post (topic, author, content, created)
             VALUES (?1, ?2, ?3, CAST(strftime('%s', 'now') AS INTEGER));",
            params![topic_id, author_id, text],
        )?;
        Ok(changed)
    }
}

/// Counts `like_post` rows referencing `post_id`.
fn count_post_likes(conn: &Connection, post_id: PostId) -> RepoResult<i64> {
    let likes = conn.query_row(
        "SELECT COUNT(*) FROM like_post WHERE post = ?1;",
        [post_id],
        |row| row.get(0),
    )?;
    Ok(likes)
}

fn parse_post_row(conn: &Connection, row: &Row<'_>) -> RepoResult<PostView> {
    let post_id: PostId = row.get("post_id")?;
    Ok(PostView {
        forum_id: row.get("forum_id")?,
        topic_id: row.get("topic_id")?,
        post_id,
        post_number: row.get("post_number")?,
        author_name: row.get("author_name")?,
        author_username: row.get("author_username")?,
        text: row.get("content")?,
        posted_at: row.get("created")?,
        likes: count_post_likes(conn, post_id)?,
    })
}
