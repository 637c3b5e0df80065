#![allow(dead_code)]

use forum_core::db::open_db_in_memory;
use forum_core::{ForumId, PersonId, PostId, TopicId};
use rusqlite::{params, Connection};

pub fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

pub fn insert_forum(conn: &Connection, title: &str) -> ForumId {
    conn.execute("INSERT INTO forum (title) VALUES (?1);", [title])
        .unwrap();
    conn.last_insert_rowid()
}

pub fn insert_topic(conn: &Connection, forum_id: ForumId, title: &str) -> TopicId {
    conn.execute(
        "INSERT INTO topic (forum, title) VALUES (?1, ?2);",
        params![forum_id, title],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn insert_person(conn: &Connection, name: &str, username: &str) -> PersonId {
    conn.execute(
        "INSERT INTO person (name, username) VALUES (?1, ?2);",
        params![name, username],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn insert_post(
    conn: &Connection,
    topic_id: TopicId,
    author_id: PersonId,
    content: &str,
    created: i64,
) -> PostId {
    conn.execute(
        "INSERT INTO post (topic, author, content, created) VALUES (?1, ?2, ?3, ?4);",
        params![topic_id, author_id, content, created],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn like_post(conn: &Connection, person_id: PersonId, post_id: PostId) {
    conn.execute(
        "INSERT INTO like_post (person, post) VALUES (?1, ?2);",
        params![person_id, post_id],
    )
    .unwrap();
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// Seeds one forum, one topic and `posts` numbered posts by `ann`.
pub fn seed_topic_with_posts(conn: &Connection, posts: usize) -> TopicId {
    let forum_id = insert_forum(conn, "General");
    let topic_id = insert_topic(conn, forum_id, "Welcome");
    let author_id = insert_person(conn, "Ann", "ann");
    for number in 1..=posts {
        insert_post(
            conn,
            topic_id,
            author_id,
            &format!("post {number}"),
            1_700_000_000 + number as i64,
        );
    }
    topic_id
}
