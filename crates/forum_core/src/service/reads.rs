//! Read operations. None of them mutate the store.
//!
//! Multi-query reads are not wrapped in a transaction; a topic or forum that
//! disappears between queries yields `Failure` or an empty list.

use super::{no_topic, QueryService};
use crate::model::page::PostWindow;
use crate::model::views::{
    ForumSummaryView, ForumView, PersonView, PostView, SimpleForumSummaryView, SimpleTopicView,
    TopicView,
};
use crate::model::{ForumId, TopicId};
use crate::outcome::Outcome;
use crate::repo::ForumStore;
use std::collections::HashMap;

impl<S: ForumStore> QueryService<S> {
    /// Lists every person as `username -> name`.
    pub fn list_users(&self) -> Outcome<HashMap<String, String>> {
        self.run("list_users", |store| Ok(Outcome::success(store.list_users()?)))
    }

    /// Gets one person by username.
    ///
    /// An empty username is a `Failure` and never reaches the store.
    pub fn get_person(&self, username: &str) -> Outcome<PersonView> {
        if username.is_empty() {
            return Outcome::failure("username must not be empty");
        }
        self.run("get_person", |store| {
            Ok(match store.find_person(username)? {
                Some(person) => Outcome::success(person),
                None => Outcome::failure(format!("no person with username `{username}`")),
            })
        })
    }

    /// Lists forums as `(id, title)` ordered by title.
    pub fn list_forums_summary(&self) -> Outcome<Vec<SimpleForumSummaryView>> {
        self.run("list_forums_summary", |store| {
            Ok(Outcome::success(store.list_forum_summaries()?))
        })
    }

    /// Counts posts in an existing topic without fetching them.
    pub fn count_posts_in_topic(&self, topic_id: TopicId) -> Outcome<i64> {
        self.run("count_posts_in_topic", |store| {
            if !store.topic_exists(topic_id)? {
                return Ok(no_topic(topic_id));
            }
            Ok(Outcome::success(store.count_posts(topic_id)?))
        })
    }

    /// Lists the people who like a topic, ordered by name.
    pub fn get_likers(&self, topic_id: TopicId) -> Outcome<Vec<PersonView>> {
        self.run("get_likers", |store| {
            if !store.topic_exists(topic_id)? {
                return Ok(no_topic(topic_id));
            }
            Ok(Outcome::success(store.list_likers(topic_id)?))
        })
    }

    pub fn get_simple_topic(&self, topic_id: TopicId) -> Outcome<SimpleTopicView> {
        self.run("get_simple_topic", |store| {
            let Some(topic) = store.find_topic(topic_id)? else {
                return Ok(no_topic(topic_id));
            };
            Ok(Outcome::success(SimpleTopicView {
                topic_id,
                title: topic.title,
                posts: store.list_simple_posts(topic_id)?,
            }))
        })
    }

    /// Gets the most recently created post of a topic with its like count.
    pub fn get_latest_post(&self, topic_id: TopicId) -> Outcome<PostView> {
        self.run("get_latest_post", |store| {
            if !store.topic_exists(topic_id)? {
                return Ok(no_topic(topic_id));
            }
            Ok(match store.latest_post(topic_id)? {
                Some(post) => Outcome::success(post),
                None => Outcome::failure(format!("topic {topic_id} has no posts")),
            })
        })
    }

    /// Lists forums ordered by title, each with its newest topic.
    pub fn list_forums(&self) -> Outcome<Vec<ForumSummaryView>> {
        self.run("list_forums", |store| {
            Ok(Outcome::success(store.list_forums_with_last_topic()?))
        })
    }

    pub fn get_forum(&self, forum_id: ForumId) -> Outcome<ForumView> {
        self.run("get_forum", |store| {
            let Some(forum) = store.find_forum(forum_id)? else {
                return Ok(Outcome::failure(format!("no forum with id {forum_id}")));
            };
            Ok(Outcome::success(ForumView {
                id: forum.id,
                title: forum.title,
                topics: store.list_topics_in_forum(forum_id)?,
            }))
        })
    }

    /// Gets one page of a topic.
    ///
    /// `page == 0` returns every post (possibly none). `page == n` returns
    /// posts `10*(n-1)+1 ..= 10*n` and is a `Failure` when that range is
    /// empty.
    pub fn get_topic(&self, topic_id: TopicId, page: u32) -> Outcome<TopicView> {
        self.run("get_topic", |store| {
            let Some(topic) = store.find_topic(topic_id)? else {
                return Ok(no_topic(topic_id));
            };

            let window = PostWindow::for_page(page);
            let posts = store.list_posts(topic_id, window)?;
            if posts.is_empty() && !window.is_unbounded() {
                return Ok(Outcome::failure(format!(
                    "topic {topic_id} has no posts on page {page}"
                )));
            }

            Ok(Outcome::success(TopicView {
                forum_id: topic.forum_id,
                topic_id,
                forum_name: topic.forum_title,
                title: topic.title,
                posts,
                page,
            }))
        })
    }
}
