//! Write operations.
//!
//! Preconditions are checked in the documented order; the first miss
//! returns `Failure` and nothing is written.

use super::{no_topic, QueryService};
use crate::model::person::NewPerson;
use crate::model::TopicId;
use crate::outcome::Outcome;
use crate::repo::{ForumStore, TopicPreference};

impl<S: ForumStore> QueryService<S> {
    /// Creates a forum with a unique, non-empty title.
    ///
    /// The uniqueness check and the insert are atomic, so concurrent callers
    /// with the same title see exactly one `Success`.
    pub fn create_forum(&self, title: &str) -> Outcome<()> {
        if title.is_empty() {
            return Outcome::failure("forum title must not be empty");
        }
        self.run("create_forum", |store| {
            if store.insert_forum(title)? == 0 {
                return Ok(Outcome::failure("forum insert affected no rows"));
            }
            Ok(Outcome::success(()))
        })
    }

    /// Creates a post in an existing topic on behalf of an existing person.
    ///
    /// Checks, in order: non-empty text, topic exists, person exists.
    pub fn create_post(&self, topic_id: TopicId, username: &str, text: &str) -> Outcome<()> {
        if text.is_empty() {
            return Outcome::failure("post text must not be empty");
        }
        self.run("create_post", |store| {
            if !store.topic_exists(topic_id)? {
                return Ok(no_topic(topic_id));
            }
            let Some(author_id) = store.find_person_id(username)? else {
                return Ok(Outcome::failure(format!(
                    "no person with username `{username}`"
                )));
            };
            if store.insert_post(topic_id, author_id, text)? == 0 {
                return Ok(Outcome::failure("post insert affected no rows"));
            }
            Ok(Outcome::success(()))
        })
    }

    /// Adds a person.
    ///
    /// `student_id` must be `None` for non-students; `Some("")` is rejected.
    pub fn add_person(&self, name: &str, username: &str, student_id: Option<&str>) -> Outcome<()> {
        let person = match NewPerson::new(name, username, student_id) {
            Ok(person) => person,
            Err(err) => return Outcome::failure(err.to_string()),
        };
        self.run("add_person", |store| {
            store.insert_person(&person)?;
            Ok(Outcome::success(()))
        })
    }

    /// Likes (`like == true`) or unlikes a topic. Idempotent both ways.
    pub fn toggle_like(&self, username: &str, topic_id: TopicId, like: bool) -> Outcome<()> {
        self.toggle_preference("toggle_like", TopicPreference::Like, username, topic_id, like)
    }

    /// Sets or clears a topic as favourite. Same semantics as
    /// [`toggle_like`](Self::toggle_like).
    pub fn toggle_favourite(&self, username: &str, topic_id: TopicId, fav: bool) -> Outcome<()> {
        self.toggle_preference(
            "toggle_favourite",
            TopicPreference::Favourite,
            username,
            topic_id,
            fav,
        )
    }

    fn toggle_preference(
        &self,
        op: &'static str,
        preference: TopicPreference,
        username: &str,
        topic_id: TopicId,
        enabled: bool,
    ) -> Outcome<()> {
        self.run(op, |store| {
            store.set_topic_preference(preference, username, topic_id, enabled)?;
            Ok(Outcome::success(()))
        })
    }
}
