//! Forum query service.
//!
//! # Responsibility
//! - Expose every forum read and write as an [`Outcome`]-returning call.
//! - Check write preconditions in order before any mutation.
//! - Classify repository errors: misses become `Failure`, store breakage
//!   becomes `Fatal` and is logged.
//!
//! # Invariants
//! - No operation panics or returns `Err` for an expected condition.
//! - The service never owns or closes the underlying connection.

use crate::model::TopicId;
use crate::outcome::Outcome;
use crate::repo::{ForumStore, RepoError, RepoResult};
use log::{debug, error, info};
use std::time::Instant;

mod reads;
mod writes;

/// Outcome-typed facade over a [`ForumStore`].
pub struct QueryService<S: ForumStore> {
    store: S,
}

impl<S: ForumStore> QueryService<S> {
    /// Creates a service over an already validated store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs one operation body and turns its result into an outcome,
    /// logging the final status.
    fn run<T>(
        &self,
        op: &'static str,
        body: impl FnOnce(&S) -> RepoResult<Outcome<T>>,
    ) -> Outcome<T> {
        let started_at = Instant::now();
        let outcome = match body(&self.store) {
            Ok(outcome) => outcome,
            Err(err) => classify(err),
        };
        log_outcome(op, &outcome, started_at);
        outcome
    }
}

pub(super) fn no_topic<T>(topic_id: TopicId) -> Outcome<T> {
    Outcome::failure(format!("no topic with id {topic_id}"))
}

fn classify<T>(err: RepoError) -> Outcome<T> {
    if err.is_precondition_failure() {
        Outcome::failure(err.to_string())
    } else {
        Outcome::fatal(err.to_string())
    }
}

fn log_outcome<T>(op: &'static str, outcome: &Outcome<T>, started_at: Instant) {
    let duration_ms = started_at.elapsed().as_millis();
    match outcome {
        Outcome::Success(_) => debug!(
            "event=forum_query module=service op={op} status=ok duration_ms={duration_ms}"
        ),
        Outcome::Failure(message) => info!(
            "event=forum_query module=service op={op} status=failure duration_ms={duration_ms} reason={message}"
        ),
        Outcome::Fatal(message) => error!(
            "event=forum_query module=service op={op} status=fatal duration_ms={duration_ms} error={message}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::classify;
    use crate::db::DbError;
    use crate::outcome::Outcome;
    use crate::repo::RepoError;

    #[test]
    fn misses_classify_as_failure() {
        let outcome: Outcome<()> = classify(RepoError::TopicNotFound(4));
        assert_eq!(outcome, Outcome::Failure("no topic with id 4".to_string()));

        let outcome: Outcome<()> = classify(RepoError::PersonNotFound("bob".to_string()));
        assert!(outcome.is_failure());

        let outcome: Outcome<()> = classify(RepoError::UsernameTaken("bob".to_string()));
        assert_eq!(
            outcome,
            Outcome::Failure("username `bob` is already taken".to_string())
        );
        assert!(classify::<()>(RepoError::ForumTitleTaken("X".to_string())).is_failure());
    }

    #[test]
    fn store_errors_classify_as_fatal() {
        let sqlite = rusqlite::Error::InvalidQuery;
        let outcome: Outcome<()> = classify(RepoError::Db(DbError::Sqlite(sqlite)));
        assert!(outcome.is_fatal());
    }

    #[test]
    fn rollback_failure_is_distinct_fatal() {
        let outcome: Outcome<()> = classify(RepoError::RollbackFailed {
            error: Box::new(RepoError::InvalidData("boom".to_string())),
            rollback_error: rusqlite::Error::InvalidQuery,
        });
        assert!(outcome.is_fatal());
        assert!(outcome.message().unwrap_or_default().starts_with("rollback failed"));
    }
}
