//! Outcome-typed query and command core for a forum database.
//! Every operation returns [`Outcome`]: success, expected failure, or fatal.

pub mod db;
pub mod logging;
pub mod model;
pub mod outcome;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::page::{PostWindow, POSTS_PER_PAGE};
pub use model::person::{NewPerson, PersonValidationError};
pub use model::views::{
    ForumSummaryView, ForumView, PersonView, PostView, SimpleForumSummaryView, SimplePostView,
    SimpleTopicSummaryView, SimpleTopicView, TopicView,
};
pub use model::{ForumId, PersonId, PostId, TopicId};
pub use outcome::{Outcome, OutcomeError};
pub use repo::{
    ForumRepository, ForumStore, PersonRepository, PostRepository, PreferenceRepository,
    RepoError, RepoResult, SqliteForumStore, TopicPreference, TopicRecord,
};
pub use service::QueryService;

/// Minimal health-check API for embedding callers.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
