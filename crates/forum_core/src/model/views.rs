//! Read views returned by the query service.
//!
//! Views are flat snapshots decoded once at the repository boundary. Post
//! numbers are 1-based positions inside a topic in ascending id order, the
//! same numbering used by topic pages.

use super::{ForumId, PostId, TopicId};
use serde::{Deserialize, Serialize};

/// Public profile of one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonView {
    pub name: String,
    pub username: String,
    /// `None` for people who are not students.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub student_id: Option<String>,
}

/// Forum id and title without topic information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleForumSummaryView {
    pub id: ForumId,
    pub title: String,
}

/// Topic id and title with its owning forum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTopicSummaryView {
    pub topic_id: TopicId,
    pub forum_id: ForumId,
    pub title: String,
}

/// Forum summary carrying the most recently created topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumSummaryView {
    pub id: ForumId,
    pub title: String,
    /// `None` when the forum has no topics yet.
    pub last_topic: Option<SimpleTopicSummaryView>,
}

/// Detail view of one forum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumView {
    pub id: ForumId,
    pub title: String,
    /// Topics in ascending id order.
    pub topics: Vec<SimpleTopicSummaryView>,
}

/// Lightweight post used by [`SimpleTopicView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePostView {
    pub post_id: PostId,
    pub author_name: String,
    pub text: String,
    /// Unix epoch seconds.
    pub posted_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTopicView {
    pub topic_id: TopicId,
    pub title: String,
    pub posts: Vec<SimplePostView>,
}

/// Full post view including author and like count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub forum_id: ForumId,
    pub topic_id: TopicId,
    pub post_id: PostId,
    pub post_number: i64,
    pub author_name: String,
    pub author_username: String,
    pub text: String,
    /// Unix epoch seconds.
    pub posted_at: i64,
    pub likes: i64,
}

/// One page (or all) of a topic's posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicView {
    pub forum_id: ForumId,
    pub topic_id: TopicId,
    pub forum_name: String,
    pub title: String,
    pub posts: Vec<PostView>,
    /// Requested page; `0` means all posts.
    pub page: u32,
}
