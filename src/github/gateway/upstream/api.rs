//! GitHub REST payloads and their conversion into domain models.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::{Comment, PullRequest, ReviewState, User, far_future};

/// Login reported for accounts GitHub has deleted.
const GHOST_LOGIN: &str = "ghost";

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) id: u64,
    pub(super) login: String,
    #[serde(default)]
    pub(super) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) id: u64,
    pub(super) number: u64,
    pub(super) html_url: String,
    pub(super) state: String,
    pub(super) user: Option<ApiUser>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: Option<DateTime<Utc>>,
    pub(super) closed_at: Option<DateTime<Utc>>,
    pub(super) merged_at: Option<DateTime<Utc>>,
}

/// Diff comment or issue (discussion) comment; both share this shape.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiComment {
    pub(super) id: u64,
    pub(super) html_url: String,
    pub(super) body: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReview {
    pub(super) id: u64,
    pub(super) html_url: String,
    pub(super) body: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) state: String,
    pub(super) submitted_at: Option<DateTime<Utc>>,
}

fn user_or_ghost(user: Option<ApiUser>) -> User {
    user.map_or_else(
        || User {
            id: 0,
            login: GHOST_LOGIN.to_owned(),
            html_url: None,
        },
        User::from,
    )
}

impl From<ApiUser> for User {
    fn from(value: ApiUser) -> Self {
        Self {
            id: value.id,
            login: value.login,
            html_url: value.html_url,
        }
    }
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            id: value.id,
            number: value.number,
            html_url: value.html_url,
            submitter: user_or_ghost(value.user),
            state: value.state,
            opened_at: value.created_at,
            updated_at: value.updated_at.unwrap_or(value.created_at),
            closed_at: value.closed_at.unwrap_or_else(far_future),
            merged_at: value.merged_at.unwrap_or_else(far_future),
            review_comments: Vec::new(),
            diff_comments: Vec::new(),
            commit_comments: Vec::new(),
            is_fully_interrogated: false,
        }
    }
}

impl From<ApiComment> for Comment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            html_url: value.html_url,
            text: value.body.unwrap_or_default(),
            author: user_or_ghost(value.user),
            created_at: value.created_at,
            updated_at: value.updated_at,
            review_state: None,
        }
    }
}

impl From<ApiReview> for Comment {
    fn from(value: ApiReview) -> Self {
        Self {
            id: value.id,
            html_url: value.html_url,
            text: value.body.unwrap_or_default(),
            author: user_or_ghost(value.user),
            // Pending reviews have no submission time yet.
            created_at: value.submitted_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            updated_at: None,
            review_state: ReviewState::from_github(&value.state),
        }
    }
}
