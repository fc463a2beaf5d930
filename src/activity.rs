use std::fmt;

use chrono::{DateTime, Datelike as _, Utc};

/// Kind of repository activity an event was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Push,
    PullRequest,
    Merge,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Push => "push",
            ActionKind::PullRequest => "pull_request",
            ActionKind::Merge => "merge",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown action kind `{0}`")]
pub struct UnknownActionKind(pub String);

impl std::str::FromStr for ActionKind {
    type Err = UnknownActionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(ActionKind::Push),
            "pull_request" => Ok(ActionKind::PullRequest),
            "merge" => Ok(ActionKind::Merge),
            other => Err(UnknownActionKind(other.to_owned())),
        }
    }
}

/// Normalized record derived from a webhook event.
///
/// Instances are only built through [`Activity::push`], [`Activity::pull_request`]
/// and [`Activity::merge`], so `from_branch` is `None` exactly for pushes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Activity {
    pub action: ActionKind,
    pub author: Option<String>,
    pub from_branch: Option<String>,
    pub to_branch: String,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    pub fn push(author: Option<String>, to_branch: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            action: ActionKind::Push,
            author,
            from_branch: None,
            to_branch,
            timestamp,
        }
    }

    pub fn pull_request(
        author: Option<String>,
        from_branch: String,
        to_branch: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            action: ActionKind::PullRequest,
            author,
            from_branch: Some(from_branch),
            to_branch,
            timestamp,
        }
    }

    pub fn merge(
        author: Option<String>,
        from_branch: String,
        to_branch: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            action: ActionKind::Merge,
            author,
            from_branch: Some(from_branch),
            to_branch,
            timestamp,
        }
    }
}

struct When<'a>(&'a DateTime<Utc>);

impl fmt::Display for When<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = self.0.day();
        let suffix = match (day % 10, day % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        write!(
            f,
            "{}{} {}",
            day,
            suffix,
            self.0.format("%B %Y - %-I:%M %p UTC")
        )
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let author = self.author.as_deref().unwrap_or("someone");
        let from = self.from_branch.as_deref().unwrap_or_default();
        let when = When(&self.timestamp);
        match self.action {
            ActionKind::Push => write!(f, "{} pushed to {} on {}", author, self.to_branch, when),
            ActionKind::PullRequest => write!(
                f,
                "{} submitted a pull request from {} to {} on {}",
                author, from, self.to_branch, when
            ),
            ActionKind::Merge => write!(
                f,
                "{} merged branch {} to {} on {}",
                author, from, self.to_branch, when
            ),
        }
    }
}
