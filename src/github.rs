use serde::{Deserialize, Deserializer};

/// Field that has to be present in the payload but may be `null`.
fn nullable<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de)
}

/// Only a literal JSON `true` counts; anything else reads as "not merged".
fn strictly_true<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(de).map(|v| v == serde_json::Value::Bool(true))
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "nullable")]
    pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pusher {
    #[serde(deserialize_with = "nullable")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub reference: String,
    pub pusher: Pusher,
}

impl PushEvent {
    /// Last `/`-separated segment of the pushed ref.
    pub fn branch(&self) -> &str {
        self.reference
            .rsplit('/')
            .next()
            .unwrap_or(&self.reference)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub user: User,
    pub head: BranchRef,
    pub base: BranchRef,
    #[serde(default, deserialize_with = "strictly_true")]
    pub merged: bool,
    #[serde(default)]
    pub merged_by: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub action: Option<serde_json::Value>,
    pub pull_request: PullRequest,
}

impl PullRequestEvent {
    /// The top-level `action`, if it is a string.
    pub fn action(&self) -> Option<&str> {
        self.action.as_ref().and_then(|a| a.as_str())
    }
}
