//! Maps raw webhook bodies to [`Activity`] records.
//!
//! Only push and pull request payloads are recognized. The event kind is picked
//! by key presence (`pusher` first, then `pull_request`), and a payload that has
//! the key but not the expected structure is rejected outright rather than
//! tried against the next rule.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    activity::Activity,
    github::{PullRequestEvent, PushEvent},
};

#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("payload has neither `pusher` nor `pull_request`")]
    UnknownShape,
    #[error("malformed {kind} payload: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("pull request action {0:?} is not tracked")]
    UnhandledAction(Option<String>),
    #[error("pull request was closed without being merged")]
    ClosedWithoutMerge,
}

/// Classifies `raw`, stamping the result with the current time.
pub fn classify(raw: &Value) -> Option<Activity> {
    classify_at(raw, Utc::now())
}

/// Same as [`classify`] with an explicit capture time.
pub fn classify_at(raw: &Value, now: DateTime<Utc>) -> Option<Activity> {
    match try_classify(raw, now) {
        Ok(activity) => Some(activity),
        Err(err @ Rejection::Malformed { .. }) => {
            tracing::warn!("Discarding webhook event: {}", err);
            None
        }
        Err(err) => {
            tracing::debug!("Ignoring webhook event: {}", err);
            None
        }
    }
}

pub fn try_classify(raw: &Value, now: DateTime<Utc>) -> Result<Activity, Rejection> {
    let fields = raw.as_object().ok_or(Rejection::NotAnObject)?;

    if fields.contains_key("pusher") {
        let event: PushEvent = decode("push", raw)?;
        let branch = event.branch().to_owned();
        return Ok(Activity::push(event.pusher.name, branch, now));
    }

    if fields.contains_key("pull_request") {
        let event: PullRequestEvent = decode("pull_request", raw)?;
        return classify_pull_request(event, now);
    }

    Err(Rejection::UnknownShape)
}

fn classify_pull_request(event: PullRequestEvent, now: DateTime<Utc>) -> Result<Activity, Rejection> {
    let action = event.action().map(str::to_owned);
    let pr = event.pull_request;
    let from_branch = pr.head.reference;
    let to_branch = pr.base.reference;

    match action.as_deref() {
        Some("opened") | Some("synchronize") => Ok(Activity::pull_request(
            pr.user.login,
            from_branch,
            to_branch,
            now,
        )),
        Some("closed") if pr.merged => {
            let author = match pr.merged_by {
                Some(merger) => merger.login,
                None => pr.user.login,
            };
            Ok(Activity::merge(author, from_branch, to_branch, now))
        }
        Some("closed") => Err(Rejection::ClosedWithoutMerge),
        _ => Err(Rejection::UnhandledAction(action)),
    }
}

fn decode<T>(kind: &'static str, raw: &Value) -> Result<T, Rejection>
where
    T: serde::de::DeserializeOwned,
{
    T::deserialize(raw).map_err(|source| Rejection::Malformed { kind, source })
}
