use actix_web::{http::StatusCode, HttpResponse};
use askama::Template;

/// Seconds between `/api/actions` polls made by the page.
const POLL_INTERVAL_SECS: u64 = 15;

#[derive(Debug, Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    title: &'static str,
    poll_interval_secs: u64,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to render page: {0}")]
pub struct RenderError(#[from] askama::Error);

impl actix_web::ResponseError for RenderError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub async fn index() -> Result<HttpResponse, RenderError> {
    let page = IndexTemplate {
        title: "GitHub Webhook Monitor",
        poll_interval_secs: POLL_INTERVAL_SECS,
    }
    .render()
    .map_err(|err| {
        tracing::error!("Failed to render index page: {}", err);
        RenderError::from(err)
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page))
}
