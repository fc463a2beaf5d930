use actix_web::{http::StatusCode, web, HttpResponse};
use chrono::{DateTime, Utc};

use crate::{
    activity::Activity,
    http::ErrorBody,
    store::{Store, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum ActionsError {
    #[error("failed to fetch actions: {0}")]
    Store(#[from] StoreError),
}

impl actix_web::ResponseError for ActionsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        ErrorBody::response(self.status_code(), "Failed to fetch actions")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct Actions {
    pub actions: Vec<Activity>,
}

pub async fn actions(store: web::Data<Store>) -> Result<web::Json<Actions>, ActionsError> {
    let actions = store.latest().await.map_err(|err| {
        tracing::error!("Failed to fetch actions: {}", err);
        ActionsError::from(err)
    })?;
    Ok(web::Json(Actions { actions }))
}

#[derive(Debug, serde::Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub async fn health() -> web::Json<Health> {
    web::Json(Health {
        status: "healthy",
        timestamp: Utc::now(),
    })
}
