use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};

use crate::{
    classifier,
    http::{ErrorBody, WebhookPayload},
    store::{Inserted, Store, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to store activity: {0}")]
    Store(#[from] StoreError),
}

impl actix_web::ResponseError for HookError {
    fn status_code(&self) -> StatusCode {
        match self {
            HookError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        ErrorBody::response(self.status_code(), "Internal server error")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HookStatus {
    pub status: &'static str,
    pub message: &'static str,
}

impl HookStatus {
    const SUCCESS: Self = Self {
        status: "success",
        message: "Webhook processed successfully",
    };
    const IGNORED: Self = Self {
        status: "ignored",
        message: "Event not relevant",
    };
}

/// GitHub's unique id for a delivery, repeated when a delivery is retried.
const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

pub async fn webhook(
    req: HttpRequest,
    WebhookPayload(raw): WebhookPayload,
    store: web::Data<Store>,
) -> Result<web::Json<HookStatus>, HookError> {
    let activity = match classifier::classify(&raw) {
        Some(activity) => activity,
        None => return Ok(web::Json(HookStatus::IGNORED)),
    };
    let delivery = req
        .headers()
        .get(DELIVERY_HEADER)
        .and_then(|value| value.to_str().ok());

    match store.insert(&activity, delivery).await {
        Ok(Inserted::Stored) => tracing::info!("Stored activity: {}", activity),
        Ok(Inserted::Duplicate) => tracing::info!(
            "Delivery {:?} was already stored, skipping: {}",
            delivery,
            activity
        ),
        Err(err @ StoreError::Timeout(_)) => {
            tracing::warn!(
                delivery = delivery.unwrap_or("-"),
                "Storing activity `{}` may or may not have succeeded: {}",
                activity,
                err
            );
            return Err(err.into());
        }
        Err(err) => {
            tracing::error!("Failed to store activity `{}`: {}", activity, err);
            return Err(err.into());
        }
    }

    Ok(web::Json(HookStatus::SUCCESS))
}
