use actix_web::{
    dev::Payload, error::ResponseError, http::StatusCode, web::Bytes, FromRequest, HttpRequest,
    HttpResponse,
};
use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;

/// JSON error body shared by every failing endpoint.
#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn response(status: StatusCode, error: impl Into<String>) -> HttpResponse {
        HttpResponse::build(status).json(Self {
            error: error.into(),
        })
    }
}

/// Decoded webhook body. The `Content-Type` header is not checked.
#[derive(Debug, Clone)]
pub struct WebhookPayload(pub Value);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("No payload received")]
    NoPayload,
    #[error("Invalid JSON payload")]
    InvalidJson(#[source] serde_json::Error),
    #[error("failed reading request data: {0}")]
    ActixError(#[from] actix_web::Error),
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::NoPayload => StatusCode::BAD_REQUEST,
            WebhookError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            WebhookError::ActixError(err) => err.as_response_error().status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        ErrorBody::response(self.status_code(), self.to_string())
    }
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` carry nothing to classify.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

pub fn decode(bytes: &[u8]) -> Result<Value, WebhookError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(WebhookError::NoPayload);
    }
    let value: Value = serde_json::from_slice(bytes).map_err(WebhookError::InvalidJson)?;
    if is_blank(&value) {
        return Err(WebhookError::NoPayload);
    }
    Ok(value)
}

impl FromRequest for WebhookPayload {
    type Error = WebhookError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;
    type Config = ();

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        Box::pin(
            Bytes::from_request(req, payload).map(|bytes| -> Result<Self, Self::Error> {
                let bytes = bytes?;
                decode(&bytes).map(Self)
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bodies_are_rejected() {
        for body in &["", "  \n", "null", "{}", "[]", "\"\"", "false", "0"] {
            assert!(
                matches!(decode(body.as_bytes()), Err(WebhookError::NoPayload)),
                "{:?} should count as no payload",
                body
            );
        }
    }

    #[test]
    fn garbage_is_invalid_json() {
        let err = decode(b"{\"pusher\":").unwrap_err();
        assert!(matches!(err, WebhookError::InvalidJson(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_object_documents_pass_through() {
        assert_eq!(decode(b"[1]").unwrap(), serde_json::json!([1]));
        assert_eq!(
            decode(b"{\"irrelevant\":\"data\"}").unwrap(),
            serde_json::json!({"irrelevant": "data"})
        );
    }
}
