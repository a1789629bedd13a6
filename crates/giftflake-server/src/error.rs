use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// A core error on its way to an HTTP client.
///
/// Failures keep their identity: transient clock conditions map to 503 so
/// load balancers retry elsewhere, while malformed identifiers are the
/// caller's fault and map to 400.
#[derive(Debug)]
pub struct ApiError(giftflake::Error);

impl ApiError {
    fn code(&self) -> &'static str {
        match &self.0 {
            giftflake::Error::FieldOutOfRange { .. } => "field_out_of_range",
            giftflake::Error::ReservedBitSet { .. } => "reserved_bit_set",
            giftflake::Error::MalformedId { .. } => "invalid_request",
            giftflake::Error::ClockBeforeEpoch { .. } => "clock_before_epoch",
            giftflake::Error::ClockRegression { .. } => "clock_regression",
            giftflake::Error::EpochOverflow { .. } => "epoch_overflow",
            _ => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match &self.0 {
            giftflake::Error::FieldOutOfRange { .. }
            | giftflake::Error::ReservedBitSet { .. }
            | giftflake::Error::MalformedId { .. } => StatusCode::BAD_REQUEST,
            giftflake::Error::ClockBeforeEpoch { .. }
            | giftflake::Error::ClockRegression { .. }
            | giftflake::Error::EpochOverflow { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        let status = self.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!("generator unavailable: {}", self.0);
        } else if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("generator failure: {}", self.0);
        }
        self.0.to_string()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.message()
            }
        });
        (status, Json(body)).into_response()
    }
}

impl From<giftflake::Error> for ApiError {
    fn from(e: giftflake::Error) -> Self {
        ApiError(e)
    }
}
