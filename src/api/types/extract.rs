//! Extractors that report rejections in the API error format
//!
//! Malformed bodies and path parameters are turned away here, before any
//! handler or service runs.

use axum::{
    extract::{rejection, FromRequest, FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body extractor/response wrapper around `axum::Json`
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// Path parameter extractor around `axum::extract::Path`
#[derive(Debug, Clone, Copy)]
pub struct Path<T>(pub T);

/// Extraction failure rendered as an API error
#[derive(Debug)]
pub struct ExtractRejection {
    status: StatusCode,
    message: String,
    code: &'static str,
}

impl IntoResponse for ExtractRejection {
    fn into_response(self) -> Response {
        let mut error = ApiError::bad_request(self.message).with_code(self.code);
        error.status = self.status;
        error.into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ExtractRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(ExtractRejection {
                status: rejection.status(),
                message: json_rejection_message(&rejection),
                code: "json_parse_error",
            }),
        }
    }
}

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ExtractRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(rejection) => Err(ExtractRejection {
                status: rejection.status(),
                message: format!("Invalid path parameter: {}", rejection.body_text()),
                code: "invalid_path_parameter",
            }),
        }
    }
}

fn json_rejection_message(rejection: &rejection::JsonRejection) -> String {
    use rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_status() {
        let rejection = ExtractRejection {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Missing Content-Type header".to_string(),
            code: "json_parse_error",
        };

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
