use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// API failure kinds with their HTTP status mapping.
///
/// One table for every handler; the only per-handler parameterization is
/// that lookup-list reads report storage failures as client-class errors
/// while business reads report them as server failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required identifier missing from the request (400)
    #[error("Business id is required")]
    MissingIdentifier,

    /// No matching row (404)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Storage failure on a business read (500)
    #[error("Failed to fetch {0}")]
    Storage(&'static str),

    /// Storage failure on a lookup-list read (400)
    #[error("Failed to fetch {0}")]
    LookupStorage(&'static str),
}

impl ApiError {
    /// Log the underlying storage error at the handler boundary and return
    /// the generic business-read kind.
    pub fn storage(resource: &'static str, err: sqlx::Error) -> Self {
        log::error!("Failed to fetch {resource}: {err:?}");
        Self::Storage(resource)
    }

    /// Same as [`ApiError::storage`] but for lookup-list reads.
    pub fn lookup_storage(resource: &'static str, err: sqlx::Error) -> Self {
        log::error!("Failed to fetch {resource}: {err:?}");
        Self::LookupStorage(resource)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingIdentifier => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::LookupStorage(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
