use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Failures raised while building, executing or mapping a registry query.
///
/// Every variant is fatal for the request that produced it. The pipeline never
/// retries and never returns a partial result set.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The registry database could not be reached.
    #[error("error opening database connection: {0}")]
    Connection(#[source] sqlx::Error),

    /// A statement failed to execute (malformed SQL, missing relation, ...).
    #[error("query error while {stage}: {source}")]
    QueryExecution {
        stage: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A column could not be decoded into its expected Rust type.
    #[error("error scanning {stage} row: {source}")]
    RowDecoding {
        stage: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The filed account category has no entry in the size rank table.
    #[error("company {company_number} has unknown account category '{category}'")]
    UnknownAccountCategory {
        company_number: String,
        category: String,
    },

    /// The filed account category column was null.
    #[error("company {company_number} has no account category")]
    MissingAccountCategory { company_number: String },

    /// The PSC kind code has no entry in the person type table.
    #[error("PSC of company {company_number} has unknown kind '{kind}'")]
    UnknownPersonKind {
        company_number: String,
        kind: String,
    },

    /// A text column that must hold a number did not parse.
    #[error("unable to convert {field} value '{value}': {reason}")]
    MalformedField {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Unauthorized access error.
    Unauthorized(String),
    /// The request body could not be read (too large, aborted stream).
    UnreadableBody {
        status: StatusCode,
        message: String,
    },
    /// The enrichment pipeline failed.
    Pipeline(PipelineError),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::UnreadableBody { status, message } => {
                write!(f, "Unreadable body ({}): {}", status, message)
            }
            AppError::Pipeline(e) => write!(f, "Pipeline error: {}", e),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::UnreadableBody { status, .. } => *status,
            AppError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::WithContext { source, .. } => source.status(),
        }
    }

    /// Message exposed to the client. Internal failures are never described.
    fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::UnreadableBody { message, .. } => message.clone(),
            AppError::Pipeline(_) => "Internal server error".to_string(),
            AppError::WithContext { source, .. } => source.public_message(),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every internal failure collapses to a single 500 outcome; only input
    /// validation and authorization are distinguished.
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(msg) => tracing::warn!("Rejected request: {}", msg),
            AppError::Unauthorized(msg) => tracing::warn!("Unauthorized access: {}", msg),
            AppError::UnreadableBody { status, message } => {
                tracing::warn!("Unreadable request body ({}): {}", status, message)
            }
            AppError::Pipeline(e) => tracing::error!("Pipeline error: {}", e),
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source)
            }
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Pipeline(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, PipelineError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::Pipeline(e)),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::Pipeline(e)),
            context: f(),
        })
    }
}
