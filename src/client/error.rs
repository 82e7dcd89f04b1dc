use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("API error (status {status}{}): {message}", request_id_suffix(.request_id))]
    Api {
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("validation error on field {field:?}: {message}")]
    Validation { field: String, message: String },

    #[error("API key cannot be empty")]
    EmptyApiKey,

    #[error("invalid ISP metrics interval {0:?}: must be '5m' or '1h'")]
    InvalidInterval(String),
}

fn request_id_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(", request_id: {}", id),
        None => String::new(),
    }
}

impl Error {
    pub fn validation(field: &str, message: &str) -> Self {
        Error::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 401
    pub fn is_authentication(&self) -> bool {
        self.status() == Some(401)
    }

    /// 403
    pub fn is_permission(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_rate_limit(&self) -> bool {
        self.status() == Some(429)
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// The request never got a response: connect failure or timeout.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_connect() || e.is_timeout())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::EmptyApiKey | Error::InvalidInterval(_))
    }
}
