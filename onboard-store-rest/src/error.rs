use thiserror::Error;

/// Error type for building a [`RestConfig`](crate::RestConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the environment variables for a setting were set.
    #[error("Missing environment variable {0} (check your .env file)")]
    Missing(&'static str),

    /// The base URL could not be parsed.
    #[error("Invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The API key is not a three-part JWT with a JSON payload.
    #[error("Malformed API key: {0}")]
    MalformedKey(String),
}

/// Error type for the REST store.
#[derive(Debug, Error)]
pub enum RestError {
    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be built from the configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RestError {
    /// The HTTP status, if the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = ConfigError::Missing("SUPABASE_URL");
        assert_eq!(
            err.to_string(),
            "Missing environment variable SUPABASE_URL (check your .env file)"
        );

        let err = RestError::Status {
            status: 401,
            body: "no api key".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected status 401: no api key");
        assert_eq!(err.status(), Some(401));
    }
}
