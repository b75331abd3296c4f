use thiserror::Error;

#[derive(Debug, Error)]
pub enum QBittorrentError {
    #[error("Invalid base URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to build the request: {0}")]
    Build(String),

    #[error("Failed to execute the request to {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Authentication rejected with status {status} (the client IP may be banned after too many failed attempts)")]
    AuthRejected { status: u16 },

    #[error("No session cookie in login response")]
    MissingSessionCookie,

    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    #[error("Failed to decode {endpoint} response at '{path}': {source}")]
    Json {
        endpoint: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid torrent: {0}")]
    InvalidTorrent(String),
}

impl QBittorrentError {
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    /// Whether the caller has to (re)authenticate before issuing more commands
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::AuthRejected { .. } | Self::MissingSessionCookie => true,
            Self::Api { status_code, .. } => *status_code == 401 || *status_code == 403,
            _ => false,
        }
    }

    /// Whether the response body did not match the expected schema
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Json { .. })
    }
}
