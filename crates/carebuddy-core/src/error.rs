use thiserror::Error;

/// Failure reported by the backend API collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("server returned {status}{}", suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(String),

    /// The buddy record was created but its documents were not stored.
    /// Retrying should upload to `buddy_id` instead of creating again.
    #[error("buddy {buddy_id} created but its documents failed: {cause}")]
    DocumentsFailed {
        buddy_id: String,
        cause: Box<ApiError>,
    },
}

impl ApiError {
    /// The collaborator's human-readable message, if it supplied one.
    pub fn detail(&self) -> Option<&str> {
        let msg = match self {
            ApiError::NotFound(m) | ApiError::Transport(m) => Some(m.as_str()),
            ApiError::Status { detail, .. } => detail.as_deref(),
            ApiError::Decode(_) => None,
            ApiError::DocumentsFailed { cause, .. } => return cause.detail(),
        };
        msg.map(str::trim).filter(|m| !m.is_empty())
    }
}

fn suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}

/// Local, pre-network rejection of the new-buddy form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("documents required")]
    DocumentsRequired,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CreateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend failure during creation; carries the user-facing message.
    #[error("{0}")]
    Submission(String),
}

impl CreateError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CreateError::Validation(_))
    }
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("invalid reporting period '{0}': expected today, week, or month")]
    InvalidPeriod(String),

    #[error("buddy id must not be empty")]
    EmptyBuddyId,

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Create(#[from] CreateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
