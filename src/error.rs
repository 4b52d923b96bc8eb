use thiserror::Error;

/// Faults raised while talking to the catalog or reading a remote source.
///
/// `op` names the remote operation so two faults with the same cause on
/// different endpoints stay distinguishable in the final report.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{} during \"{}\" request: {}", transport_kind(.source), .op, .source)]
    Transport {
        op: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("\"{op}\" request returned an unexpected response: {body}")]
    UnexpectedContent { op: String, body: String },
    #[error("\"{op}\" response failed validation: {reason}")]
    Validation { op: String, reason: String },
    #[error("\"{op}\" request failed with status {status}. {message}")]
    Status {
        op: String,
        status: u16,
        message: String,
    },
    #[error("{page}: {reason}")]
    Scrape { page: String, reason: String },
    #[error("bad filename structure (\"{0}\"). cannot get set id.")]
    BadFileName(String),
}

fn transport_kind(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "Timeout"
    } else {
        "Network error"
    }
}

impl ImportError {
    pub fn transport(op: impl Into<String>, source: reqwest::Error) -> Self {
        ImportError::Transport {
            op: op.into(),
            source,
        }
    }

    pub fn validation(op: impl Into<String>, reason: impl ToString) -> Self {
        ImportError::Validation {
            op: op.into(),
            reason: reason.to_string(),
        }
    }

    pub fn scrape(page: impl Into<String>, reason: impl Into<String>) -> Self {
        ImportError::Scrape {
            page: page.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ImportError> = std::result::Result<T, E>;
