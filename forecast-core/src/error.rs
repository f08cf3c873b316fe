use thiserror::Error;

/// Exit status for anything that is not a usage or availability problem.
pub const EX_GENERAL: u8 = 1;
/// Exit status for bad command-line input (`sysexits.h` `EX_USAGE`).
pub const EX_USAGE: u8 = 64;
/// Exit status for a failed forecast download (`sysexits.h` `EX_UNAVAILABLE`).
pub const EX_UNAVAILABLE: u8 = 69;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a run can fail. Each variant maps onto one process exit code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to retrieve weather data: {}", status_line(.status, .reason))]
    Unavailable { status: Option<u16>, reason: String },

    #[error("Unexpected weather data: {0}")]
    Data(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(_) => EX_USAGE,
            Error::Unavailable { .. } => EX_UNAVAILABLE,
            Error::Data(_) | Error::Template(_) | Error::Config(_) => EX_GENERAL,
        }
    }

    /// The request URL is stripped: its query string may carry an API key.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Error::Unavailable {
            status: err.status().map(|s| s.as_u16()),
            reason: err.without_url().to_string(),
        }
    }

    pub(crate) fn status(status: reqwest::StatusCode) -> Self {
        Error::Unavailable {
            status: Some(status.as_u16()),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

fn status_line(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("{code} {reason}"),
        None => reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_sysexits() {
        assert_eq!(Error::Usage("bad".into()).exit_code(), 64);
        assert_eq!(
            Error::Unavailable { status: Some(503), reason: "Service Unavailable".into() }
                .exit_code(),
            69
        );
        assert_eq!(Error::Data("short".into()).exit_code(), 1);
        assert_eq!(Error::Template("missing".into()).exit_code(), 1);
        assert_eq!(Error::Config("broken".into()).exit_code(), 1);
    }

    #[test]
    fn unavailable_message_includes_status() {
        let err = Error::status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Failed to retrieve weather data: 404 Not Found");

        let err = Error::Unavailable { status: None, reason: "connection refused".into() };
        assert_eq!(err.to_string(), "Failed to retrieve weather data: connection refused");
    }
}
