/// Broad classification of an [`AppError`].
///
/// The kind decides two things: the process exit code for CLI commands and
/// whether the message is safe to hand back to an HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad flags, missing or malformed artifacts.
    Config,
    /// The caller sent something we cannot use (bad JSON, bad date, ...).
    InvalidInput,
    /// `filter` named a mode the load query does not know.
    UnsupportedFilter,
    /// The dataset could not be read or holds nothing usable.
    Data,
    /// Scaler/model failures and other invariant breaks.
    Internal,
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::Config | ErrorKind::InvalidInput | ErrorKind::UnsupportedFilter => 2,
            ErrorKind::Data => 3,
            ErrorKind::Internal => 4,
        }
    }

    /// Message suitable for a response body.
    ///
    /// Only errors raised from caller input are echoed; everything else may
    /// carry file paths or model internals and is replaced by a fixed string.
    pub fn public_message(&self) -> &str {
        match self.kind {
            ErrorKind::InvalidInput | ErrorKind::UnsupportedFilter => &self.message,
            ErrorKind::Config | ErrorKind::Data | ErrorKind::Internal => "internal error",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_messages_are_not_exposed() {
        let err = AppError::internal("scaler.json: column 3 scale is zero");
        assert_eq!(err.public_message(), "internal error");
        assert_eq!(err.to_string(), "scaler.json: column 3 scale is zero");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn input_messages_are_echoed() {
        let err = AppError::invalid_input("Invalid date 'x'");
        assert_eq!(err.public_message(), "Invalid date 'x'");
        assert_eq!(err.exit_code(), 2);
    }
}
