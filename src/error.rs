use squaredup::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_is_transparent() {
        let err: AppError = ClientError::MissingApiKey.into();
        assert!(matches!(err, AppError::Client(_)));
        assert_eq!(err.to_string(), ClientError::MissingApiKey.to_string());
    }

    #[test]
    fn test_output_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Output(_)));
        assert!(err.to_string().starts_with("failed to render output"));
    }
}
