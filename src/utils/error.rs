// utils/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Erreurs d'authentification
    #[error("Authentication required, please sign in again")]
    Unauthorized,

    // Erreurs de validation (locales, aucune requête n'est émise)
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File size must be less than {0}MB")]
    FileTooLarge(u64),

    #[error("File must be a video")]
    InvalidFileFormat,

    // Erreurs de jobs
    #[error("Job not found")]
    JobNotFound,

    #[error("Job not completed yet")]
    JobNotReady,

    #[error("An upload is already in progress")]
    UploadInProgress,

    // Erreurs de transport
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Transport(String),

    /// Erreur renvoyée par le backend (le champ `detail` est restitué tel quel)
    #[error("{message}")]
    Api { status: u16, message: String },

    // Erreurs de données
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    // Erreurs de stockage local
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Vrai si l'erreur provient d'une précondition locale (aucun appel réseau)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::FileTooLarge(_) | AppError::InvalidFileFormat
        )
    }

    /// Vrai si l'erreur impose une nouvelle authentification
    pub fn requires_login(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializeError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let error_messages: Vec<String> = errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect();

        AppError::Validation(messages.join("; "))
    }
}

// Type de résultat standard
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(AppError::Validation("x".to_string()).is_validation());
        assert!(AppError::FileTooLarge(500).is_validation());
        assert!(AppError::InvalidFileFormat.is_validation());
        assert!(!AppError::Unauthorized.is_validation());
        assert!(!AppError::Transport("down".to_string()).is_validation());
    }

    #[test]
    fn test_api_error_surfaces_backend_detail() {
        // Le message du backend doit être restitué tel quel
        let err = AppError::Api {
            status: 400,
            message: "Email already registered".to_string(),
        };
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_file_too_large_message() {
        let err = AppError::FileTooLarge(500);
        assert_eq!(err.to_string(), "File size must be less than 500MB");
    }
}
