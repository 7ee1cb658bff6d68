// utils/validation.rs
use crate::utils::error::{AppError, Result};
use validator::Validate;

/// Valider un email
pub fn validate_email(email: &str) -> Result<()> {
    if !validator::validate_email(email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

/// Valider un mot de passe
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    Ok(())
}

/// Valider la confirmation d'un mot de passe (aucun appel réseau)
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

/// Valider un nom de fichier
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(AppError::Validation("Filename cannot be empty".to_string()));
    }

    if filename.len() > 255 {
        return Err(AppError::Validation(
            "Filename too long (max 255 characters)".to_string(),
        ));
    }

    // Éviter les chemins relatifs
    if filename.contains("..") || filename.contains("/") || filename.contains("\\") {
        return Err(AppError::Validation("Invalid filename".to_string()));
    }

    Ok(())
}

/// Valider une taille de fichier
pub fn validate_file_size(file_size: u64, max_size_mb: u64) -> Result<()> {
    let max_size_bytes = max_size_mb * 1024 * 1024;

    if file_size == 0 {
        return Err(AppError::Validation("File cannot be empty".to_string()));
    }

    if file_size > max_size_bytes {
        return Err(AppError::FileTooLarge(max_size_mb));
    }

    Ok(())
}

/// Valider le type de média déclaré (seules les vidéos sont acceptées)
pub fn validate_media_type(media_type: &str) -> Result<()> {
    if !media_type.starts_with("video/") {
        return Err(AppError::InvalidFileFormat);
    }
    Ok(())
}

/// Fonction utilitaire pour valider un objet Validate
pub fn validate_object<T: Validate>(obj: &T) -> Result<()> {
    obj.validate().map_err(|e| AppError::Validation(e.to_string()))
}
