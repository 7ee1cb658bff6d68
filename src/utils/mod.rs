// utils/mod.rs
pub mod error;
pub mod config;
pub mod validation;
pub mod helpers;

// Ré-exports pour faciliter l'import
pub use error::{AppError, Result};
pub use config::Config;
pub use validation::{
    validate_email, validate_password, validate_password_confirmation,
    validate_filename, validate_file_size, validate_media_type,
    validate_object,
};
pub use helpers::{format_date, format_file_size};
