// utils/config.rs
use crate::utils::error::{AppError, Result};
use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Environnement
    pub run_mode: String,
    pub log_level: String,
    pub log_format: String,

    // API
    pub api_base_url: String,
    pub request_timeout_seconds: u64,

    // Upload
    pub upload_timeout_seconds: u64,
    pub max_upload_size_mb: u64,

    // Suivi des jobs
    pub poll_interval_seconds: u64,
    pub poll_max_interval_seconds: u64,
    pub poll_deadline_seconds: u64,

    // Session persistée
    pub session_file: PathBuf,
}

impl Config {
    /// Charger la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self> {
        // Charger le fichier .env si présent
        let _ = dotenv().ok();

        let config = Config {
            // Environnement
            run_mode: env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),

            // API
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("REQUEST_TIMEOUT_SECONDS must be a number".to_string())
                })?,

            // Upload
            upload_timeout_seconds: env::var("UPLOAD_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("UPLOAD_TIMEOUT_SECONDS must be a number".to_string())
                })?,
            max_upload_size_mb: env::var("MAX_UPLOAD_SIZE_MB")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("MAX_UPLOAD_SIZE_MB must be a number".to_string())
                })?,

            // Suivi des jobs
            poll_interval_seconds: env::var("POLL_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("POLL_INTERVAL_SECONDS must be a number".to_string())
                })?,
            poll_max_interval_seconds: env::var("POLL_MAX_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("POLL_MAX_INTERVAL_SECONDS must be a number".to_string())
                })?,
            poll_deadline_seconds: env::var("POLL_DEADLINE_SECONDS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("POLL_DEADLINE_SECONDS must be a number".to_string())
                })?,

            // Session persistée
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| Self::default_session_file()),
        };

        Ok(config)
    }

    /// Chemin par défaut du fichier de session (~/.config/watermark-client/session.json)
    fn default_session_file() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("watermark-client")
            .join("session.json")
    }

    /// Vérifier si on est en production
    pub fn is_production(&self) -> bool {
        self.run_mode == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_mode: "development".to_string(),
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_seconds: 30,
            upload_timeout_seconds: 300,
            max_upload_size_mb: 500,
            poll_interval_seconds: 5,
            poll_max_interval_seconds: 60,
            poll_deadline_seconds: 1800,
            session_file: Self::default_session_file(),
        }
    }
}
