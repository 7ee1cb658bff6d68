// src/lib.rs
// Modules principaux
pub mod models;
pub mod api;
pub mod core;
pub mod services;
pub mod utils;

// Ré-exports pour faciliter l'utilisation
pub use models::*;
pub use api::*;
pub use core::*;
pub use services::*;
pub use utils::*;

// Version de l'application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Watermark Remover Client";

// Types communs
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use uuid::Uuid;
pub use validator::Validate;

// Configuration par défaut pour les tests
#[cfg(test)]
pub mod test_utils {
    use std::sync::Once;

    static INIT: Once = Once::new();

    pub fn init_test_logging() {
        INIT.call_once(|| {
            tracing_subscriber::fmt().with_test_writer().init();
        });
    }
}
