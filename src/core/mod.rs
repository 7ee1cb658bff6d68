// core/mod.rs
pub mod session_service;
pub mod upload_service;
pub mod job_service;

// Ré-exports pour faciliter l'import
pub use session_service::SessionService;
pub use upload_service::UploadService;
pub use job_service::{JobService, RefreshHandle, status_line};
