// api/mod.rs
pub mod client;
mod auth;
mod jobs;
mod subscriptions;
mod videos;

// Ré-exports pour faciliter l'import
pub use client::ApiClient;
