// Modèle: user.rs
pub mod user;
pub use user::{
    User, SubscriptionTier, Credentials,
    NewAccount, RegisterRequest, AuthToken,
};

// Modèle: job.rs
pub mod job;
pub use job::{
    Job, JobStatus, JobDisplay, DisplayTone,
    JobStatusResponse, VideoUploadResponse, VideoDownloadResponse,
};

// Modèle: session.rs
pub mod session;
pub use session::Session;

// Modèle: subscription.rs
pub mod subscription;
pub use subscription::{SubscriptionRequest, SubscriptionInfo};

// Modèle: upload.rs
pub mod upload;
pub use upload::{VideoFile, UploadReceipt, ProgressReporter, media_type_for_extension};
