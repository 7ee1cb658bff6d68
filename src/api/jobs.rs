// api/jobs.rs
use crate::api::client::ApiClient;
use crate::models::{Job, JobStatusResponse, VideoDownloadResponse};
use crate::utils::error::Result;

impl ApiClient {
    /// Liste complète des jobs de l'utilisateur, du plus récent au plus ancien
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.get_json("/api/jobs").await
    }

    /// Snapshot de statut d'un job unique
    pub async fn job_status(&self, job_id: i64) -> Result<JobStatusResponse> {
        self.get_json(&format!("/api/jobs/{}/status", job_id)).await
    }

    /// Référence de téléchargement du résultat d'un job complété
    pub async fn download_job(&self, job_id: i64) -> Result<VideoDownloadResponse> {
        self.get_json(&format!("/api/jobs/{}/download", job_id)).await
    }
}
