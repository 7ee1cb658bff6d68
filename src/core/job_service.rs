// core/job_service.rs
use crate::api::ApiClient;
use crate::models::{Job, JobStatus, JobStatusResponse, VideoDownloadResponse};
use crate::utils::config::Config;
use crate::utils::error::{AppError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Registre des jobs de l'utilisateur : snapshot local de la liste serveur,
/// action de téléchargement et suivi d'un job jusqu'à son état terminal.
pub struct JobService {
    api: Arc<ApiClient>,
    jobs: RwLock<Vec<Job>>,
    poll_interval: Duration,
    poll_max_interval: Duration,
    poll_deadline: Duration,
}

/// Poignée du rafraîchissement périodique ; `stop()` (ou le drop) arrête la tâche
pub struct RefreshHandle {
    handle: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl JobService {
    pub fn new(api: Arc<ApiClient>, config: &Config) -> Self {
        Self {
            api,
            jobs: RwLock::new(Vec::new()),
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            poll_max_interval: Duration::from_secs(config.poll_max_interval_seconds),
            poll_deadline: Duration::from_secs(config.poll_deadline_seconds),
        }
    }

    /// Recharge la liste complète des jobs et remplace le snapshot en bloc.
    /// En cas d'échec, le snapshot précédent est conservé tel quel.
    pub async fn refresh(&self) -> Result<Vec<Job>> {
        let jobs = self.api.list_jobs().await?;

        let mut guard = self.jobs.write().await;
        *guard = jobs.clone();

        Ok(jobs)
    }

    /// Copie du snapshot local courant
    pub async fn jobs(&self) -> Vec<Job> {
        self.jobs.read().await.clone()
    }

    /// Recherche un job dans le snapshot local
    pub async fn job(&self, job_id: i64) -> Option<Job> {
        self.jobs
            .read()
            .await
            .iter()
            .find(|j| j.id == job_id)
            .cloned()
    }

    /// Snapshot de statut d'un job unique (sans toucher à la liste locale)
    pub async fn job_status(&self, job_id: i64) -> Result<JobStatusResponse> {
        self.api.job_status(job_id).await
    }

    /// Référence de téléchargement du résultat.
    ///
    /// Valide uniquement pour un job complété du snapshot local ; un job
    /// non terminé est refusé sans appel réseau.
    pub async fn download(&self, job_id: i64) -> Result<VideoDownloadResponse> {
        let job = self.job(job_id).await.ok_or(AppError::JobNotFound)?;

        if !job.is_downloadable() {
            return Err(AppError::JobNotReady);
        }

        self.api.download_job(job_id).await
    }

    /// Interroge le statut d'un job jusqu'à un état terminal.
    ///
    /// Intervalle avec backoff exponentiel plafonné ; l'attente totale est
    /// bornée par la deadline configurée. Un échec de requête est remonté
    /// immédiatement, sans retry.
    pub async fn poll_until_terminal(&self, job_id: i64) -> Result<JobStatusResponse> {
        let deadline = tokio::time::Instant::now() + self.poll_deadline;
        let mut interval = self.poll_interval;

        loop {
            let status = self.api.job_status(job_id).await?;

            if status.status.is_terminal() {
                info!("🏁 Job {} terminé: {}", job_id, status.status.display().label);
                return Ok(status);
            }

            if tokio::time::Instant::now() + interval > deadline {
                return Err(AppError::Timeout(self.poll_deadline.as_secs()));
            }

            tokio::time::sleep(interval).await;
            interval = (interval * 2).min(self.poll_max_interval);
        }
    }

    /// Démarre le rafraîchissement périodique du snapshot.
    ///
    /// La cadence revient à l'intervalle nominal après chaque succès et
    /// s'espace en backoff après un échec. La poignée retournée arrête la
    /// tâche ; sans elle le dashboard resterait figé sur un état périmé.
    pub fn start_auto_refresh(self: &Arc<Self>, interval: Duration) -> RefreshHandle {
        let service = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut delay = interval;

            loop {
                tokio::time::sleep(delay).await;

                match service.refresh().await {
                    Ok(_) => {
                        delay = interval;
                    }
                    Err(e) => {
                        warn!("⚠️  Rafraîchissement des jobs échoué: {}", e);
                        delay = (delay * 2).min(service.poll_max_interval);
                    }
                }
            }
        });

        RefreshHandle { handle }
    }
}

/// Ligne de statut affichable pour une carte de job.
/// Un job échoué restitue le message d'erreur du serveur tel quel.
pub fn status_line(job: &Job) -> String {
    match job.status {
        JobStatus::Failed => match &job.error_message {
            Some(message) => format!("Failed: {}", message),
            None => "Failed".to_string(),
        },
        status => status.display().label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SessionStore;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn job_body(id: i64, status: &str, error_message: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "user_id": 42,
            "original_filename": format!("clip-{}.mp4", id),
            "original_file_path": format!("uploads/42/clip-{}.mp4", id),
            "processed_file_path": null,
            "status": status,
            "error_message": error_message,
            "processing_started_at": null,
            "processing_completed_at": null,
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z"
        })
    }

    fn service_for(server: &MockServer) -> Arc<JobService> {
        let config = Config {
            api_base_url: server.uri(),
            poll_interval_seconds: 0,
            poll_max_interval_seconds: 1,
            poll_deadline_seconds: 5,
            ..Config::default()
        };
        let store = Arc::new(SessionStore::in_memory());
        let api = Arc::new(ApiClient::new(&config, store).unwrap());
        Arc::new(JobService::new(api, &config))
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot_wholesale() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                job_body(1, "pending", None),
                job_body(2, "processing", None)
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([job_body(3, "completed", None)])),
            )
            .mount(&server)
            .await;

        let service = service_for(&server);

        service.refresh().await.unwrap();
        assert_eq!(service.jobs().await.len(), 2);

        // Le second refresh remplace tout, il ne fusionne pas
        service.refresh().await.unwrap();
        let jobs = service.jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_retains_previous_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([job_body(1, "completed", None)])),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
            .mount(&server)
            .await;

        let service = service_for(&server);

        service.refresh().await.unwrap();
        assert_eq!(service.jobs().await.len(), 1);

        let result = service.refresh().await;
        assert!(result.is_err());

        // L'échec laisse l'ancien snapshot intact
        let jobs = service.jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, 1);
    }

    #[tokio::test]
    async fn test_download_refused_for_non_completed_jobs() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                job_body(1, "pending", None),
                job_body(2, "processing", None),
                job_body(3, "failed", Some("decode error"))
            ])))
            .mount(&server)
            .await;

        let service = service_for(&server);
        service.refresh().await.unwrap();

        for job_id in [1, 2, 3] {
            let result = service.download(job_id).await;
            assert!(matches!(result, Err(AppError::JobNotReady)));
        }

        // Le refus est local : seule la requête de liste a été émise
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_download_unknown_job() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let service = service_for(&server);
        service.refresh().await.unwrap();

        let result = service.download(99).await;
        assert!(matches!(result, Err(AppError::JobNotFound)));
    }

    #[tokio::test]
    async fn test_download_resolves_reference_for_completed_job() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([job_body(5, "completed", None)])),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/5/download"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "download_url": "https://storage.example.com/processed/5.mp4?sig=abc",
                "expires_at": "2024-03-01T13:00:00Z"
            })))
            .mount(&server)
            .await;

        let service = service_for(&server);
        service.refresh().await.unwrap();

        let reference = service.download(5).await.unwrap();
        assert_eq!(
            reference.download_url,
            "https://storage.example.com/processed/5.mp4?sig=abc"
        );
    }

    #[tokio::test]
    async fn test_dashboard_scenario_completed_and_failed_cards() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                job_body(1, "completed", None),
                job_body(2, "failed", Some("decode error"))
            ])))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let jobs = service.refresh().await.unwrap();

        let downloadable: Vec<_> = jobs.iter().filter(|j| j.is_downloadable()).collect();
        assert_eq!(downloadable.len(), 1);
        assert_eq!(downloadable[0].id, 1);

        // La carte en échec restitue le message d'erreur littéral
        assert_eq!(status_line(&jobs[1]), "Failed: decode error");
    }

    #[tokio::test]
    async fn test_poll_until_terminal_follows_status_transitions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/9/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "job_id": 9,
                "status": "processing",
                "progress": 40.0,
                "error_message": null
            })))
            .up_to_n_times(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/9/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "job_id": 9,
                "status": "completed",
                "progress": 100.0,
                "error_message": null
            })))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let terminal = service.poll_until_terminal(9).await.unwrap();

        assert_eq!(terminal.status, JobStatus::Completed);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_poll_until_terminal_propagates_request_failures() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/9/status"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let result = service.poll_until_terminal(9).await;

        // Pas de retry automatique : l'échec est rapporté une fois, immédiatement
        assert!(matches!(result, Err(AppError::Api { status: 500, .. })));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_status_line_for_each_state() {
        let make = |status: &str, error: Option<&str>| -> Job {
            serde_json::from_value(job_body(1, status, error)).unwrap()
        };

        assert_eq!(status_line(&make("pending", None)), "Pending");
        assert_eq!(status_line(&make("processing", None)), "Processing");
        assert_eq!(status_line(&make("completed", None)), "Completed");
        assert_eq!(status_line(&make("failed", None)), "Failed");
        assert_eq!(status_line(&make("archived", None)), "Unknown");
    }
}
