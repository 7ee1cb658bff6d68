// core/upload_service.rs
use crate::api::ApiClient;
use crate::models::{ProgressReporter, UploadReceipt, VideoFile};
use crate::utils::error::{AppError, Result};
use crate::utils::helpers::format_file_size;
use crate::utils::validation::{validate_file_size, validate_filename, validate_media_type};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrateur d'upload : valide un fichier candidat, le soumet au backend
/// et publie un signal de progression pour la vue.
///
/// Au plus une tentative en vol par instance ; une soumission pendant qu'une
/// autre est en cours est rejetée, jamais mise en file.
pub struct UploadService {
    api: Arc<ApiClient>,
    max_upload_size_mb: u64,
    in_flight: Mutex<()>,
    progress_tx: Arc<watch::Sender<u8>>,
    progress_rx: watch::Receiver<u8>,
}

impl UploadService {
    pub fn new(api: Arc<ApiClient>, max_upload_size_mb: u64) -> Self {
        let (progress_tx, progress_rx) = watch::channel(0u8);

        Self {
            api,
            max_upload_size_mb,
            in_flight: Mutex::new(()),
            progress_tx: Arc::new(progress_tx),
            progress_rx,
        }
    }

    /// Signal de progression de la tentative courante (0-100).
    ///
    /// Monotone au sein d'une tentative ; n'atteint 100 qu'une fois l'échange
    /// confirmé par le serveur, et retombe à 0 entre deux tentatives.
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress_rx.clone()
    }

    /// Soumet un fichier vidéo au backend.
    ///
    /// Préconditions vérifiées localement, dans l'ordre : fichier non vide,
    /// taille maximale, type de média vidéo. La première violation interrompt
    /// la soumission sans émettre de requête.
    pub async fn submit(&self, file: &VideoFile) -> Result<UploadReceipt> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| AppError::UploadInProgress)?;

        validate_file_size(file.size_bytes, self.max_upload_size_mb)?;
        validate_media_type(&file.media_type)?;
        validate_filename(&file.file_name)?;

        let attempt_id = Uuid::new_v4();
        info!(
            "📤 Upload {}: {} ({})",
            attempt_id,
            file.file_name,
            format_file_size(file.size_bytes)
        );

        // Nouvelle tentative : remise à zéro du signal
        self.progress_tx.send_replace(0);

        let content = file.read_content().await?;
        let reporter = ProgressReporter::new(self.progress_tx.clone());

        match self
            .api
            .upload_video(&file.file_name, &file.media_type, content, reporter)
            .await
        {
            Ok(response) => {
                // 100 seulement une fois la fin confirmée par le serveur
                self.progress_tx.send_replace(100);
                info!("✅ Upload {} accepté, job {}", attempt_id, response.job_id);

                Ok(UploadReceipt {
                    job_id: response.job_id,
                    file_name: file.file_name.clone(),
                })
            }
            Err(e) => {
                self.progress_tx.send_replace(0);
                warn!("❌ Upload {} échoué: {}", attempt_id, e);
                Err(e)
            }
        }
    }
}
