use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// État d'un job de traitement vidéo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,      // En attente dans la queue
    Processing,   // En cours de traitement
    Completed,    // Terminé avec succès
    Failed,       // Échec
    /// Tout statut non reconnu renvoyé par le backend
    #[serde(other)]
    Unknown,
}

/// Ton visuel associé à un statut (pour la carte du dashboard)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTone {
    Warning,
    Active,
    Success,
    Error,
    Neutral,
}

/// État d'affichage d'un job, dérivé du statut serveur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobDisplay {
    pub label: &'static str,
    pub tone: DisplayTone,
}

/// Un job de suppression de filigrane, copie locale immuable du snapshot serveur
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    /// ID unique du job
    pub id: i64,

    /// ID de l'utilisateur propriétaire
    pub user_id: i64,

    /// Nom du fichier d'origine
    pub original_filename: String,

    /// Chemin du fichier source côté serveur
    pub original_file_path: String,

    /// Chemin du fichier traité (présent une fois complété)
    pub processed_file_path: Option<String>,

    /// État actuel du job
    pub status: JobStatus,

    /// Message d'erreur en cas d'échec
    pub error_message: Option<String>,

    /// Date de début de traitement
    pub processing_started_at: Option<DateTime<Utc>>,

    /// Date de fin de traitement
    pub processing_completed_at: Option<DateTime<Utc>>,

    /// Date de création
    pub created_at: DateTime<Utc>,

    /// Date de mise à jour
    pub updated_at: DateTime<Utc>,
}

/// Snapshot de statut d'un job (endpoint de polling)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: i64,
    pub status: JobStatus,
    pub progress: Option<f64>,
    pub error_message: Option<String>,
}

/// Réponse d'upload réussi
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUploadResponse {
    pub job_id: i64,
    pub message: String,
}

/// Référence de téléchargement pour un job complété
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDownloadResponse {
    pub download_url: String,
    pub expires_at: DateTime<Utc>,
}

impl JobStatus {
    /// Mappe le statut serveur vers un état d'affichage, total par construction
    pub fn display(&self) -> JobDisplay {
        match self {
            JobStatus::Pending => JobDisplay {
                label: "Pending",
                tone: DisplayTone::Warning,
            },
            JobStatus::Processing => JobDisplay {
                label: "Processing",
                tone: DisplayTone::Active,
            },
            JobStatus::Completed => JobDisplay {
                label: "Completed",
                tone: DisplayTone::Success,
            },
            JobStatus::Failed => JobDisplay {
                label: "Failed",
                tone: DisplayTone::Error,
            },
            JobStatus::Unknown => JobDisplay {
                label: "Unknown",
                tone: DisplayTone::Neutral,
            },
        }
    }

    /// Vrai pour les états dont le job ne sortira plus
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl Job {
    /// Le résultat est téléchargeable uniquement une fois le job complété
    pub fn is_downloadable(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    fn job_json(status: &str) -> String {
        format!(
            r#"{{
                "id": 1,
                "user_id": 42,
                "original_filename": "clip.mp4",
                "original_file_path": "uploads/42/clip.mp4",
                "processed_file_path": null,
                "status": "{}",
                "error_message": null,
                "processing_started_at": null,
                "processing_completed_at": null,
                "created_at": "2024-03-01T12:00:00Z",
                "updated_at": "2024-03-01T12:00:00Z"
            }}"#,
            status
        )
    }

    #[test]
    fn test_known_statuses_deserialize() {
        for (raw, expected) in [
            ("pending", JobStatus::Pending),
            ("processing", JobStatus::Processing),
            ("completed", JobStatus::Completed),
            ("failed", JobStatus::Failed),
        ] {
            let job: Job = serde_json::from_str(&job_json(raw)).unwrap();
            assert_eq!(job.status, expected);
        }
    }

    #[test]
    fn test_unrecognized_status_degrades_to_unknown() {
        // Un statut inconnu ne doit jamais faire échouer la désérialisation
        for raw in ["archived", "CANCELLED", "", "42"] {
            let job: Job = serde_json::from_str(&job_json(raw)).unwrap();
            assert_eq!(job.status, JobStatus::Unknown);
            assert_eq!(job.status.display().label, "Unknown");
            assert_eq!(job.status.display().tone, DisplayTone::Neutral);
        }
    }

    #[test]
    fn test_display_mapping_is_total() {
        let cases = [
            (JobStatus::Pending, "Pending", DisplayTone::Warning),
            (JobStatus::Processing, "Processing", DisplayTone::Active),
            (JobStatus::Completed, "Completed", DisplayTone::Success),
            (JobStatus::Failed, "Failed", DisplayTone::Error),
            (JobStatus::Unknown, "Unknown", DisplayTone::Neutral),
        ];

        for (status, label, tone) in cases {
            let display = status.display();
            assert_eq!(display.label, label);
            assert_eq!(display.tone, tone);
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let response = JobStatusResponse {
            job_id: 3,
            status: JobStatus::Processing,
            progress: Some(50.0),
            error_message: None,
        };

        assert_json_include!(
            actual: serde_json::to_value(&response).unwrap(),
            expected: json!({ "job_id": 3, "status": "processing" })
        );
    }
}
