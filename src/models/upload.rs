use crate::utils::error::{AppError, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

/// Contenu d'un fichier candidat à l'upload
#[derive(Debug, Clone)]
enum VideoSource {
    Path(PathBuf),
    Memory(Bytes),
}

/// Fichier vidéo sélectionné par l'utilisateur, avant soumission
#[derive(Debug, Clone)]
pub struct VideoFile {
    /// Nom du fichier tel qu'il sera transmis au backend
    pub file_name: String,

    /// Type de média déclaré (doit être un type video/*)
    pub media_type: String,

    /// Taille déclarée en octets
    pub size_bytes: u64,

    source: VideoSource,
}

/// Résultat d'une soumission acceptée par le backend
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub job_id: i64,
    pub file_name: String,
}

impl VideoFile {
    /// Construit un fichier candidat depuis le disque, sans lire son contenu
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::Validation("Invalid file path".to_string()))?
            .to_string();

        let metadata = std::fs::metadata(path)
            .map_err(|e| AppError::Validation(format!("Cannot read file: {}", e)))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Ok(Self {
            file_name,
            media_type: media_type_for_extension(&extension).to_string(),
            size_bytes: metadata.len(),
            source: VideoSource::Path(path.to_path_buf()),
        })
    }

    /// Construit un fichier candidat depuis un contenu en mémoire
    pub fn from_bytes(file_name: &str, media_type: &str, content: Bytes) -> Self {
        Self {
            file_name: file_name.to_string(),
            media_type: media_type.to_string(),
            size_bytes: content.len() as u64,
            source: VideoSource::Memory(content),
        }
    }

    /// Lit le contenu complet, après validation seulement
    pub(crate) async fn read_content(&self) -> Result<Bytes> {
        match &self.source {
            VideoSource::Memory(content) => Ok(content.clone()),
            VideoSource::Path(path) => {
                let content = tokio::fs::read(path)
                    .await
                    .map_err(|e| AppError::Storage(e.to_string()))?;
                Ok(Bytes::from(content))
            }
        }
    }
}

/// Type de média déduit de l'extension (même liste que le formulaire d'upload)
pub fn media_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Émetteur de progression monotone pour un upload en cours.
///
/// La fraction publiée ne décroît jamais au sein d'une même tentative et
/// n'atteint 100 que lorsque le serveur a confirmé la fin de l'échange.
#[derive(Clone)]
pub struct ProgressReporter {
    tx: Arc<watch::Sender<u8>>,
}

impl ProgressReporter {
    pub fn new(tx: Arc<watch::Sender<u8>>) -> Self {
        Self { tx }
    }

    /// Publie une progression, ignorée si elle ferait reculer la valeur courante
    pub fn report(&self, percent: u8) {
        self.tx.send_if_modified(|current| {
            let clamped = percent.min(100);
            if clamped > *current {
                *current = clamped;
                true
            } else {
                false
            }
        });
    }
}
