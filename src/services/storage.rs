// services/storage.rs
use crate::models::Session;
use crate::utils::error::{AppError, Result};
use std::path::PathBuf;
use std::sync::Mutex;

/// Backend de persistance de la session entre deux lancements du client
pub trait SessionStorage: Send + Sync {
    /// Recharge la session persistée, None si aucune
    fn load(&self) -> Result<Option<Session>>;

    /// Persiste la session courante
    fn store(&self, session: &Session) -> Result<()>;

    /// Supprime toute session persistée, sans erreur si absente
    fn clear(&self) -> Result<()>;
}

/// Persistance sur disque (un fichier JSON dans le répertoire de configuration)
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&content)
            .map_err(|e| AppError::ParseError(e.to_string()))?;

        Ok(Some(session))
    }

    fn store(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Persistance en mémoire seulement (tests et mode éphémère)
pub struct MemorySessionStorage {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }
}

impl Default for MemorySessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn store(&self, session: &Session) -> Result<()> {
        *self.inner.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}
