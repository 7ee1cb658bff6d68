// services/session_store.rs
use crate::models::{Session, User};
use crate::services::storage::SessionStorage;
use crate::services::MemorySessionStorage;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Source de vérité unique de la session authentifiée.
///
/// L'état est possédé par cette structure et partagé par référence (`Arc`)
/// entre le gateway API et les services. Seuls le gestionnaire de session
/// (login/register/logout) et l'invalidation sur 401 du gateway le modifient.
pub struct SessionStore {
    session: RwLock<Option<Session>>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    /// Crée le store en réhydratant la session persistée (best-effort :
    /// un fichier absent ou corrompu donne un état déconnecté, jamais un crash)
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        let restored = match storage.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("⚠️  Session persistée illisible, démarrage déconnecté: {}", e);
                None
            }
        };

        if let Some(session) = &restored {
            match &session.user {
                Some(user) => info!("🔐 Session restaurée pour {}", user.email),
                None => info!("🔐 Session restaurée (identité à re-synchroniser)"),
            }
        }

        Self {
            session: RwLock::new(restored),
            storage,
        }
    }

    /// Store sans persistance (tests, mode éphémère)
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySessionStorage::new()))
    }

    /// Installe une nouvelle session et la persiste.
    ///
    /// L'état en mémoire fait foi ; un échec de persistance est journalisé
    /// et le prochain lancement repartira simplement déconnecté.
    pub async fn set(&self, session: Session) {
        {
            let mut guard = self.session.write().await;
            *guard = Some(session.clone());
        }

        if let Err(e) = self.storage.store(&session) {
            warn!("⚠️  Impossible de persister la session: {}", e);
        }
    }

    /// Installe un credential seul, l'identité étant récupérée juste après
    pub async fn set_token(&self, token: String) {
        self.set(Session::token_only(token)).await;
    }

    /// Remplace l'identité stockée (re-synchronisation du profil), le token est conservé
    pub async fn update_user(&self, user: User) {
        let updated = {
            let mut guard = self.session.write().await;
            match guard.as_mut() {
                Some(session) => {
                    session.user = Some(user);
                    Some(session.clone())
                }
                None => None,
            }
        };

        if let Some(session) = updated {
            if let Err(e) = self.storage.store(&session) {
                warn!("⚠️  Impossible de persister la session: {}", e);
            }
        }
    }

    /// Efface la session, en mémoire et sur disque dans la même opération.
    /// Idempotent : effacer une session absente est un succès.
    pub async fn clear(&self) {
        {
            let mut guard = self.session.write().await;
            *guard = None;
        }

        if let Err(e) = self.storage.clear() {
            warn!("⚠️  Impossible d'effacer la session persistée: {}", e);
        }
    }

    /// Credential bearer courant, None si anonyme
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.token.clone())
    }

    /// Identité courante
    pub async fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.user.clone())
    }

    /// Copie de la session complète
    pub async fn snapshot(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Vrai ssi un credential non nul est détenu
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Vrai ssi l'abonnement courant ouvre l'accès au traitement
    pub async fn is_subscribed(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.is_subscribed())
            .unwrap_or(false)
    }
}
