// core/session_service.rs
use crate::api::ApiClient;
use crate::models::{
    Credentials, NewAccount, RegisterRequest, Session, SubscriptionInfo, SubscriptionRequest, User,
};
use crate::services::SessionStore;
use crate::utils::error::Result;
use crate::utils::validation::{validate_object, validate_password_confirmation};
use std::sync::Arc;
use tracing::{info, warn};

/// Gestionnaire de session : identité, credential et droit d'accès.
///
/// Toute mutation de la session passe par ce service (ou par l'invalidation
/// sur 401 du gateway) ; les autres composants ne font que lire le store.
pub struct SessionService {
    api: Arc<ApiClient>,
    store: Arc<SessionStore>,
}

impl SessionService {
    pub fn new(api: Arc<ApiClient>, store: Arc<SessionStore>) -> Self {
        Self { api, store }
    }

    /// Connexion email/mot de passe.
    ///
    /// Le credential est installé puis l'identité récupérée via /api/auth/me ;
    /// si cette seconde étape échoue la session est effacée, jamais laissée
    /// à moitié établie.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        validate_object(credentials)?;

        let token = self.api.login(credentials).await?;
        self.store.set_token(token.access_token.clone()).await;

        match self.api.me().await {
            Ok(user) => {
                self.store.update_user(user.clone()).await;
                info!("🔐 Connexion réussie pour {}", user.email);
                Ok(Session::new(token.access_token, user))
            }
            Err(e) => {
                self.store.clear().await;
                Err(e)
            }
        }
    }

    /// Inscription d'un nouveau compte.
    ///
    /// La confirmation du mot de passe est vérifiée localement avant tout
    /// appel réseau. L'inscription ne connecte pas l'utilisateur.
    pub async fn register(&self, account: &NewAccount) -> Result<User> {
        validate_password_confirmation(&account.password, &account.password_confirmation)?;
        validate_object(account)?;

        let user = self.api.register(&RegisterRequest::from(account)).await?;
        info!("👤 Compte créé pour {}", user.email);

        Ok(user)
    }

    /// Déconnexion locale, inconditionnelle et idempotente
    pub async fn logout(&self) {
        self.store.clear().await;
        info!("🔓 Session fermée");
    }

    /// Vrai ssi un credential non nul est détenu
    pub async fn is_authenticated(&self) -> bool {
        self.store.is_authenticated().await
    }

    /// Vrai ssi l'abonnement courant ouvre l'accès au traitement
    pub async fn is_subscribed(&self) -> bool {
        self.store.is_subscribed().await
    }

    /// Identité courante, sans appel réseau
    pub async fn current_user(&self) -> Option<User> {
        self.store.current_user().await
    }

    /// Re-synchronise le profil depuis le backend (niveau d'abonnement inclus)
    pub async fn refresh_profile(&self) -> Result<User> {
        let user = self.api.me().await?;
        self.store.update_user(user.clone()).await;
        Ok(user)
    }

    /// Souscrit un abonnement puis re-synchronise le profil
    pub async fn subscribe(&self, price_id: &str) -> Result<SubscriptionInfo> {
        let info = self
            .api
            .create_subscription(&SubscriptionRequest {
                price_id: price_id.to_string(),
            })
            .await?;

        if let Err(e) = self.refresh_profile().await {
            warn!("⚠️  Profil non re-synchronisé après souscription: {}", e);
        }

        Ok(info)
    }

    /// Abonnement courant (signal d'accès uniquement)
    pub async fn subscription_info(&self) -> Result<SubscriptionInfo> {
        self.api.my_subscription().await
    }

    /// Résilie l'abonnement puis re-synchronise le profil
    pub async fn cancel_subscription(&self) -> Result<SubscriptionInfo> {
        let info = self.api.cancel_subscription().await?;

        if let Err(e) = self.refresh_profile().await {
            warn!("⚠️  Profil non re-synchronisé après résiliation: {}", e);
        }

        Ok(info)
    }
}
