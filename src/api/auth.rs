// api/auth.rs
use crate::api::client::ApiClient;
use crate::models::{AuthToken, Credentials, RegisterRequest, User};
use crate::utils::error::Result;

impl ApiClient {
    /// Inscription d'un nouveau compte
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.post_json("/api/auth/register", request).await
    }

    /// Échange email/mot de passe contre un credential bearer
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken> {
        self.post_json("/api/auth/login", credentials).await
    }

    /// Identité courante, credential valide requis
    pub async fn me(&self) -> Result<User> {
        self.get_json("/api/auth/me").await
    }
}
