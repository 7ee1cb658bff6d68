use crate::models::user::User;
use serde::{Deserialize, Serialize};

/// Session authentifiée : le credential et l'identité persistés entre deux lancements.
///
/// L'identité peut être momentanément absente (token obtenu, profil pas encore
/// récupéré) ; la présence du credential seule fait foi pour l'authentification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Credential bearer renvoyé par le backend au login
    pub token: String,

    /// Identité associée (récupérée via /api/auth/me)
    pub user: Option<User>,
}

impl Session {
    /// Session complète (credential + identité)
    pub fn new(token: String, user: User) -> Self {
        Self {
            token,
            user: Some(user),
        }
    }

    /// Session en cours d'établissement, identité pas encore récupérée
    pub fn token_only(token: String) -> Self {
        Self { token, user: None }
    }

    /// Délègue la vérification d'accès à l'identité stockée
    pub fn is_subscribed(&self) -> bool {
        self.user.as_ref().map(User::is_subscribed).unwrap_or(false)
    }
}
