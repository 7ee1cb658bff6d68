use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Niveau d'abonnement d'un utilisateur
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,      // Gratuit
    Monthly,   // Mensuel
    Yearly,    // Annuel
}

/// Représente l'utilisateur tel que renvoyé par le backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Identifiant unique de l'utilisateur
    pub id: i64,

    /// Email de l'utilisateur (unique) - utilisé pour la connexion
    pub email: String,

    /// Compte actif ou désactivé
    pub is_active: bool,

    /// Niveau d'abonnement courant
    pub subscription_tier: SubscriptionTier,

    /// Date d'expiration de l'abonnement (None pour le plan gratuit)
    pub subscription_expires_at: Option<DateTime<Utc>>,

    /// Date de création du compte
    pub created_at: DateTime<Utc>,
}

/// Données pour la connexion d'un utilisateur
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Données requises pour créer un nouveau compte
#[derive(Debug, Clone, Validate)]
pub struct NewAccount {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,

    /// Confirmation saisie par l'utilisateur, comparée localement
    pub password_confirmation: String,
}

/// Corps de la requête d'inscription (la confirmation ne part jamais sur le réseau)
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

impl From<&NewAccount> for RegisterRequest {
    fn from(account: &NewAccount) -> Self {
        Self {
            email: account.email.clone(),
            password: account.password.clone(),
        }
    }
}

/// Token d'authentification renvoyé par le backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
}

impl User {
    /// Vérifie si l'utilisateur dispose d'un abonnement ouvrant l'accès au traitement
    pub fn is_subscribed(&self) -> bool {
        if !self.is_active || self.subscription_tier == SubscriptionTier::Free {
            return false;
        }

        match self.subscription_expires_at {
            Some(expires_at) => expires_at > Utc::now(),
            None => true,
        }
    }
}
