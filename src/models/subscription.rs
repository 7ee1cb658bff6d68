use crate::models::user::SubscriptionTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requête de souscription (l'identifiant de prix vient de la page tarifs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub price_id: String,
}

/// Abonnement courant, consommé uniquement comme signal d'accès
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub subscription_tier: SubscriptionTier,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}
