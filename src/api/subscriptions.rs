// api/subscriptions.rs
use crate::api::client::ApiClient;
use crate::models::{SubscriptionInfo, SubscriptionRequest};
use crate::utils::error::Result;

impl ApiClient {
    /// Souscrit un abonnement pour l'utilisateur courant
    pub async fn create_subscription(&self, request: &SubscriptionRequest) -> Result<SubscriptionInfo> {
        self.post_json("/api/subscriptions", request).await
    }

    /// Abonnement courant
    pub async fn my_subscription(&self) -> Result<SubscriptionInfo> {
        self.get_json("/api/subscriptions/me").await
    }

    /// Résilie l'abonnement courant
    pub async fn cancel_subscription(&self) -> Result<SubscriptionInfo> {
        self.delete_json("/api/subscriptions/me").await
    }
}
