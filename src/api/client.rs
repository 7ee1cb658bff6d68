// api/client.rs
use crate::models::ProgressReporter;
use crate::services::SessionStore;
use crate::utils::config::Config;
use crate::utils::error::{AppError, Result};
use bytes::Bytes;
use futures_util::stream;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Taille des fragments remis au transport pendant un upload (64 Ko)
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Corps d'erreur renvoyé par le backend
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Canal sortant unique vers le backend.
///
/// Chaque appel attache le credential bearer courant s'il existe. Une réponse
/// 401 invalide la session locale avant que l'erreur ne soit remontée à
/// l'appelant. Aucun retry, aucun cache : les échecs sont rapportés une fois,
/// immédiatement.
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    session: Arc<SessionStore>,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            upload_timeout: Duration::from_secs(config.upload_timeout_seconds),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attache le credential courant, borne la requête et interprète le statut
    async fn send(&self, builder: RequestBuilder, timeout: Duration) -> Result<Response> {
        let builder = match self.session.token().await {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        };

        let response = builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(timeout.as_secs())
            } else {
                AppError::Transport(e.to_string())
            }
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // La session locale est invalidée avant de remonter l'erreur
            self.session.clear().await;
            return Err(AppError::Unauthorized);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = Self::error_detail(response).await;
            return Err(AppError::Api { status, message });
        }

        Ok(response)
    }

    /// Extrait le champ `detail` du corps d'erreur, message générique sinon
    async fn error_detail(response: Response) -> String {
        match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => "Request failed".to_string(),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ParseError(e.to_string()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .send(self.http.get(self.url(path)), self.request_timeout)
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .send(self.http.post(self.url(path)).json(body), self.request_timeout)
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .send(self.http.delete(self.url(path)), self.request_timeout)
            .await?;
        Self::decode(response).await
    }

    /// Envoie un fichier en multipart, corps découpé en fragments.
    ///
    /// La progression avance à mesure que le transport consomme les fragments,
    /// plafonnée à 99 tant que le serveur n'a pas confirmé la fin de l'échange.
    pub(crate) async fn post_multipart_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        media_type: &str,
        content: Bytes,
        progress: ProgressReporter,
    ) -> Result<T> {
        let total = content.len().max(1) as u64;

        let mut chunks = Vec::new();
        let mut offset = 0;
        while offset < content.len() {
            let end = (offset + UPLOAD_CHUNK_SIZE).min(content.len());
            chunks.push(content.slice(offset..end));
            offset = end;
        }

        let sent = Arc::new(AtomicU64::new(0));
        let body_stream = stream::iter(chunks.into_iter().map(move |chunk| {
            let done = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
            let percent = ((done * 100 / total) as u8).min(99);
            progress.report(percent);
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        let part = reqwest::multipart::Part::stream_with_length(
            reqwest::Body::wrap_stream(body_stream),
            total,
        )
        .file_name(file_name.to_string())
        .mime_str(media_type)
        .map_err(|e| AppError::Validation(format!("Invalid media type: {}", e)))?;

        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .send(
                self.http.post(self.url(path)).multipart(form),
                self.upload_timeout,
            )
            .await?;
        Self::decode(response).await
    }
}
