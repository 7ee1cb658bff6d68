// api/videos.rs
use crate::api::client::ApiClient;
use crate::models::{ProgressReporter, VideoUploadResponse};
use crate::utils::error::Result;
use bytes::Bytes;

impl ApiClient {
    /// Soumet une vidéo au backend (multipart, champ unique `file`)
    pub async fn upload_video(
        &self,
        file_name: &str,
        media_type: &str,
        content: Bytes,
        progress: ProgressReporter,
    ) -> Result<VideoUploadResponse> {
        self.post_multipart_file("/api/videos/upload", file_name, media_type, content, progress)
            .await
    }
}
