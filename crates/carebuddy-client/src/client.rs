use carebuddy_core::api::{ApiResult, CareBuddyApi};
use carebuddy_core::{
    Analytics, ApiError, Buddy, BuddyDetail, ImpactSummary, ReportingPeriod, UploadFile,
};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::wire::{self, CreateBuddyResponse, UploadDocumentsResponse};

// ─── HttpApiClient ────────────────────────────────────────────────────────

/// [`CareBuddyApi`] over the backend's REST surface.
///
/// `base_url` includes the API prefix, e.g. `http://localhost:8001/api`.
/// No request timeout is set: a hung backend keeps the caller waiting.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` plus one percent-encoded path segment per entry, so ids
    /// containing `/`, `?` or `#` stay inside their segment.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let invalid = || ApiError::Transport(format!("invalid API base URL '{}'", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl CareBuddyApi for HttpApiClient {
    async fn get_buddies(&self) -> ApiResult<Vec<Buddy>> {
        send(self.http.get(self.endpoint(&["buddies"])?)).await
    }

    async fn get_buddy_details(&self, id: &str) -> ApiResult<BuddyDetail> {
        send(self.http.get(self.endpoint(&["buddy", id])?)).await
    }

    /// The backend serves analytics only as part of the detail payload.
    async fn get_buddy_analytics(&self, id: &str) -> ApiResult<Analytics> {
        self.get_buddy_details(id).await.map(|d| d.stats)
    }

    /// Two calls: create the buddy record, then upload its documents. An
    /// upload failure after the record exists is reported as
    /// [`ApiError::DocumentsFailed`] carrying the new id.
    async fn create_buddy(&self, name: &str, files: &[UploadFile]) -> ApiResult<String> {
        let req = self
            .http
            .post(self.endpoint(&["buddies", "create"])?)
            .form(&[("name", name)]);
        let created: CreateBuddyResponse = send(req).await?;
        debug!(buddy_id = %created.buddy_id, "buddy record created");

        if let Err(e) = self.upload_documents(&created.buddy_id, files).await {
            return Err(ApiError::DocumentsFailed {
                buddy_id: created.buddy_id,
                cause: Box::new(e),
            });
        }
        Ok(created.buddy_id)
    }

    async fn upload_documents(&self, buddy_id: &str, files: &[UploadFile]) -> ApiResult<()> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.content.to_vec())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            form = form.part("files", part);
        }

        let req = self
            .http
            .post(self.endpoint(&["buddy", buddy_id, "documents"])?)
            .multipart(form);
        let body: UploadDocumentsResponse = send(req).await?;
        debug!(
            buddy_id,
            uploaded = body.documents.len(),
            status = body.status.as_deref().unwrap_or(""),
            "training documents uploaded"
        );
        Ok(())
    }

    async fn get_doctor_impact(&self, period: ReportingPeriod) -> ApiResult<ImpactSummary> {
        let req = self
            .http
            .get(self.endpoint(&["doctor", "impact"])?)
            .query(&[("timespan", period.as_str())]);
        send(req).await
    }
}

// ─── Internal ─────────────────────────────────────────────────────────────

async fn send<T: DeserializeOwned>(req: RequestBuilder) -> ApiResult<T> {
    let resp = req
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let url = resp.url().path().to_string();
    let body = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if !status.is_success() {
        debug!(%status, path = %url, "backend returned an error status");
        return Err(status_error(status, &body, &url));
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("{url}: {e}")))
}

fn status_error(status: StatusCode, body: &str, path: &str) -> ApiError {
    let detail = wire::error_message(body);
    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound(detail.unwrap_or_else(|| path.to_string()));
    }
    ApiError::Status {
        status: status.as_u16(),
        detail,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
