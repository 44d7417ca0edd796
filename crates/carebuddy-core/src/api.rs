use std::future::Future;

use crate::error::ApiError;
use crate::types::{Analytics, Buddy, BuddyDetail, ImpactSummary, ReportingPeriod};
use crate::upload::UploadFile;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The backend operations the console consumes.
///
/// Implementations return fully parsed domain values; wire formats stay on
/// the implementation's side of this boundary. `carebuddy-client` provides
/// the HTTP implementation.
pub trait CareBuddyApi: Send + Sync {
    /// Every buddy owned by the current doctor.
    fn get_buddies(&self) -> impl Future<Output = ApiResult<Vec<Buddy>>> + Send;

    /// Full detail for one buddy; `ApiError::NotFound` for unknown ids.
    fn get_buddy_details(&self, id: &str)
        -> impl Future<Output = ApiResult<BuddyDetail>> + Send;

    fn get_buddy_analytics(&self, id: &str) -> impl Future<Output = ApiResult<Analytics>> + Send;

    /// Create a buddy named `name` trained on `files` and return its id.
    fn create_buddy(
        &self,
        name: &str,
        files: &[UploadFile],
    ) -> impl Future<Output = ApiResult<String>> + Send;

    /// Attach more training documents to an existing buddy.
    fn upload_documents(
        &self,
        buddy_id: &str,
        files: &[UploadFile],
    ) -> impl Future<Output = ApiResult<()>> + Send;

    fn get_doctor_impact(
        &self,
        period: ReportingPeriod,
    ) -> impl Future<Output = ApiResult<ImpactSummary>> + Send;
}
