// The upload boundary the driver talks to. `api::ApiClient` is the real
// implementation; tests plug in scripted ones.

use crate::error::UploadError;
use crate::scan::PhotoFile;

/// Result of exactly one upload attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Server accepted the photo; carries its JSON response as-is.
    Success(serde_json::Value),
    Failure(UploadError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }
}

/// Uploads a single photo. Implementations perform one round trip and report
/// every problem through `UploadOutcome::Failure`, never by panicking.
pub trait Uploader: Send + Sync {
    fn upload(&self, photo: &PhotoFile) -> UploadOutcome;
}
