use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::CareBuddyApi;
use crate::error::{ApiError, CreateError, ValidationError};
use crate::upload::{UploadFile, ACCEPTED_EXTENSIONS};

/// Shown when the backend fails without saying why.
pub const GENERIC_CREATE_FAILURE: &str = "Failed to create buddy";

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// The new-buddy dialog's local state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateForm {
    pub name: String,
    pub files: Vec<UploadFile>,
    pub loading: bool,
    /// User-facing message from the last failed submit. Single slot.
    pub error: Option<String>,
    /// Buddy created by an earlier submit whose documents did not upload.
    /// The next submit uploads to it instead of creating another buddy.
    pub pending_buddy: Option<String>,
}

/// Serializable view of [`CreateForm`] without file contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateFormSummary {
    pub name: String,
    pub file_names: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub pending_buddy: Option<String>,
}

impl CreateForm {
    pub fn summary(&self) -> CreateFormSummary {
        CreateFormSummary {
            name: self.name.clone(),
            file_names: self.files.iter().map(|f| f.file_name.clone()).collect(),
            loading: self.loading,
            error: self.error.clone(),
            pending_buddy: self.pending_buddy.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend created the buddy with this id.
    Created(String),
    /// Another submit was already in flight; nothing happened.
    Busy,
}

/// Check the form inputs. Returns the trimmed name on success.
pub fn validate(name: &str, files: &[UploadFile]) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if files.is_empty() {
        return Err(ValidationError::DocumentsRequired);
    }
    Ok(trimmed.to_string())
}

/// Clears `loading` when a submit ends, including when its future is
/// dropped before the backend answers.
struct InFlight<'a> {
    form: &'a watch::Sender<CreateForm>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.form.send_if_modified(|f| {
            if !f.loading {
                return false;
            }
            f.loading = false;
            true
        });
    }
}

// ---------------------------------------------------------------------------
// CreationWorkflow
// ---------------------------------------------------------------------------

/// Validates and submits a new-buddy request.
///
/// Refreshing the roster and navigating to the new buddy are left to the
/// caller; see [`crate::console::Console::create_buddy`].
pub struct CreationWorkflow<A> {
    api: Arc<A>,
    form: watch::Sender<CreateForm>,
    accepted_extensions: Vec<String>,
}

impl<A: CareBuddyApi> CreationWorkflow<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (form, _) = watch::channel(CreateForm::default());
        Self {
            api,
            form,
            accepted_extensions: ACCEPTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the extensions `add_file` expects. Unlisted types are still
    /// accepted, only logged.
    pub fn with_accepted_extensions(mut self, extensions: Vec<String>) -> Self {
        self.accepted_extensions = extensions;
        self
    }

    pub fn form(&self) -> CreateForm {
        self.form.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CreateForm> {
        self.form.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.form.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.form.borrow().error.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.form.send_modify(|f| f.name = name);
    }

    pub fn add_file(&self, file: UploadFile) {
        if !file.has_accepted_extension(&self.accepted_extensions) {
            warn!(
                file = %file.file_name,
                accepted = %self.accepted_extensions.join(", "),
                "unexpected training document type; uploading anyway"
            );
        }
        self.form.send_modify(|f| f.files.push(file));
    }

    pub fn set_files(&self, files: Vec<UploadFile>) {
        self.form.send_modify(|f| f.files = files);
    }

    pub fn clear_files(&self) {
        self.form.send_modify(|f| f.files.clear());
    }

    /// Clear inputs and any error. Ignored while a submit is in flight.
    pub fn reset(&self) {
        self.form.send_if_modified(|f| {
            if f.loading {
                return false;
            }
            *f = CreateForm::default();
            true
        });
    }

    /// Validate the form and create the buddy.
    ///
    /// Returns [`SubmitOutcome::Busy`] without side effects if a submit is
    /// already running. Validation failures never reach the network. On
    /// success the inputs are cleared; on any failure they are kept so the
    /// doctor can retry, and the message lands in [`CreateForm::error`].
    /// If the buddy was created but its documents failed, the retry only
    /// re-uploads them to [`CreateForm::pending_buddy`].
    pub async fn submit(&self) -> Result<SubmitOutcome, CreateError> {
        let mut started = None;
        self.form.send_if_modified(|f| {
            if f.loading {
                return false;
            }
            f.loading = true;
            f.error = None;
            started = Some((f.name.clone(), f.files.clone(), f.pending_buddy.clone()));
            true
        });
        let Some((name, files, pending)) = started else {
            debug!("submit ignored: creation already in flight");
            return Ok(SubmitOutcome::Busy);
        };
        let _in_flight = InFlight { form: &self.form };

        let name = match validate(&name, &files) {
            Ok(name) => name,
            Err(e) => {
                debug!(reason = %e, "new buddy form rejected");
                self.fail(e.to_string());
                return Err(e.into());
            }
        };

        let result = match &pending {
            Some(id) => {
                debug!(buddy_id = %id, "retrying document upload for existing buddy");
                self.api
                    .upload_documents(id, &files)
                    .await
                    .map(|()| id.clone())
            }
            None => self.api.create_buddy(&name, &files).await,
        };

        match result {
            Ok(id) => {
                info!(buddy_id = %id, name = %name, documents = files.len(), "buddy created");
                self.form.send_modify(|f| *f = CreateForm::default());
                Ok(SubmitOutcome::Created(id))
            }
            Err(e) => {
                error!(error = %e, name = %name, "failed to create buddy");
                let message = e.detail().unwrap_or(GENERIC_CREATE_FAILURE).to_string();
                let pending = match e {
                    ApiError::DocumentsFailed { buddy_id, .. } => Some(buddy_id),
                    _ => pending,
                };
                self.form.send_modify(|f| f.pending_buddy = pending);
                self.fail(message.clone());
                Err(CreateError::Submission(message))
            }
        }
    }

    fn fail(&self, message: String) {
        self.form.send_modify(|f| {
            f.loading = false;
            f.error = Some(message);
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
