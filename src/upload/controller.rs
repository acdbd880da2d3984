use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::mime::{extension_index, TEXT_CONTENT_TYPES};
use super::mode::UploadMode;
use super::pending::{synthesize_filename, PendingUpload, SelectedFile};
use super::preview::{text_preview, PreviewLoaded, PreviewRequest, PreviewSlot};
use super::result::{classify_upload_reply, SubmissionResult, UploadError, Uploaded};
use crate::api::Transport;

/// Where the controller sends the user once an upload produced a link
pub trait Navigator: Send {
    fn navigate(&mut self, url: &str);
}

/// Navigator that remembers the destination for the host to act on
#[derive(Debug, Default)]
pub struct LinkNavigator {
    destination: Option<String>,
}

impl LinkNavigator {
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }
}

impl Navigator for LinkNavigator {
    fn navigate(&mut self, url: &str) {
        self.destination = Some(url.to_string());
    }
}

/// State machine behind the upload form
///
/// Hosts render the slots exposed by the accessors and feed user intent in
/// through the operations below. Asynchronous work (preview reads, the upload
/// itself) is handed out as plain values so the host decides where it runs.
pub struct UploadController<N: Navigator> {
    mode: UploadMode,
    files: Vec<SelectedFile>,
    text: String,
    custom_name: String,
    extension: usize,
    status: Option<String>,
    uploaded: Option<Uploaded>,
    file_preview: PreviewSlot,
    text_preview: PreviewSlot,
    submitting: bool,
    navigator: N,
}

impl<N: Navigator> UploadController<N> {
    /// Create a controller; unknown default extensions fall back to the first one
    pub fn new(navigator: N, default_extension: &str) -> Self {
        Self {
            mode: UploadMode::default(),
            files: Vec::new(),
            text: String::new(),
            custom_name: String::new(),
            extension: extension_index(default_extension).unwrap_or(0),
            status: None,
            uploaded: None,
            file_preview: PreviewSlot::default(),
            text_preview: PreviewSlot::default(),
            submitting: false,
            navigator,
        }
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn custom_name(&self) -> &str {
        &self.custom_name
    }

    pub fn extension(&self) -> &'static str {
        TEXT_CONTENT_TYPES[self.extension].0
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.uploaded.as_ref().map(|u| u.frontend_url.as_str())
    }

    /// The upload behind the current link, with whatever else the server reported
    pub fn uploaded(&self) -> Option<&Uploaded> {
        self.uploaded.as_ref()
    }

    pub fn file_preview(&self) -> &PreviewSlot {
        &self.file_preview
    }

    pub fn text_preview(&self) -> &PreviewSlot {
        &self.text_preview
    }

    /// Whether the submit trigger is disabled by an in-flight upload
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Name the pasted text would be uploaded under
    pub fn synthesized_filename(&self) -> String {
        synthesize_filename(&self.custom_name, self.extension())
    }

    // ---- tabs ----

    /// Activate a tab; a real change wipes status, link and both previews
    pub fn switch_mode(&mut self, mode: UploadMode) {
        if self.mode == mode {
            return;
        }
        debug!(from = self.mode.display_name(), to = mode.display_name(), "switching tab");
        self.mode = mode;
        self.clear_feedback();
    }

    pub fn toggle_mode(&mut self) {
        self.switch_mode(self.mode.toggle());
    }

    fn clear_feedback(&mut self) {
        self.status = None;
        self.uploaded = None;
        self.file_preview.clear();
        self.text_preview.clear();
    }

    // ---- file tab ----

    /// Replace the file slot; returns the preview read to run for the first file
    pub fn select_files(&mut self, paths: Vec<PathBuf>) -> Option<PreviewRequest> {
        self.files = paths.into_iter().map(SelectedFile::from_path).collect();
        self.status = None;
        self.uploaded = None;

        let Some(first) = self.files.first().cloned() else {
            self.file_preview.clear();
            return None;
        };
        debug!(file = %first.name, count = self.files.len(), "file slot updated");
        Some(PreviewRequest {
            ticket: self.file_preview.issue(),
            file: first,
        })
    }

    /// Files dropped onto the terminal: always lands on the file tab
    pub fn handle_drop(&mut self, paths: Vec<PathBuf>) -> Option<PreviewRequest> {
        info!("{} file(s) dropped", paths.len());
        self.switch_mode(UploadMode::File);
        self.select_files(paths)
    }

    /// Install a finished preview read; stale completions are dropped
    pub fn apply_file_preview(&mut self, loaded: PreviewLoaded) -> bool {
        let applied = self.file_preview.apply(loaded.ticket, loaded.preview);
        if !applied {
            debug!(ticket = ?loaded.ticket, "discarding stale preview");
        }
        applied
    }

    // ---- text tab ----

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.refresh_text_preview();
    }

    pub fn set_custom_name(&mut self, name: impl Into<String>) {
        self.custom_name = name.into();
        self.refresh_text_preview();
    }

    /// Select an extension by name; returns false if it is not offered
    pub fn set_extension(&mut self, extension: &str) -> bool {
        match extension_index(extension) {
            Some(index) => {
                self.extension = index;
                self.refresh_text_preview();
                true
            }
            None => false,
        }
    }

    pub fn next_extension(&mut self) {
        self.extension = (self.extension + 1) % TEXT_CONTENT_TYPES.len();
        self.refresh_text_preview();
    }

    pub fn previous_extension(&mut self) {
        self.extension = self
            .extension
            .checked_sub(1)
            .unwrap_or(TEXT_CONTENT_TYPES.len() - 1);
        self.refresh_text_preview();
    }

    fn refresh_text_preview(&mut self) {
        let preview = text_preview(&self.synthesized_filename(), &self.text);
        self.text_preview.set(preview);
    }

    // ---- submission ----

    /// Validate the active tab and claim the submit trigger
    ///
    /// `None` means nothing is to be sent: either a submission is already in
    /// flight or validation failed (the reason is in the status slot).
    pub fn begin_submit(&mut self) -> Option<PendingUpload> {
        if self.submitting {
            debug!("submit ignored, upload already in flight");
            return None;
        }

        let pending = match self.mode {
            UploadMode::Text if self.text.trim().is_empty() => Err(UploadError::EmptyText),
            UploadMode::Text => Ok(PendingUpload::text(
                self.text.clone(),
                &self.custom_name,
                self.extension(),
            )),
            UploadMode::File => self
                .files
                .first()
                .cloned()
                .map(PendingUpload::File)
                .ok_or(UploadError::NoFile),
        };

        match pending {
            Ok(pending) => {
                info!(file = pending.file_name(), "starting upload");
                self.submitting = true;
                self.uploaded = None;
                self.status = Some(format!("Uploading {}...", pending.file_name()));
                Some(pending)
            }
            Err(e) => {
                self.status = Some(e.to_string());
                None
            }
        }
    }

    /// Render the outcome of the request started by [`Self::begin_submit`]
    pub fn finish_submit(&mut self, result: &SubmissionResult) {
        self.submitting = false;
        match result {
            Ok(uploaded) => {
                info!(url = %uploaded.frontend_url, "upload complete");
                self.uploaded = Some(uploaded.clone());
                self.status = Some("Upload complete.".to_string());
                self.navigator.navigate(&uploaded.frontend_url);
            }
            Err(e) => {
                warn!("upload failed: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    /// Give the trigger back after the host aborted the in-flight request
    pub fn cancel_submit(&mut self) -> bool {
        if !self.submitting {
            return false;
        }
        self.submitting = false;
        self.status = Some("Upload cancelled.".to_string());
        true
    }

    /// Validate, send and render in one go
    ///
    /// Returns `None` when nothing was sent.
    pub async fn submit(&mut self, transport: &dyn Transport) -> Option<SubmissionResult> {
        let pending = self.begin_submit()?;
        let result = perform_upload(transport, pending).await;
        self.finish_submit(&result);
        Some(result)
    }
}

/// Send one pending upload and classify the answer
pub async fn perform_upload(transport: &dyn Transport, pending: PendingUpload) -> SubmissionResult {
    let part = pending.into_part().await?;
    classify_upload_reply(transport.upload_file(part).await)
}
