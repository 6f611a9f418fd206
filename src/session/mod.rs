//! Upload, analyze and display lifecycle for one operator.
//!
//! [`UploadSession`] is a plain state machine: it never talks to the network
//! itself. `upload()` and `begin_metadata()` hand out tickets that the owner
//! runs on a [`BackendWorker`]; the outcomes come back through
//! `apply_upload()` and `apply_metadata()`, which discard anything stale.

mod preview;
mod toast;
mod worker;

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::backend::{BackendError, BackendUrls, ImageKind, InputMetadata, UploadAccepted};

pub use preview::{PREVIEW_EDGE, Preview, SelectedFile};
pub use toast::{Toast, ToastKind, ToastTone};
pub use worker::{BackendWorker, SessionJob, SessionMessage};

#[cfg(test)]
pub(crate) use preview::test_images;

const UPLOADING_STATUS: &str = "上传中...";
const UPLOADING_TOAST: &str = "正在上传到后端并触发分析，请稍候...";
const FAILURE_PREFIX: &str = "上传失败：";
const NETWORK_FAILURE: &str = "上传失败：网络异常，请检查后端是否已启动";
const NO_FILE_SELECTED: &str = "请先选择文件（文件名需为 inputN.jpg/png/webp）";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No file selected for upload")]
    NoFileSelected,
}

/// Projection of the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Idle,
    FileSelected,
    Uploading,
    Succeeded,
    Failed,
}

/// Identifies one upload request issued by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UploadToken(u64);

impl UploadToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Work order for an upload.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub token: UploadToken,
    pub file: SelectedFile,
}

/// Work order for a metadata fetch.
///
/// Only the most recently issued ticket is honoured, so a slow reply for an
/// input that was left and re-selected cannot overwrite the newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTicket {
    pub request_id: u64,
    pub input: String,
    pub cache_bust: u64,
}

/// The current input changed; its metadata should be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputChanged {
    pub input: String,
}

#[derive(Debug)]
pub struct UploadSession {
    urls: BackendUrls,
    toast_duration: Duration,
    status: UploadStatus,
    file: Option<SelectedFile>,
    preview: Option<Preview>,
    message: String,
    toast: Option<Toast>,
    current_input: Option<String>,
    metadata: Option<InputMetadata>,
    cache_bust: u64,
    next_token: u64,
    latest_upload: Option<UploadToken>,
    next_metadata_request: u64,
    latest_metadata: Option<u64>,
}

impl UploadSession {
    pub fn new(urls: BackendUrls, toast_duration: Duration) -> Self {
        Self {
            urls,
            toast_duration,
            status: UploadStatus::Idle,
            file: None,
            preview: None,
            message: String::new(),
            toast: None,
            current_input: None,
            metadata: None,
            cache_bust: 0,
            next_token: 1,
            latest_upload: None,
            next_metadata_request: 1,
            latest_metadata: None,
        }
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        // Release the old thumbnail before decoding the new one.
        self.preview = None;
        self.preview = Preview::generate(&file);
        tracing::info!("Selected {} ({} bytes)", file.name, file.len());
        self.toast = Some(Toast::new(
            ToastKind::Select,
            ToastTone::Success,
            format!("已选择文件：{}，点击「开始分析检测」进行分析", file.name),
        ));
        self.file = Some(file);
        self.message.clear();
        self.status = UploadStatus::FileSelected;
        // A response for the previous selection must not land on this one.
        self.latest_upload = None;
    }

    /// Forget the selected file and its preview.
    pub fn clear_file(&mut self) {
        self.file = None;
        self.preview = None;
        if self.status == UploadStatus::FileSelected {
            self.status = UploadStatus::Idle;
        }
    }

    pub fn upload(&mut self) -> Result<UploadTicket, SessionError> {
        let Some(file) = self.file.clone() else {
            self.message = NO_FILE_SELECTED.to_string();
            self.toast = Some(Toast::new(
                ToastKind::Upload,
                ToastTone::Error,
                NO_FILE_SELECTED,
            ));
            return Err(SessionError::NoFileSelected);
        };
        let token = UploadToken(self.next_token);
        self.next_token += 1;
        self.latest_upload = Some(token);
        self.status = UploadStatus::Uploading;
        self.message = UPLOADING_STATUS.to_string();
        self.toast = Some(Toast::new(
            ToastKind::Upload,
            ToastTone::Loading,
            UPLOADING_TOAST,
        ));
        tracing::debug!("Upload {} issued for {}", token.0, file.name);
        Ok(UploadTicket { token, file })
    }

    pub fn apply_upload(
        &mut self,
        token: UploadToken,
        outcome: Result<UploadAccepted, BackendError>,
    ) -> Option<InputChanged> {
        if self.latest_upload != Some(token) {
            tracing::debug!("Ignoring stale upload response {}", token.0);
            return None;
        }
        self.latest_upload = None;
        match outcome {
            Ok(accepted) => {
                let input = accepted.input;
                if self.current_input.as_deref() != Some(input.as_str()) {
                    self.metadata = None;
                }
                self.current_input = Some(input.clone());
                self.cache_bust += 1;
                self.status = UploadStatus::Succeeded;
                self.message = format!("上传成功：{input}");
                self.toast = Some(Toast::new(
                    ToastKind::Upload,
                    ToastTone::Success,
                    format!("分析成功！文件 {input} 的检测结果已加载到下方可视化区域。"),
                ));
                tracing::info!("Upload accepted as {input}");
                Some(InputChanged { input })
            }
            Err(err) => {
                let text = failure_text(&err);
                tracing::warn!("Upload failed: {err}");
                self.status = UploadStatus::Failed;
                self.message = text.clone();
                self.toast = Some(Toast::new(ToastKind::Upload, ToastTone::Error, text));
                None
            }
        }
    }

    /// Point the session at an already uploaded input.
    pub fn select_input(&mut self, input: impl Into<String>) -> Option<InputChanged> {
        let input = input.into();
        if self.current_input.as_deref() == Some(input.as_str()) {
            return None;
        }
        self.metadata = None;
        self.latest_metadata = None;
        self.current_input = Some(input.clone());
        Some(InputChanged { input })
    }

    /// Issue a metadata request, superseding any still in flight.
    pub fn begin_metadata(&mut self, input: &str) -> MetadataTicket {
        let request_id = self.next_metadata_request;
        self.next_metadata_request += 1;
        self.latest_metadata = Some(request_id);
        MetadataTicket {
            request_id,
            input: input.to_string(),
            cache_bust: self.cache_bust,
        }
    }

    /// Store fetched metadata; returns it when it was accepted.
    pub fn apply_metadata(
        &mut self,
        ticket: &MetadataTicket,
        outcome: Result<InputMetadata, BackendError>,
    ) -> Option<&InputMetadata> {
        let input = ticket.input.as_str();
        if self.latest_metadata != Some(ticket.request_id)
            || self.current_input.as_deref() != Some(input)
        {
            tracing::debug!(
                "Ignoring metadata request {} for {input}: superseded",
                ticket.request_id
            );
            return None;
        }
        self.latest_metadata = None;
        match outcome {
            Ok(metadata) => {
                tracing::debug!("Metadata for {input}: scene {:?}", metadata.scene);
                self.metadata = Some(metadata);
                self.metadata.as_ref()
            }
            Err(err) => {
                tracing::warn!("Metadata fetch for {input} failed: {err}");
                self.metadata = None;
                None
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let expired = self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.is_expired(now, self.toast_duration));
        if !expired {
            return;
        }
        self.toast = None;
        if matches!(self.status, UploadStatus::Succeeded | UploadStatus::Failed) {
            self.status = if self.file.is_some() {
                UploadStatus::FileSelected
            } else {
                UploadStatus::Idle
            };
        }
    }

    pub fn input_image_url(&self) -> Option<Url> {
        let input = self.current_input.as_deref()?;
        Some(self.urls.image(ImageKind::Input, input, self.cache_bust))
    }

    pub fn output_image_url(&self) -> Option<Url> {
        let output = self.metadata.as_ref()?.output.as_deref()?;
        Some(self.urls.image(ImageKind::Output, output, self.cache_bust))
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn current_input(&self) -> Option<&str> {
        self.current_input.as_deref()
    }

    pub fn metadata(&self) -> Option<&InputMetadata> {
        self.metadata.as_ref()
    }

    pub fn cache_bust(&self) -> u64 {
        self.cache_bust
    }
}

fn failure_text(err: &BackendError) -> String {
    match err {
        BackendError::Rejected(message) => format!("{FAILURE_PREFIX}{message}"),
        BackendError::Transport(_) => NETWORK_FAILURE.to_string(),
        other => format!("{FAILURE_PREFIX}{other}"),
    }
}
