use std::time::{Duration, Instant};

use serde::Serialize;

/// What the notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Select,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastTone {
    Loading,
    Success,
    Error,
}

/// Transient notification that disappears after the session's toast duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub tone: ToastTone,
    pub text: String,
    #[serde(skip)]
    shown_at: Instant,
}

impl Toast {
    pub(crate) fn new(kind: ToastKind, tone: ToastTone, text: impl Into<String>) -> Self {
        Self {
            kind,
            tone,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    /// Heading shown above the text.
    pub fn title(&self) -> &'static str {
        match (self.tone, self.kind) {
            (ToastTone::Loading, ToastKind::Upload) => "正在分析",
            (ToastTone::Loading, ToastKind::Select) => "正在处理",
            (ToastTone::Error, ToastKind::Upload) => "分析失败",
            (ToastTone::Error, ToastKind::Select) => "操作失败",
            (ToastTone::Success, ToastKind::Select) => "图片选取成功",
            (ToastTone::Success, ToastKind::Upload) => "分析成功",
        }
    }

    pub(crate) fn is_expired(&self, now: Instant, duration: Duration) -> bool {
        now.saturating_duration_since(self.shown_at) >= duration
    }
}
