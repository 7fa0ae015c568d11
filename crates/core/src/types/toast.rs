//! Transient notification shown after an action completes.
//!
//! A toast is set by the handler that performed an action and rendered by the
//! next page load. There is exactly one slot: showing a second toast before
//! the first was rendered replaces it. The rendered toast hides itself after
//! [`TOAST_AUTO_HIDE`] unless dismissed first.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a rendered toast stays on screen.
pub const TOAST_AUTO_HIDE: Duration = Duration::from_secs(3);

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl ToastKind {
    /// CSS modifier used by the layouts (`toast--success`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// A single message waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
}

impl Toast {
    #[must_use]
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, text)
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, text)
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, text)
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, text)
    }
}

/// Render-ready toast state: `{text, kind, visible}` plus the auto-hide delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub text: String,
    pub kind: String,
    pub visible: bool,
    pub auto_hide_ms: u64,
}

impl ToastView {
    /// The state rendered when no toast is pending.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            text: String::new(),
            kind: ToastKind::Info.as_str().to_owned(),
            visible: false,
            auto_hide_ms: 0,
        }
    }
}

impl From<Toast> for ToastView {
    fn from(toast: Toast) -> Self {
        Self {
            text: toast.text,
            kind: toast.kind.as_str().to_owned(),
            visible: true,
            auto_hide_ms: u64::try_from(TOAST_AUTO_HIDE.as_millis()).unwrap_or(3_000),
        }
    }
}

/// Single-slot holder for the pending toast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastSlot {
    current: Option<Toast>,
}

impl ToastSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Show a toast, replacing any toast still pending.
    pub fn show(&mut self, toast: Toast) {
        self.current = Some(toast);
    }

    /// Drop the pending toast without rendering it.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// The pending toast, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Remove the pending toast for rendering. The slot is empty afterwards.
    pub const fn take(&mut self) -> Option<Toast> {
        self.current.take()
    }

    /// Take the pending toast as a view, or a hidden view when empty.
    pub fn take_view(&mut self) -> ToastView {
        self.take().map_or_else(ToastView::hidden, ToastView::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_show_replaces_first() {
        let mut slot = ToastSlot::new();
        slot.show(Toast::success("Đã lưu"));
        slot.show(Toast::error("Lỗi mạng"));

        assert_eq!(slot.current(), Some(&Toast::error("Lỗi mạng")));
    }

    #[test]
    fn test_take_empties_slot() {
        let mut slot = ToastSlot::new();
        slot.show(Toast::info("Xin chào"));

        let view = slot.take_view();
        assert!(view.visible);
        assert_eq!(view.kind, "info");
        assert_eq!(view.auto_hide_ms, 3_000);
        assert!(slot.current().is_none());
        assert!(!slot.take_view().visible);
    }

    #[test]
    fn test_dismiss_clears_pending() {
        let mut slot = ToastSlot::new();
        slot.show(Toast::warning("Sắp hết hàng"));
        slot.dismiss();
        assert_eq!(slot.take(), None);
    }
}
