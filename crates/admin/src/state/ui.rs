//! UI slice: sidebar, notification centre and toast queue.
//!
//! Nothing here is persisted.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use backoffice_core::NotificationKind;

/// Entry in the notification centre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Transient message shown once by the host, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug)]
struct UiState {
    sidebar_open: bool,
    /// Newest first.
    notifications: Vec<Notification>,
    toasts: VecDeque<Toast>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            notifications: Vec::new(),
            toasts: VecDeque::new(),
        }
    }
}

/// Process-wide UI state.
#[derive(Debug, Default)]
pub struct UiSlice {
    state: Mutex<UiState>,
}

impl UiSlice {
    fn lock(&self) -> std::sync::MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Sidebar
    // =========================================================================

    /// Whether the sidebar is expanded.
    pub fn sidebar_open(&self) -> bool {
        self.lock().sidebar_open
    }

    /// Expand or collapse the sidebar, returning the new state.
    pub fn toggle_sidebar(&self) -> bool {
        let mut state = self.lock();
        state.sidebar_open = !state.sidebar_open;
        state.sidebar_open
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.lock().sidebar_open = open;
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Add an unread notification at the top of the list.
    pub fn add_notification(&self, message: impl Into<String>, kind: NotificationKind) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        };
        let id = notification.id;
        self.lock().notifications.insert(0, notification);
        id
    }

    /// Mark one notification read. Returns `false` if `id` is unknown.
    pub fn mark_notification_read(&self, id: Uuid) -> bool {
        let mut state = self.lock();
        match state.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn clear_notifications(&self) {
        self.lock().notifications.clear();
    }

    /// Snapshot of all notifications, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.lock().notifications.iter().filter(|n| !n.read).count()
    }

    // =========================================================================
    // Toasts
    // =========================================================================

    pub fn push_toast(&self, kind: NotificationKind, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(?kind, %message, "Toast");
        self.lock().toasts.push_back(Toast { kind, message });
    }

    pub fn toast_success(&self, message: impl Into<String>) {
        self.push_toast(NotificationKind::Success, message);
    }

    pub fn toast_error(&self, message: impl Into<String>) {
        self.push_toast(NotificationKind::Error, message);
    }

    /// Take every pending toast, oldest first.
    pub fn drain_toasts(&self) -> Vec<Toast> {
        self.lock().toasts.drain(..).collect()
    }
}
