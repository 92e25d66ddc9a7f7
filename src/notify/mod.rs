// ABOUTME: Notification surface for transient success/error/info/warning messages
// Fire-and-forget: controllers push notifications, front ends decide how to show them

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationType {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationType::Success => "✓",
            NotificationType::Error => "✗",
            NotificationType::Info => "ℹ",
            NotificationType::Warning => "⚠",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn success(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Success,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Error,
            created_at: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    pub fn info(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Info,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Warning,
            created_at: Instant::now(),
            duration: Duration::from_secs(4),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: String) {
        self.notify(Notification::success(message));
    }

    fn info(&self, message: String) {
        self.notify(Notification::info(message));
    }

    fn warning(&self, message: String) {
        self.notify(Notification::warning(message));
    }

    fn error(&self, message: String) {
        self.notify(Notification::error(message));
    }
}

/// Keeps every notification in memory, in arrival order
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries.lock().ok().and_then(|e| e.last().cloned())
    }

    /// Take all notifications, leaving the log empty
    pub fn drain(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }

    /// Drop notifications whose display time has passed
    pub fn prune_expired(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|n| !n.is_expired());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(notification);
        }
    }
}

/// Writes notifications to the structured log only
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.notification_type {
            NotificationType::Error => tracing::error!(message = %notification.message, "notification"),
            NotificationType::Warning => tracing::warn!(message = %notification.message, "notification"),
            NotificationType::Success | NotificationType::Info => {
                tracing::info!(message = %notification.message, "notification");
            }
        }
    }
}

/// Prints notifications to stderr for the command-line front end
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        eprintln!("{} {}", notification.notification_type.icon(), notification.message);
    }
}
