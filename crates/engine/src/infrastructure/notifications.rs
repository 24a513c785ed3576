//! Tracing-backed adapters for the client-facing ports.

use std::sync::Mutex;

use storykin_domain::UserId;

use crate::infrastructure::ports::{
    Destination, NavigatorPort, Notification, NotificationLevel, NotificationPort, SessionPort,
};

/// Routes user notifications to the log.
#[derive(Clone, Default)]
pub struct TracingNotifier;

impl NotificationPort for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => tracing::info!("{}", notification.message),
            NotificationLevel::Success => tracing::info!(success = true, "{}", notification.message),
            NotificationLevel::Warning => tracing::warn!("{}", notification.message),
            NotificationLevel::Error => tracing::error!("{}", notification.message),
        }
    }
}

/// Records navigation requests instead of changing screens.
#[derive(Default)]
pub struct LoggingNavigator {
    last: Mutex<Option<Destination>>,
}

impl LoggingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_destination(&self) -> Option<Destination> {
        self.last.lock().ok().and_then(|guard| *guard)
    }
}

impl NavigatorPort for LoggingNavigator {
    fn navigate(&self, destination: Destination) {
        tracing::info!(?destination, "Navigating");
        match self.last.lock() {
            Ok(mut guard) => *guard = Some(destination),
            Err(e) => tracing::error!("Failed to record destination: {}", e),
        }
    }
}

/// Session with a fixed (or absent) signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSession {
    user_id: Option<UserId>,
}

impl StaticSession {
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}

impl SessionPort for StaticSession {
    fn current_user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Keeps every notification for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct CollectingNotifier {
    seen: Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl CollectingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().expect("notifier lock").clone()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.all().iter().filter(|n| n.level == level).count()
    }
}

#[cfg(test)]
impl NotificationPort for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().expect("notifier lock").push(notification);
    }
}
