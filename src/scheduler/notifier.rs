//! Notification strategies, tried in order until one succeeds.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::banner;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

pub const REMINDER_TITLE: &str = "Kegel Helper";
pub const REMINDER_BODY: &str = "Time for your kegel exercise! Stay healthy, start now 💪";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn reminder() -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            body: REMINDER_BODY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierKind {
    /// Native OS notification; skipped when the user disabled notifications.
    Desktop,
    /// Always-available fallback.
    Fallback,
}

pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> NotifierKind {
        NotifierKind::Fallback
    }

    fn notify(&self, notification: &Notification) -> AppResult<()>;
}

/// Native toast through the platform's notification helper.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn kind(&self) -> NotifierKind {
        NotifierKind::Desktop
    }

    fn notify(&self, n: &Notification) -> AppResult<()> {
        let mut cmd = if cfg!(target_os = "linux") {
            let mut c = Command::new("notify-send");
            c.arg("--app-name=Kegel Helper").arg(&n.title).arg(&n.body);
            c
        } else if cfg!(target_os = "macos") {
            let mut c = Command::new("osascript");
            c.arg("-e").arg(format!(
                "display notification \"{}\" with title \"{}\"",
                applescript_escape(&n.body),
                applescript_escape(&n.title)
            ));
            c
        } else {
            return Err(AppError::Notify(
                "desktop notifications are not supported on this platform".into(),
            ));
        };

        let status = cmd
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| AppError::Notify(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(AppError::Notify(format!("notifier exited with {}", status)))
        }
    }
}

/// Framed banner on stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    fn notify(&self, n: &Notification) -> AppResult<()> {
        banner(&n.title, &n.body);
        Ok(())
    }
}

/// Ordered notifier strategies.
#[derive(Default)]
pub struct NotifierChain {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Desktop toast first, console banner as the fallback.
    pub fn platform_default() -> Self {
        Self::new()
            .with(Box::new(DesktopNotifier))
            .with(Box::new(ConsoleNotifier))
    }

    pub fn with(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Try each notifier in order and return the name of the first that
    /// succeeds. Failures are logged, never returned.
    pub fn notify(&self, notification: &Notification, allow_desktop: bool) -> Option<&'static str> {
        for notifier in &self.notifiers {
            if notifier.kind() == NotifierKind::Desktop && !allow_desktop {
                debug!(notifier = notifier.name(), "desktop notifications disabled, skipping");
                continue;
            }

            match notifier.notify(notification) {
                Ok(()) => {
                    info!(notifier = notifier.name(), "notification shown");
                    return Some(notifier.name());
                }
                Err(e) => {
                    warn!(notifier = notifier.name(), error = %e, "notification attempt failed");
                }
            }
        }
        None
    }
}
