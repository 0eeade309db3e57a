//! Notification sinks.

use std::{
    io::Write,
    sync::Mutex,
};

use tracing::{info, warn};

use crate::{
    application::ports::{Notification, NotificationKind, Notifier, NotifyError},
    util::lock::mutex_lock,
};

/// Records notifications as log events only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        log(notification);
        Ok(())
    }
}

/// Prints one line per notification to a writer, e.g. the terminal.
pub struct WriterNotifier<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Notifier for WriterNotifier<W> {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        log(notification);
        let mut out = mutex_lock(&self.out, "infra::notify", "notify");
        writeln!(out, "{}", render_line(notification))
            .and_then(|()| out.flush())
            .map_err(|err| NotifyError(err.to_string()))
    }
}

fn log(notification: &Notification) {
    let message = notification.message.as_deref().unwrap_or_default();
    match notification.kind {
        NotificationKind::Error => warn!(
            kind = notification.kind.as_str(),
            title = %notification.title,
            message,
            "notification"
        ),
        NotificationKind::Success | NotificationKind::Info => info!(
            kind = notification.kind.as_str(),
            title = %notification.title,
            message,
            "notification"
        ),
    }
}

pub fn render_line(notification: &Notification) -> String {
    match notification.message.as_deref() {
        Some(message) => format!(
            "[{}] {}: {message}",
            notification.kind.as_str(),
            notification.title
        ),
        None => format!("[{}] {}", notification.kind.as_str(), notification.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_notifier_prints_one_line_each() {
        let notifier = WriterNotifier::new(Vec::new());
        notifier
            .notify(&Notification::success("Saved").with_message("Button order updated"))
            .expect("notify");
        notifier
            .notify(&Notification::error("Reordering failed"))
            .expect("notify");

        let printed = String::from_utf8(notifier.into_inner()).expect("utf8");
        assert_eq!(
            printed,
            "[success] Saved: Button order updated\n[error] Reordering failed\n"
        );
    }
}
