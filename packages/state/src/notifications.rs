// ABOUTME: User-facing notifications emitted by background and batch work
// ABOUTME: Unbounded channel of info/error messages consumed by the UI layer

use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Sending half of the notification channel
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(NotificationKind::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(NotificationKind::Error, message.into());
    }

    fn send(&self, kind: NotificationKind, message: String) {
        // Nobody listening is fine
        if self.sender.send(Notification { kind, message }).is_err() {
            debug!("Notification dropped: receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notifications_arrive_in_order() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.info("saved");
        notifier.error("failed");

        assert_eq!(rx.recv().await.unwrap().kind, NotificationKind::Info);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, NotificationKind::Error);
        assert_eq!(second.message, "failed");
    }

    #[test]
    fn test_send_without_receiver_does_not_panic() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.info("nobody home");
    }
}
