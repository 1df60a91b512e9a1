//! Notification Sink Trait
//!
//! Where counted events go: a BLE characteristic, a display, a log. The
//! detector hands every notification over exactly once and never waits for
//! an acknowledgement. Retries, batching and connection state belong to the
//! sink.

use crate::notify::Notification;

/// Receiver of motion notifications
///
/// ```rust
/// use motionguard_core::{Notification, NotificationSink};
///
/// struct LastPayload(Option<heapless::String<48>>);
///
/// impl NotificationSink for LastPayload {
///     fn notify(&mut self, notification: &Notification) {
///         self.0 = Some(notification.payload().clone());
///     }
/// }
/// ```
pub trait NotificationSink {
    /// Deliver one notification
    fn notify(&mut self, notification: &Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for &mut T {
    fn notify(&mut self, notification: &Notification) {
        (**self).notify(notification)
    }
}

/// Discards every notification
impl NotificationSink for () {
    fn notify(&mut self, _notification: &Notification) {}
}
