//! Notifications and the sinks shipped with the crate
//!
//! Every counted event becomes a [`Notification`]: the event itself plus a
//! short text payload ready to push into a BLE characteristic or onto a
//! display. The payload lives in a fixed-capacity `heapless::String`, so
//! building one never allocates.
//!
//! | Format                      | Payload               |
//! |-----------------------------|-----------------------|
//! | [`PayloadFormat::StepCount`]| `12`                  |
//! | [`PayloadFormat::Summary`]  | `Steps: 12 Jumps: 3`  |

use core::fmt::Write;

use heapless::{Deque, String};

use crate::{
    classifier::{EventCounters, MotionEvent},
    constants::{NOTIFICATION_HISTORY, PAYLOAD_CAPACITY},
    traits::NotificationSink,
};

/// Notification text buffer
pub type Payload = String<PAYLOAD_CAPACITY>;

/// How counters are rendered into the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadFormat {
    /// Step count as decimal text
    #[default]
    StepCount,
    /// `Steps: S Jumps: J`
    Summary,
}

impl PayloadFormat {
    /// Render counters into a payload buffer
    pub fn render(&self, counters: &EventCounters) -> Result<Payload, core::fmt::Error> {
        let mut payload = Payload::new();
        match self {
            PayloadFormat::StepCount => write!(payload, "{}", counters.steps)?,
            PayloadFormat::Summary => write!(
                payload,
                "Steps: {} Jumps: {}",
                counters.steps, counters.jumps
            )?,
        }
        Ok(payload)
    }
}

/// A counted event together with its rendered payload
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    event: MotionEvent,
    payload: Payload,
}

impl Notification {
    /// Render `event` with `format`
    pub fn new(event: MotionEvent, format: PayloadFormat) -> Result<Self, core::fmt::Error> {
        Ok(Self {
            payload: format.render(&event.counters)?,
            event,
        })
    }

    /// The counted event
    pub fn event(&self) -> &MotionEvent {
        &self.event
    }

    /// Rendered payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Payload as a string slice
    pub fn as_str(&self) -> &str {
        self.payload.as_str()
    }
}

/// Writes each payload to the log at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: &Notification) {
        log_info!(
            "{} counted, payload \"{}\"",
            notification.event().kind.name(),
            notification.as_str()
        );
        #[cfg(not(any(feature = "log", feature = "defmt")))]
        let _ = notification;
    }
}

/// Keeps the most recent `N` notifications, dropping the oldest
#[derive(Debug, Clone)]
pub struct RecentNotifications<const N: usize = NOTIFICATION_HISTORY> {
    entries: Deque<Notification, N>,
    dropped: u32,
}

impl<const N: usize> Default for RecentNotifications<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RecentNotifications<N> {
    /// Empty history
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            dropped: 0,
        }
    }

    /// Newest notification
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Number held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been received
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many older notifications were pushed out
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Remove and return the oldest notification
    pub fn pop_oldest(&mut self) -> Option<Notification> {
        self.entries.pop_front()
    }
}

impl<const N: usize> NotificationSink for RecentNotifications<N> {
    fn notify(&mut self, notification: &Notification) {
        if self.entries.is_full() {
            self.entries.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        // Cannot fail: a slot was freed above
        let _ = self.entries.push_back(notification.clone());
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F> NotificationSink for FnSink<F>
where
    F: FnMut(&Notification),
{
    fn notify(&mut self, notification: &Notification) {
        (self.0)(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::EventKind;

    fn event(kind: EventKind, steps: u32, jumps: u32) -> MotionEvent {
        MotionEvent {
            kind,
            counters: EventCounters { steps, jumps },
            magnitude: 12.0,
        }
    }

    #[test]
    fn step_count_payload() {
        let n = Notification::new(event(EventKind::Step, 12, 0), PayloadFormat::StepCount).unwrap();
        assert_eq!(n.as_str(), "12");
    }

    #[test]
    fn summary_payload() {
        let n = Notification::new(event(EventKind::Jump, 3, 1), PayloadFormat::Summary).unwrap();
        assert_eq!(n.as_str(), "Steps: 3 Jumps: 1");
    }

    #[test]
    fn saturated_summary_fits() {
        let counters = EventCounters { steps: u32::MAX, jumps: u32::MAX };
        let payload = PayloadFormat::Summary.render(&counters).unwrap();
        assert_eq!(payload.as_str(), "Steps: 4294967295 Jumps: 4294967295");
    }

    #[test]
    fn history_drops_oldest() {
        let mut history: RecentNotifications<2> = RecentNotifications::new();
        for steps in 1..=3 {
            let n = Notification::new(event(EventKind::Step, steps, 0), PayloadFormat::StepCount)
                .unwrap();
            history.notify(&n);
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.dropped(), 1);
        assert_eq!(history.latest().unwrap().as_str(), "3");
        assert_eq!(history.pop_oldest().unwrap().as_str(), "2");
    }

    #[test]
    fn closure_sink() {
        let mut seen = 0u32;
        {
            let mut sink = FnSink(|n: &Notification| seen = n.event().counters.steps);
            let n = Notification::new(event(EventKind::Step, 5, 0), PayloadFormat::StepCount)
                .unwrap();
            sink.notify(&n);
        }
        assert_eq!(seen, 5);
    }
}
