//! Buffer Capacities
//!
//! Fixed sizes for the heapless containers used by notifications.

/// Capacity of a notification payload in bytes.
///
/// The longest payload is the summary format with two saturated `u32`
/// counters: `"Steps: 4294967295 Jumps: 4294967295"` is 35 bytes.
pub const PAYLOAD_CAPACITY: usize = 48;

const LONGEST_PAYLOAD: usize = "Steps: 4294967295 Jumps: 4294967295".len();
const _: () = assert!(PAYLOAD_CAPACITY >= LONGEST_PAYLOAD);

/// Default number of notifications kept by [`crate::notify::RecentNotifications`].
pub const NOTIFICATION_HISTORY: usize = 16;
