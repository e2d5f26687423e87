//! Timestamp display in the system time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a `Timestamp` as `YYYY-MM-DD HH:MM:SS TZ` in the system time
/// zone.
///
/// ```rust
/// use drillbook_core::display::LocalDateTime;
/// use jiff::Timestamp;
///
/// let now = Timestamp::now();
/// let text = LocalDateTime(&now).to_string();
/// assert_eq!(text.as_bytes()[4], b'-');
/// ```
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}
