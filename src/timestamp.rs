use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Inspectable, ValueInspector};

/// A point in time inspected as signed milliseconds since the Unix epoch.
///
/// Sub-millisecond precision is dropped on the wire.
///
/// ```
/// use na_inspect::UnixMillis;
///
/// let t = UnixMillis::from_millis(-1_500);
/// assert_eq!(t.as_millis(), -1_500);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct UnixMillis(pub SystemTime);

impl UnixMillis {
    pub const TYPE_NAME: &'static str = "time.msecs";
    pub const DESCRIPTION: &'static str = "unix timestamp, milliseconds";

    pub fn now() -> Self {
        Self(SystemTime::now())
    }

    pub fn from_millis(millis: i64) -> Self {
        let offset = Duration::from_millis(millis.unsigned_abs());
        if millis >= 0 {
            Self(UNIX_EPOCH + offset)
        } else {
            Self(UNIX_EPOCH - offset)
        }
    }

    /// Milliseconds since the epoch, truncated toward the epoch and saturating at the `i64` range.
    pub fn as_millis(&self) -> i64 {
        match self.0.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis())
                .map(|millis| -millis)
                .unwrap_or(i64::MIN),
        }
    }
}

impl Default for UnixMillis {
    fn default() -> Self {
        Self(UNIX_EPOCH)
    }
}

impl From<SystemTime> for UnixMillis {
    fn from(time: SystemTime) -> Self {
        Self(time)
    }
}

impl From<UnixMillis> for SystemTime {
    fn from(time: UnixMillis) -> Self {
        time.0
    }
}

impl Inspectable for UnixMillis {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let reading = inspector.is_reading();
        let mut millis = self.as_millis();
        inspector.int64(&mut millis, Self::TYPE_NAME, Self::DESCRIPTION);
        if reading {
            *self = Self::from_millis(millis);
        }
    }

    fn type_name() -> &'static str {
        Self::TYPE_NAME
    }
}
