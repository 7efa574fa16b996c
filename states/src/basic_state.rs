//! Basic states every application registers.

use chrono::{DateTime, Utc};

use crate::{State, state_assign_impl};

/// Wall-clock time as application state.
///
/// The shell refreshes this once per frame, so anything time-dependent (a
/// compute deciding whether a cache is old, a command stamping a result)
/// reads `Time` instead of calling `Utc::now()` and stays mockable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time(DateTime<Utc>);

impl Default for Time {
    fn default() -> Self {
        Self(Utc::now())
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl AsRef<DateTime<Utc>> for Time {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl AsMut<DateTime<Utc>> for Time {
    fn as_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.0
    }
}

impl State for Time {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn std::any::Any + Send + 'static>> {
        Some(Box::new(*self))
    }

    fn assign_box(&mut self, value: Box<dyn std::any::Any + Send>) {
        state_assign_impl(self, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn default_is_roughly_now() {
        let before = Utc::now();
        let time = Time::default();
        let after = Utc::now();
        assert!(
            *time.as_ref() >= before && *time.as_ref() <= after,
            "default Time must be taken from the wall clock"
        );
    }

    #[test]
    fn as_mut_rewrites_the_instant() {
        let fixed = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).single().expect("valid date");
        let mut time = Time::default();
        *time.as_mut() = fixed;
        assert_eq!(*time.as_ref(), fixed, "Time must expose the assigned instant");
    }

    #[test]
    fn from_and_snapshot_round_trip() {
        let fixed = Utc.with_ymd_and_hms(2025, 6, 30, 8, 15, 0).single().expect("valid date");
        let time = Time::from(fixed);
        let snapshot = time.snapshot().expect("Time is snapshottable");
        let restored = snapshot.downcast::<Time>().expect("snapshot holds a Time");
        assert_eq!(*restored, time, "snapshot must equal the source");
    }
}
