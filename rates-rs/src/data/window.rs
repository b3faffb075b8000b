//! Time windows sized to the exchange page cap

use crate::error::DownloadError;
use crate::Result;
use chrono::{DateTime, TimeDelta, Utc};
use std::iter::FusedIterator;

/// `[start, end)` sliced into windows of `step`.
///
/// Cheap to copy; every call to [`WindowRange::iter`] starts over from
/// `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: TimeDelta,
}

/// One request window. `end` is `start + step` and is not clamped to the
/// end of the range, so the last window may reach past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WindowRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, step: TimeDelta) -> Result<Self> {
        if step < TimeDelta::seconds(1) {
            return Err(DownloadError::InvalidJob(format!(
                "window step must be at least one second, got {}",
                step
            )));
        }
        Ok(Self { start, end, step })
    }

    pub fn with_step_minutes(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step_minutes: u32,
    ) -> Result<Self> {
        Self::new(start, end, TimeDelta::minutes(i64::from(step_minutes)))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Window start timestamps
    pub fn iter(&self) -> WindowStarts {
        WindowStarts {
            next: self.start,
            end: self.end,
            step: self.step,
        }
    }

    /// Window starts paired with their (unclamped) ends
    pub fn windows(&self) -> impl Iterator<Item = Window> {
        let step = self.step;
        self.iter().map(move |start| Window {
            start,
            end: start + step,
        })
    }

    pub fn len(&self) -> usize {
        self.iter().len()
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl IntoIterator for &WindowRange {
    type Item = DateTime<Utc>;
    type IntoIter = WindowStarts;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over window starts, see [`WindowRange::iter`]
#[derive(Debug, Clone)]
pub struct WindowStarts {
    next: DateTime<Utc>,
    end: DateTime<Utc>,
    step: TimeDelta,
}

fn as_nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * 1_000_000_000 + i128::from(delta.subsec_nanos())
}

impl Iterator for WindowStarts {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next;
        // past the representable range means past `end` as well
        self.next = current.checked_add_signed(self.step).unwrap_or(self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next >= self.end {
            return (0, Some(0));
        }
        let span = as_nanos(self.end - self.next);
        let step = as_nanos(self.step);
        let remaining = (span + step - 1) / step;
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WindowStarts {}

impl FusedIterator for WindowStarts {}
