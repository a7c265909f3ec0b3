//! Paths: complete itineraries through the search graph.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use super::{DomainError, ForwardSegment, RunId, Timestamp};

/// A complete itinerary from a departure stop to an arrival stop.
///
/// # Invariants
///
/// - At least one segment
/// - Consecutive segments connect (`C` of one is `A` of the next)
#[derive(Debug, Clone)]
pub struct Path {
    segments: Vec<Arc<ForwardSegment>>,
}

impl Path {
    /// Constructs a path from segments.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - Segments list is empty
    /// - Segments don't connect
    pub fn new(segments: Vec<Arc<ForwardSegment>>) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyPath);
        }
        for (i, window) in segments.windows(2).enumerate() {
            if window[0].c != window[1].a {
                return Err(DomainError::DisconnectedPath(i, i + 1));
            }
        }
        Ok(Self { segments })
    }

    /// Builds a path from segments the search already linked together.
    pub(crate) fn from_linked(segments: Vec<Arc<ForwardSegment>>) -> Self {
        debug_assert!(!segments.is_empty());
        Self { segments }
    }

    pub fn segments(&self) -> &[Arc<ForwardSegment>] {
        &self.segments
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Departure instant of the first boarding.
    pub fn departure(&self) -> Timestamp {
        self.segments[0].a.time
    }

    /// Arrival instant at the final stop.
    pub fn arrival(&self) -> Timestamp {
        self.segments[self.segments.len() - 1].c.time
    }

    /// Total travel time.
    pub fn duration(&self) -> Duration {
        self.arrival() - self.departure()
    }

    /// Number of run changes.
    pub fn transfer_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_transfer()).count()
    }

    /// Runs ridden, in travel order.
    pub fn runs(&self) -> impl Iterator<Item = &RunId> {
        self.segments.iter().map(|s| &s.a.run)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} min, {} transfers)",
            self.departure().format("%Y-%m-%d %H:%M"),
            self.arrival().format("%Y-%m-%d %H:%M"),
            self.duration().num_minutes(),
            self.transfer_count()
        )?;
        for segment in &self.segments {
            write!(
                f,
                "\n  {} {} {} -> {} {}",
                segment.a.run,
                segment.a.point,
                segment.a.time.format("%H:%M"),
                segment.b.point,
                segment.b.time.format("%H:%M"),
            )?;
        }
        Ok(())
    }
}
