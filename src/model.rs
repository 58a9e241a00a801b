use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::clock;
use crate::config::WorkingHours;

/// Minutes since midnight. The only time-of-day type inside a grid.
pub type Minutes = i32;

/// Half-open slot-aligned interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpan {
    pub start: Minutes,
    pub end: Minutes,
}

impl SlotSpan {
    pub fn new(start: Minutes, end: Minutes) -> Self {
        debug_assert!(start <= end, "SlotSpan start must not be after end");
        Self { start, end }
    }

    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &SlotSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_minute(&self, m: Minutes) -> bool {
        self.start <= m && m < self.end
    }

    /// Three-way interval compare: `Equal` when the spans overlap at all,
    /// `Less` when `self` lies entirely before `other`, `Greater` when after.
    ///
    /// This is only a total order over a sorted sequence of mutually
    /// non-overlapping spans. Callers binary-searching with it must uphold
    /// that; the comparator cannot check it.
    pub fn compare(&self, other: &SlotSpan) -> Ordering {
        if self.overlaps(other) {
            Ordering::Equal
        } else if self.end <= other.start {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

/// A reservation against one resource. Read-only to the engine: only
/// `resource_id`, `start` and `end` are interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub resource_id: Ulid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Opaque display payload, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Booking {
    pub fn new(resource_id: Ulid, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: Ulid::new(),
            resource_id,
            start,
            end,
            label: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// True if the end precedes the start; such bookings are treated as
    /// zero-length at `start`.
    pub fn is_malformed(&self) -> bool {
        self.end < self.start
    }
}

/// Per-slot classification of a (column, slot) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Free,
    Busy,
    /// Outside the resource's configured working window.
    Unavailable,
}

/// One bookable resource (a "schedule") and its bookings.
///
/// Within one instance no two bookings intersect once rounded to the grid's
/// slot size. Double bookings live in additional instances sharing the same
/// `id` (clone columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: Ulid,
    pub name: Option<String>,
    pub hours: WorkingHours,
    /// Sorted by `start`.
    pub bookings: Vec<Booking>,
}

impl Resource {
    pub fn new(id: Ulid, name: Option<String>, hours: WorkingHours) -> Self {
        Self {
            id,
            name,
            hours,
            bookings: Vec::new(),
        }
    }

    /// Same identity and hours, no bookings.
    pub fn clone_empty(&self) -> Self {
        Self::new(self.id, self.name.clone(), self.hours)
    }

    pub fn start_minutes(&self) -> Minutes {
        self.hours.start_minutes
    }

    pub fn end_minutes(&self) -> Minutes {
        self.hours.end_minutes
    }

    pub fn slot_size(&self) -> Minutes {
        self.hours.slot_size
    }

    /// True if `minutes` falls inside `[start_minutes, end_minutes)`.
    pub fn is_working(&self, minutes: Minutes) -> bool {
        minutes >= self.start_minutes() && minutes < self.end_minutes()
    }

    /// Insert keeping sort order by start; equal starts keep insertion order.
    pub fn add_booking(&mut self, booking: Booking) {
        let pos = self.bookings.partition_point(|b| b.start <= booking.start);
        self.bookings.insert(pos, booking);
    }

    /// The booking whose rounded start falls in the same slot as `time`.
    pub fn booking_at(&self, time: NaiveDateTime, slot_size: Minutes) -> Option<&Booking> {
        let key = clock::round_to_slot(time, slot_size, false);
        self.bookings
            .binary_search_by(|b| clock::round_to_slot(b.start, slot_size, false).cmp(&key))
            .ok()
            .map(|i| &self.bookings[i])
    }

    /// The booking whose rounded span intersects `query`.
    pub fn intersecting(&self, date: NaiveDate, query: &SlotSpan, slot_size: Minutes) -> Option<&Booking> {
        self.bookings
            .binary_search_by(|b| clock::booking_span(date, b, slot_size).compare(query))
            .ok()
            .map(|i| &self.bookings[i])
    }
}

/// External input: one resource, its optional configuration and its bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceBookings {
    pub id: Ulid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub config: crate::config::ResourceConfig,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl ResourceBookings {
    pub fn new(id: Ulid, bookings: Vec<Booking>) -> Self {
        Self {
            id,
            name: None,
            config: Default::default(),
            bookings,
        }
    }
}
