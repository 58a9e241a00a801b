use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::model::*;

use super::{Grid, GridError};

/// A contiguous slot range of another grid, presented as a whole grid.
///
/// Holds no booking data: every query is forwarded with the slot index
/// shifted by `start_slot`. The underlying grid is borrowed, so any number of
/// views can share it, across threads if it is `Sync`.
#[derive(Debug)]
pub struct WindowedGridView<'a, G: Grid + ?Sized> {
    grid: &'a G,
    start_slot: usize,
    slot_count: usize,
}

/// View of `grid` restricted to slots starting in `[start_minutes, end_minutes)`.
/// A window wider than the grid is narrowed to it; one that misses the grid
/// entirely yields an empty view.
pub fn windowed<G: Grid + ?Sized>(grid: &G, start_minutes: Minutes, end_minutes: Minutes) -> WindowedGridView<'_, G> {
    WindowedGridView::new(grid, start_minutes, end_minutes)
}

impl<G: Grid + ?Sized> Clone for WindowedGridView<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: Grid + ?Sized> Copy for WindowedGridView<'_, G> {}

impl<'a, G: Grid + ?Sized> WindowedGridView<'a, G> {
    pub fn new(grid: &'a G, start_minutes: Minutes, end_minutes: Minutes) -> Self {
        let count = grid.slot_count();
        let starts = |s: usize| grid.start_minutes_of_slot(s);
        let first = (0..count).find(|&s| starts(s).is_some_and(|m| m >= start_minutes));
        let last = (0..count).rev().find(|&s| starts(s).is_some_and(|m| m < end_minutes));
        match (first, last) {
            (Some(first), Some(last)) if first <= last => Self {
                grid,
                start_slot: first,
                slot_count: last - first + 1,
            },
            _ => Self {
                grid,
                start_slot: 0,
                slot_count: 0,
            },
        }
    }

    /// Slot in the underlying grid that slot 0 of this view maps to.
    pub fn start_slot(&self) -> usize {
        self.start_slot
    }

    pub fn underlying(&self) -> &'a G {
        self.grid
    }

    fn translate(&self, slot: usize) -> Option<usize> {
        (slot < self.slot_count).then_some(slot + self.start_slot)
    }
}

impl<G: Grid + ?Sized> Grid for WindowedGridView<'_, G> {
    fn date(&self) -> NaiveDate {
        self.grid.date()
    }

    fn slot_count(&self) -> usize {
        self.slot_count
    }

    fn slot_size(&self) -> Minutes {
        self.grid.slot_size()
    }

    fn resources(&self) -> &[Resource] {
        self.grid.resources()
    }

    fn start_minutes_of_slot(&self, slot: usize) -> Option<Minutes> {
        self.grid.start_minutes_of_slot(self.translate(slot)?)
    }

    fn booking_at(&self, column: usize, slot: usize) -> Option<&Booking> {
        self.grid.booking_at(column, self.translate(slot)?)
    }

    /// Clipped at the end of the view.
    fn slots_occupied(&self, booking: &Booking, from_slot: usize) -> usize {
        match self.translate(from_slot) {
            Some(slot) => self
                .grid
                .slots_occupied(booking, slot)
                .min(self.slot_count - from_slot),
            None => 0,
        }
    }
}

/// Named day parts a view can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    All,
    Morning,
    Afternoon,
    Evening,
    Am,
    Pm,
}

impl TimeRange {
    const fn hours(self) -> (Minutes, Minutes) {
        match self {
            TimeRange::All => (0, 24),
            TimeRange::Morning => (8, 12),
            TimeRange::Afternoon => (12, 17),
            TimeRange::Evening => (17, 24),
            TimeRange::Am => (0, 12),
            TimeRange::Pm => (12, 24),
        }
    }

    pub const fn start_minutes(self) -> Minutes {
        self.hours().0 * 60
    }

    pub const fn end_minutes(self) -> Minutes {
        self.hours().1 * 60
    }

    /// The day part a time falls in: before 08:00 is `Am`, then `Morning`,
    /// `Afternoon` from 12:00 and `Evening` from 17:00.
    pub fn containing(time: NaiveDateTime) -> Self {
        match time.hour() {
            0..8 => TimeRange::Am,
            8..12 => TimeRange::Morning,
            12..17 => TimeRange::Afternoon,
            _ => TimeRange::Evening,
        }
    }

    pub fn view<G: Grid + ?Sized>(self, grid: &G) -> WindowedGridView<'_, G> {
        windowed(grid, self.start_minutes(), self.end_minutes())
    }
}

impl FromStr for TimeRange {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TimeRange::All),
            "morning" => Ok(TimeRange::Morning),
            "afternoon" => Ok(TimeRange::Afternoon),
            "evening" => Ok(TimeRange::Evening),
            "am" => Ok(TimeRange::Am),
            "pm" => Ok(TimeRange::Pm),
            other => Err(GridError::Config(format!("unknown time range: {other}"))),
        }
    }
}
