mod conflict;
mod error;
mod multi;
mod single;
mod snapshot;
mod view;

pub use conflict::has_overlapping_bookings;
pub use error::GridError;
pub use multi::MultiResourceGrid;
pub use single::SingleResourceGrid;
pub use snapshot::{CellSnapshot, ColumnSnapshot, GridSnapshot, snapshot};
pub use view::{TimeRange, WindowedGridView, windowed};

use chrono::{NaiveDate, NaiveDateTime};

use crate::clock;
use crate::config::GridConfig;
use crate::model::*;

/// Read-only slot-by-column occupancy of one day.
///
/// Columns index into [`Grid::resources`]; a double-booked resource shows up
/// as several adjacent columns sharing one `id`. Out-of-range columns and
/// slots are never an error: lookups return `None` (or `0` for counts).
pub trait Grid {
    fn date(&self) -> NaiveDate;

    fn slot_count(&self) -> usize;

    /// Slot size in minutes.
    fn slot_size(&self) -> Minutes;

    fn resources(&self) -> &[Resource];

    fn start_minutes_of_slot(&self, slot: usize) -> Option<Minutes>;

    fn booking_at(&self, column: usize, slot: usize) -> Option<&Booking>;

    /// Slots the booking's run still covers, counting from `from_slot`.
    /// Zero if the booking does not occupy `from_slot`.
    fn slots_occupied(&self, booking: &Booking, from_slot: usize) -> usize;

    fn start_time_of_slot(&self, slot: usize) -> Option<NaiveDateTime> {
        self.start_minutes_of_slot(slot)
            .map(|m| clock::time_at(self.date(), m))
    }

    /// Hour of day (0..=23) the slot starts in.
    fn hour_of_slot(&self, slot: usize) -> Option<u32> {
        self.start_minutes_of_slot(slot).map(|m| (m / 60) as u32)
    }

    /// Busy wins over unavailable, so bookings outside working hours show.
    fn availability(&self, column: usize, slot: usize) -> Option<Availability> {
        let resource = self.resources().get(column)?;
        let minutes = self.start_minutes_of_slot(slot)?;
        if self.booking_at(column, slot).is_some() {
            Some(Availability::Busy)
        } else if !resource.is_working(minutes) {
            Some(Availability::Unavailable)
        } else {
            Some(Availability::Free)
        }
    }

    /// Consecutive unavailable slots for `column` starting at `slot`.
    fn unavailable_run(&self, column: usize, slot: usize) -> usize {
        (slot..self.slot_count())
            .take_while(|&s| self.availability(column, s) == Some(Availability::Unavailable))
            .count()
    }

    /// First slot whose `[start, start + slot_size)` contains `minutes`.
    fn first_slot(&self, minutes: Minutes) -> Option<usize> {
        let size = self.slot_size();
        (0..self.slot_count()).find(|&s| {
            self.start_minutes_of_slot(s)
                .is_some_and(|start| start <= minutes && minutes < start + size)
        })
    }

    /// Last slot whose `[start, start + slot_size)` contains `minutes`.
    fn last_slot(&self, minutes: Minutes) -> Option<usize> {
        let size = self.slot_size();
        (0..self.slot_count()).rev().find(|&s| {
            self.start_minutes_of_slot(s)
                .is_some_and(|start| start <= minutes && minutes < start + size)
        })
    }

    /// Slot containing `time`, if it is on the grid's date and inside the grid.
    fn slot_of(&self, time: NaiveDateTime) -> Option<usize> {
        if time.date() != self.date() {
            return None;
        }
        self.first_slot(clock::minutes_since_midnight(time))
    }

    /// Minutes since midnight the first slot starts at.
    fn start_minutes(&self) -> Option<Minutes> {
        self.start_minutes_of_slot(0)
    }

    /// Minutes since midnight the last slot ends at.
    fn end_minutes(&self) -> Option<Minutes> {
        let last = self.slot_count().checked_sub(1)?;
        self.start_minutes_of_slot(last).map(|m| m + self.slot_size())
    }
}

/// The grid shapes a build can produce.
#[derive(Debug, Clone)]
pub enum ScheduleGrid {
    Single(SingleResourceGrid),
    Multi(MultiResourceGrid),
}

impl ScheduleGrid {
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleGrid::Single(_) => "single",
            ScheduleGrid::Multi(_) => "multi",
        }
    }
}

impl Grid for ScheduleGrid {
    fn date(&self) -> NaiveDate {
        match self {
            ScheduleGrid::Single(g) => g.date(),
            ScheduleGrid::Multi(g) => g.date(),
        }
    }

    fn slot_count(&self) -> usize {
        match self {
            ScheduleGrid::Single(g) => g.slot_count(),
            ScheduleGrid::Multi(g) => g.slot_count(),
        }
    }

    fn slot_size(&self) -> Minutes {
        match self {
            ScheduleGrid::Single(g) => g.slot_size(),
            ScheduleGrid::Multi(g) => g.slot_size(),
        }
    }

    fn resources(&self) -> &[Resource] {
        match self {
            ScheduleGrid::Single(g) => g.resources(),
            ScheduleGrid::Multi(g) => g.resources(),
        }
    }

    fn start_minutes_of_slot(&self, slot: usize) -> Option<Minutes> {
        match self {
            ScheduleGrid::Single(g) => g.start_minutes_of_slot(slot),
            ScheduleGrid::Multi(g) => g.start_minutes_of_slot(slot),
        }
    }

    fn booking_at(&self, column: usize, slot: usize) -> Option<&Booking> {
        match self {
            ScheduleGrid::Single(g) => g.booking_at(column, slot),
            ScheduleGrid::Multi(g) => g.booking_at(column, slot),
        }
    }

    fn slots_occupied(&self, booking: &Booking, from_slot: usize) -> usize {
        match self {
            ScheduleGrid::Single(g) => g.slots_occupied(booking, from_slot),
            ScheduleGrid::Multi(g) => g.slots_occupied(booking, from_slot),
        }
    }
}

pub fn build_single_resource_grid(
    date: NaiveDate,
    config: &GridConfig,
    resource: ResourceBookings,
) -> Result<SingleResourceGrid, GridError> {
    SingleResourceGrid::build(date, config, resource)
}

pub fn build_multi_resource_grid(
    date: NaiveDate,
    config: &GridConfig,
    resources: Vec<ResourceBookings>,
) -> Result<MultiResourceGrid, GridError> {
    MultiResourceGrid::build(date, config, resources)
}

/// Build the grid a day view needs: a single-resource grid when there is one
/// resource without double bookings, a multi-resource grid otherwise.
pub fn build_grid(
    date: NaiveDate,
    config: &GridConfig,
    mut resources: Vec<ResourceBookings>,
) -> Result<ScheduleGrid, GridError> {
    if resources.len() == 1 {
        let only = &resources[0];
        let hours = only.config.resolve(only.id, config)?;
        if !has_overlapping_bookings(date, &only.bookings, hours.slot_size) {
            let resource = resources.remove(0);
            return SingleResourceGrid::build(date, config, resource).map(ScheduleGrid::Single);
        }
        tracing::debug!(resource = %only.id, "double bookings present, using multi-resource grid");
    }
    MultiResourceGrid::build(date, config, resources).map(ScheduleGrid::Multi)
}
