use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::clock::{self, booking_span};
use crate::config::GridConfig;
use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::{Grid, GridError};

#[derive(Debug, Clone, Copy)]
struct Slot {
    start: Minutes,
    /// Index into `groups`.
    group: Option<usize>,
}

/// The contiguous run of slots one booking occupies.
#[derive(Debug, Clone)]
struct SlotGroup {
    /// Index into the resource's bookings.
    booking: usize,
    span: SlotSpan,
    slots: usize,
    start_slot: usize,
}

/// Grid over exactly one resource.
///
/// The window starts as the resource's working hours and widens to take in
/// any booking outside them. Each booking owns one contiguous run of slots.
#[derive(Debug, Clone)]
pub struct SingleResourceGrid {
    date: NaiveDate,
    resources: Vec<Resource>,
    window: SlotSpan,
    groups: Vec<SlotGroup>,
    slots: Vec<Slot>,
}

impl SingleResourceGrid {
    pub fn build(date: NaiveDate, config: &GridConfig, input: ResourceBookings) -> Result<Self, GridError> {
        let started = Instant::now();
        if input.bookings.len() > MAX_BOOKINGS_PER_GRID {
            return Err(GridError::LimitExceeded("too many bookings"));
        }
        let hours = input.config.resolve(input.id, config)?;
        let slot_size = hours.slot_size;

        let mut resource = Resource::new(input.id, input.name, hours);
        let configured = SlotSpan::new(
            clock::round_minutes(hours.start_minutes, slot_size, false),
            clock::round_minutes(hours.end_minutes, slot_size, true),
        );
        let mut window = configured;
        for booking in input.bookings {
            if booking.is_malformed() {
                warn!(booking = %booking.id, "booking ends before it starts, treating as zero-length");
                metrics::counter!(observability::MALFORMED_BOOKINGS_TOTAL).increment(1);
            }
            let span = booking_span(date, &booking, slot_size);
            window.start = window.start.min(span.start);
            window.end = window.end.max(span.end);
            resource.add_booking(booking);
        }
        if window != configured {
            debug!(
                resource = %resource.id,
                from_start = configured.start,
                from_end = configured.end,
                to_start = window.start,
                to_end = window.end,
                "widened grid window to fit bookings"
            );
            metrics::counter!(observability::WINDOW_WIDENED_TOTAL, "kind" => "single").increment(1);
        }

        let mut groups: Vec<SlotGroup> = resource
            .bookings
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let span = booking_span(date, b, slot_size);
                SlotGroup {
                    booking: i,
                    span,
                    slots: (span.duration() / slot_size) as usize,
                    start_slot: 0,
                }
            })
            .collect();
        let slots = lay_out_slots(&mut groups, window, slot_size);

        metrics::counter!(observability::BUILDS_TOTAL, "kind" => "single").increment(1);
        metrics::histogram!(observability::BUILD_DURATION_SECONDS, "kind" => "single")
            .record(started.elapsed().as_secs_f64());

        Ok(Self {
            date,
            resources: vec![resource],
            window,
            groups,
            slots,
        })
    }

    pub fn resource(&self) -> &Resource {
        &self.resources[0]
    }

    fn group_at(&self, slot: usize) -> Option<&SlotGroup> {
        self.slots
            .get(slot)?
            .group
            .map(|g| &self.groups[g])
    }
}

/// Walk the window emitting empty slots up to each group's start, then the
/// group's own slots. An overlapping booking rewinds to its own start so it
/// still gets a contiguous run; the walk then resumes after the furthest end
/// seen so far.
fn lay_out_slots(groups: &mut [SlotGroup], window: SlotSpan, slot_size: Minutes) -> Vec<Slot> {
    let mut slots = Vec::with_capacity((window.duration() / slot_size) as usize);
    let mut minutes = window.start;
    let mut reach = window.start;

    for (index, group) in groups.iter_mut().enumerate() {
        if minutes <= group.span.start {
            while minutes < group.span.start {
                slots.push(Slot { start: minutes, group: None });
                minutes += slot_size;
            }
        } else {
            minutes = group.span.start;
        }
        group.start_slot = slots.len();
        for _ in 0..group.slots {
            slots.push(Slot {
                start: minutes,
                group: Some(index),
            });
            minutes += slot_size;
        }
        reach = reach.max(minutes);
        minutes = reach;
    }

    while minutes < window.end {
        slots.push(Slot { start: minutes, group: None });
        minutes += slot_size;
    }
    slots
}

impl Grid for SingleResourceGrid {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn slot_size(&self) -> Minutes {
        self.resource().slot_size()
    }

    fn resources(&self) -> &[Resource] {
        &self.resources
    }

    fn start_minutes_of_slot(&self, slot: usize) -> Option<Minutes> {
        self.slots.get(slot).map(|s| s.start)
    }

    fn booking_at(&self, column: usize, slot: usize) -> Option<&Booking> {
        if column != 0 {
            return None;
        }
        self.group_at(slot)
            .map(|g| &self.resource().bookings[g.booking])
    }

    fn slots_occupied(&self, booking: &Booking, from_slot: usize) -> usize {
        match self.group_at(from_slot) {
            Some(g) if self.resource().bookings[g.booking].id == booking.id => {
                g.start_slot + g.slots - from_slot
            }
            _ => 0,
        }
    }

    fn start_minutes(&self) -> Option<Minutes> {
        Some(self.window.start)
    }

    fn end_minutes(&self) -> Option<Minutes> {
        Some(self.window.end)
    }
}
