use std::collections::HashMap;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, trace, warn};
use ulid::Ulid;

use crate::clock::{self, booking_span};
use crate::config::{GridConfig, WorkingHours};
use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::conflict::first_free_column;
use super::{Grid, GridError};

/// Grid aligned across many resources.
///
/// Bounds are the earliest start and latest end over all resources, at the
/// finest slot size. A booking that collides with one already placed goes into
/// a clone column (same resource identity, empty booking list) directly after
/// its origin's columns, so double bookings stay visible side by side.
/// Repeated entries for one resource id merge into the group of the first,
/// keeping that entry's name and hours.
#[derive(Debug, Clone)]
pub struct MultiResourceGrid {
    date: NaiveDate,
    slot_size: Minutes,
    window: SlotSpan,
    columns: Vec<Resource>,
    clones: usize,
}

impl MultiResourceGrid {
    pub fn build(date: NaiveDate, config: &GridConfig, inputs: Vec<ResourceBookings>) -> Result<Self, GridError> {
        let started = Instant::now();
        if inputs.len() > MAX_RESOURCES_PER_GRID {
            return Err(GridError::LimitExceeded("too many resources"));
        }
        if inputs.iter().map(|r| r.bookings.len()).sum::<usize>() > MAX_BOOKINGS_PER_GRID {
            return Err(GridError::LimitExceeded("too many bookings"));
        }

        let resolved = inputs
            .into_iter()
            .map(|input| input.config.resolve(input.id, config).map(|hours| (input, hours)))
            .collect::<Result<Vec<_>, _>>()?;
        let (slot_size, configured) = grid_bounds(&resolved, config)?;

        let mut window = configured;
        let mut groups: Vec<Vec<Resource>> = Vec::with_capacity(resolved.len());
        let mut group_of: HashMap<Ulid, usize> = HashMap::with_capacity(resolved.len());
        let mut column_count = 0usize;
        let mut clones = 0usize;

        for (input, hours) in resolved {
            let index = match group_of.get(&input.id) {
                Some(&index) => {
                    debug!(resource = %input.id, "merging repeated resource entry into its first column group");
                    index
                }
                None => {
                    groups.push(vec![Resource::new(input.id, input.name, hours)]);
                    group_of.insert(input.id, groups.len() - 1);
                    column_count += 1;
                    groups.len() - 1
                }
            };
            let group = &mut groups[index];
            for booking in input.bookings {
                if booking.is_malformed() {
                    warn!(booking = %booking.id, "booking ends before it starts, treating as zero-length");
                    metrics::counter!(observability::MALFORMED_BOOKINGS_TOTAL).increment(1);
                }
                let span = booking_span(date, &booking, slot_size);
                window.start = window.start.min(span.start);
                window.end = window.end.max(span.end);

                let column = match first_free_column(group.as_slice(), date, &span, slot_size) {
                    Some(column) => column,
                    None => {
                        let clone = group[0].clone_empty();
                        group.push(clone);
                        clones += 1;
                        column_count += 1;
                        debug!(
                            resource = %input.id,
                            booking = %booking.id,
                            columns = group.len(),
                            "double booking, added clone column"
                        );
                        group.len() - 1
                    }
                };
                trace!(booking = %booking.id, column, start = span.start, end = span.end, "placed booking");
                group[column].add_booking(booking);
            }
            if column_count > MAX_COLUMNS_PER_GRID {
                return Err(GridError::LimitExceeded("too many columns"));
            }
        }
        let columns: Vec<Resource> = groups.into_iter().flatten().collect();

        if window != configured {
            debug!(
                from_start = configured.start,
                from_end = configured.end,
                to_start = window.start,
                to_end = window.end,
                "widened grid window to fit bookings"
            );
            metrics::counter!(observability::WINDOW_WIDENED_TOTAL, "kind" => "multi").increment(1);
        }
        metrics::counter!(observability::CLONE_COLUMNS_TOTAL).increment(clones as u64);
        metrics::counter!(observability::BUILDS_TOTAL, "kind" => "multi").increment(1);
        metrics::histogram!(observability::BUILD_DURATION_SECONDS, "kind" => "multi")
            .record(started.elapsed().as_secs_f64());

        Ok(Self {
            date,
            slot_size,
            window,
            columns,
            clones,
        })
    }

    /// Column indexes belonging to `resource`, primary first.
    pub fn columns_of(&self, resource: Ulid) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.id == resource)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of clone columns created for double bookings.
    pub fn clone_count(&self) -> usize {
        self.clones
    }

    fn slot_span(&self, slot: usize) -> Option<SlotSpan> {
        self.start_minutes_of_slot(slot)
            .map(|m| SlotSpan::new(m, m + self.slot_size))
    }
}

/// Finest slot size, and the earliest start / latest end aligned to it. With
/// no resources the configured defaults apply.
fn grid_bounds(
    resolved: &[(ResourceBookings, WorkingHours)],
    config: &GridConfig,
) -> Result<(Minutes, SlotSpan), GridError> {
    let hours: Vec<WorkingHours> = if resolved.is_empty() {
        vec![config.default_hours()?]
    } else {
        resolved.iter().map(|(_, h)| *h).collect()
    };
    let slot_size = hours.iter().map(|h| h.slot_size).min().unwrap_or(config.default_slot_size);
    let start = hours.iter().map(|h| h.start_minutes).min().unwrap_or(config.default_start_minutes);
    let end = hours.iter().map(|h| h.end_minutes).max().unwrap_or(config.default_end_minutes);
    Ok((
        slot_size,
        SlotSpan::new(
            clock::round_minutes(start, slot_size, false),
            clock::round_minutes(end, slot_size, true),
        ),
    ))
}

impl Grid for MultiResourceGrid {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn slot_count(&self) -> usize {
        (self.window.duration() / self.slot_size) as usize
    }

    fn slot_size(&self) -> Minutes {
        self.slot_size
    }

    fn resources(&self) -> &[Resource] {
        &self.columns
    }

    fn start_minutes_of_slot(&self, slot: usize) -> Option<Minutes> {
        (slot < self.slot_count()).then(|| self.window.start + slot as Minutes * self.slot_size)
    }

    fn booking_at(&self, column: usize, slot: usize) -> Option<&Booking> {
        let resource = self.columns.get(column)?;
        let query = self.slot_span(slot)?;
        resource.intersecting(self.date, &query, self.slot_size)
    }

    fn slots_occupied(&self, booking: &Booking, from_slot: usize) -> usize {
        let Some(slot) = self.slot_span(from_slot) else {
            return 0;
        };
        let span = booking_span(self.date, booking, self.slot_size);
        if !span.overlaps(&slot) {
            return 0;
        }
        let end = span.end.min(self.window.end);
        ((end - slot.start) / self.slot_size).max(0) as usize
    }

    fn start_minutes(&self) -> Option<Minutes> {
        Some(self.window.start)
    }

    fn end_minutes(&self) -> Option<Minutes> {
        Some(self.window.end)
    }
}
