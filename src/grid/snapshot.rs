use chrono::NaiveDate;
use serde::Serialize;
use ulid::Ulid;

use crate::model::*;

use super::Grid;

/// Serialisable dump of a grid, one entry per rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    pub date: NaiveDate,
    pub slot_size: Minutes,
    /// `HH:MM` start of every slot.
    pub slots: Vec<String>,
    pub columns: Vec<ColumnSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSnapshot {
    pub resource_id: Ulid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 0 for the resource's primary column, 1.. for its clone columns.
    pub track: usize,
    pub cells: Vec<CellSnapshot>,
}

/// A cell covering `span` slots from `slot`. Busy runs and unavailable runs
/// collapse into one cell each; free slots are one cell apiece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellSnapshot {
    pub slot: usize,
    pub span: usize,
    pub availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Ulid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

pub fn snapshot<G: Grid + ?Sized>(grid: &G) -> GridSnapshot {
    let slots = (0..grid.slot_count())
        .filter_map(|s| grid.start_minutes_of_slot(s))
        .map(|m| format!("{:02}:{:02}", m / 60, m % 60))
        .collect();

    let mut columns = Vec::with_capacity(grid.resources().len());
    let mut track = 0;
    for (column, resource) in grid.resources().iter().enumerate() {
        track = match column.checked_sub(1).map(|prev| &grid.resources()[prev]) {
            Some(prev) if prev.id == resource.id => track + 1,
            _ => 0,
        };
        columns.push(ColumnSnapshot {
            resource_id: resource.id,
            name: resource.name.clone(),
            track,
            cells: column_cells(grid, column),
        });
    }

    GridSnapshot {
        date: grid.date(),
        slot_size: grid.slot_size(),
        slots,
        columns,
    }
}

fn column_cells<G: Grid + ?Sized>(grid: &G, column: usize) -> Vec<CellSnapshot> {
    let mut cells = Vec::new();
    let mut slot = 0;
    while slot < grid.slot_count() {
        let Some(availability) = grid.availability(column, slot) else {
            break;
        };
        let booking = grid.booking_at(column, slot);
        let span = match availability {
            Availability::Busy => booking.map_or(1, |b| grid.slots_occupied(b, slot)),
            Availability::Unavailable => grid.unavailable_run(column, slot),
            Availability::Free => 1,
        }
        .max(1);
        cells.push(CellSnapshot {
            slot,
            span,
            availability,
            booking: booking.map(|b| b.id),
            label: booking.and_then(|b| b.label.clone()),
        });
        slot += span;
    }
    cells
}
