//! Day-view scheduling grids.
//!
//! Turns the bookings of one or more resources into a rectangular grid of
//! fixed-size time slots: one column per resource (plus clone columns for
//! double bookings), one row per slot. Grids are built once and then only
//! read; [`grid::windowed`] restricts any grid to part of the day without
//! copying it.

pub mod clock;
pub mod config;
pub mod grid;
pub mod limits;
pub mod model;
pub mod observability;

pub use config::{GridConfig, ResourceConfig, WorkingHours};
pub use grid::{
    Grid, GridError, MultiResourceGrid, ScheduleGrid, SingleResourceGrid, TimeRange, WindowedGridView,
    build_grid, build_multi_resource_grid, build_single_resource_grid, windowed,
};
pub use model::{Availability, Booking, Minutes, Resource, ResourceBookings, SlotSpan};
