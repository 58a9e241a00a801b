//! Metric names. The crate only records through the `metrics` facade; the
//! embedding application decides whether and where to export.

/// Counter: grids built. Labels: kind (`single`, `multi`).
pub const BUILDS_TOTAL: &str = "slotgrid_builds_total";

/// Histogram: grid build time in seconds. Labels: kind.
pub const BUILD_DURATION_SECONDS: &str = "slotgrid_build_duration_seconds";

/// Counter: clone columns created for double bookings.
pub const CLONE_COLUMNS_TOTAL: &str = "slotgrid_clone_columns_total";

/// Counter: builds whose window was widened past working hours. Labels: kind.
pub const WINDOW_WIDENED_TOTAL: &str = "slotgrid_window_widened_total";

/// Counter: bookings ending before they start.
pub const MALFORMED_BOOKINGS_TOTAL: &str = "slotgrid_malformed_bookings_total";
