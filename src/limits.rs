use crate::model::Minutes;

pub const MINUTES_PER_DAY: Minutes = 24 * 60;
pub const MAX_SLOT_SIZE: Minutes = MINUTES_PER_DAY;
pub const MAX_RESOURCES_PER_GRID: usize = 1_000;
pub const MAX_BOOKINGS_PER_GRID: usize = 100_000;
/// Primary plus clone columns.
pub const MAX_COLUMNS_PER_GRID: usize = 10_000;
