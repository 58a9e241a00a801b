use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::grid::GridError;
use crate::limits::{MAX_SLOT_SIZE, MINUTES_PER_DAY};
use crate::model::Minutes;

pub const DEFAULT_START_MINUTES: Minutes = 8 * 60;
pub const DEFAULT_END_MINUTES: Minutes = 18 * 60;
pub const DEFAULT_SLOT_SIZE: Minutes = 15;

/// A resource's validated working window and slot size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start_minutes: Minutes,
    pub end_minutes: Minutes,
    pub slot_size: Minutes,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_minutes: DEFAULT_START_MINUTES,
            end_minutes: DEFAULT_END_MINUTES,
            slot_size: DEFAULT_SLOT_SIZE,
        }
    }
}

impl WorkingHours {
    pub fn new(start_minutes: Minutes, end_minutes: Minutes, slot_size: Minutes) -> Result<Self, GridError> {
        let hours = Self {
            start_minutes,
            end_minutes,
            slot_size,
        };
        hours.validate(None)?;
        Ok(hours)
    }

    fn validate(&self, resource: Option<Ulid>) -> Result<(), GridError> {
        if self.slot_size <= 0 || self.slot_size > MAX_SLOT_SIZE {
            return Err(GridError::InvalidSlotSize {
                resource,
                slot_size: self.slot_size,
            });
        }
        if self.start_minutes < 0 || self.end_minutes > MINUTES_PER_DAY || self.end_minutes <= self.start_minutes {
            return Err(GridError::InvalidHours {
                resource,
                start: self.start_minutes,
                end: self.end_minutes,
            });
        }
        Ok(())
    }
}

/// Per-resource configuration as supplied by the caller. Unset fields fall
/// back to the [`GridConfig`] defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_minutes: Option<Minutes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_minutes: Option<Minutes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_size: Option<Minutes>,
}

impl ResourceConfig {
    pub fn new(start_minutes: Minutes, end_minutes: Minutes, slot_size: Minutes) -> Self {
        Self {
            start_minutes: Some(start_minutes),
            end_minutes: Some(end_minutes),
            slot_size: Some(slot_size),
        }
    }

    /// Fill unset fields from `defaults` and validate the result.
    pub fn resolve(&self, resource: Ulid, defaults: &GridConfig) -> Result<WorkingHours, GridError> {
        let hours = WorkingHours {
            start_minutes: self.start_minutes.unwrap_or(defaults.default_start_minutes),
            end_minutes: self.end_minutes.unwrap_or(defaults.default_end_minutes),
            slot_size: self.slot_size.unwrap_or(defaults.default_slot_size),
        };
        hours.validate(Some(resource))?;
        Ok(hours)
    }
}

/// Defaults threaded into every grid build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub default_start_minutes: Minutes,
    pub default_end_minutes: Minutes,
    pub default_slot_size: Minutes,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_start_minutes: DEFAULT_START_MINUTES,
            default_end_minutes: DEFAULT_END_MINUTES,
            default_slot_size: DEFAULT_SLOT_SIZE,
        }
    }
}

impl GridConfig {
    /// Read `SLOTGRID_DEFAULT_START`, `SLOTGRID_DEFAULT_END` (`HH:MM` or
    /// minutes) and `SLOTGRID_DEFAULT_SLOT_SIZE` (minutes). Unset or
    /// unparsable variables keep the built-in default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            default_start_minutes: lookup("SLOTGRID_DEFAULT_START")
                .and_then(|s| parse_time_of_day(&s))
                .unwrap_or(defaults.default_start_minutes),
            default_end_minutes: lookup("SLOTGRID_DEFAULT_END")
                .and_then(|s| parse_time_of_day(&s))
                .unwrap_or(defaults.default_end_minutes),
            default_slot_size: lookup("SLOTGRID_DEFAULT_SLOT_SIZE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.default_slot_size),
        }
    }

    pub fn default_hours(&self) -> Result<WorkingHours, GridError> {
        let hours = WorkingHours {
            start_minutes: self.default_start_minutes,
            end_minutes: self.default_end_minutes,
            slot_size: self.default_slot_size,
        };
        hours.validate(None)?;
        Ok(hours)
    }
}

/// Parse `HH:MM` (with `24:00` meaning end of day) or a bare minute count.
pub fn parse_time_of_day(s: &str) -> Option<Minutes> {
    let s = s.trim();
    if s == "24:00" {
        return Some(MINUTES_PER_DAY);
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        return Some((t.hour() * 60 + t.minute()) as Minutes);
    }
    s.parse::<Minutes>()
        .ok()
        .filter(|m| (0..=MINUTES_PER_DAY).contains(m))
}
