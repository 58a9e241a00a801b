use ulid::Ulid;

use crate::model::Minutes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    InvalidSlotSize {
        resource: Option<Ulid>,
        slot_size: Minutes,
    },
    InvalidHours {
        resource: Option<Ulid>,
        start: Minutes,
        end: Minutes,
    },
    LimitExceeded(&'static str),
    Config(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidSlotSize {
                resource: Some(id),
                slot_size,
            } => write!(f, "invalid slot size {slot_size} for resource {id}"),
            GridError::InvalidSlotSize {
                resource: None,
                slot_size,
            } => write!(f, "invalid slot size {slot_size}"),
            GridError::InvalidHours {
                resource: Some(id),
                start,
                end,
            } => write!(f, "invalid working hours [{start}, {end}) for resource {id}"),
            GridError::InvalidHours {
                resource: None,
                start,
                end,
            } => write!(f, "invalid working hours [{start}, {end})"),
            GridError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            GridError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for GridError {}
