//! Minute-of-day and slot-rounding arithmetic.
//!
//! Booking starts round down and booking ends round up, so every slot a
//! booking touches is marked as occupied.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::limits::MINUTES_PER_DAY;
use crate::model::{Booking, Minutes, SlotSpan};

/// `hour * 60 + minute`, ignoring the date and seconds.
pub fn minutes_since_midnight(time: NaiveDateTime) -> Minutes {
    (time.hour() * 60 + time.minute()) as Minutes
}

/// Snap `minutes` to a slot boundary measured from midnight.
pub fn round_minutes(minutes: Minutes, slot_size: Minutes, round_up: bool) -> Minutes {
    let rem = minutes.rem_euclid(slot_size);
    if rem == 0 {
        minutes
    } else if round_up {
        minutes - rem + slot_size
    } else {
        minutes - rem
    }
}

/// Minutes since midnight of `time`, rounded down (or up) to a slot boundary.
pub fn round_to_slot(time: NaiveDateTime, slot_size: Minutes, round_up: bool) -> Minutes {
    round_minutes(minutes_since_midnight(time), slot_size, round_up)
}

/// End of the day rounded up to a slot boundary. Past midnight when
/// `slot_size` does not divide the day.
pub fn day_end(slot_size: Minutes) -> Minutes {
    round_minutes(MINUTES_PER_DAY, slot_size, true)
}

/// Like [`round_to_slot`], clipped to `date`: a time on an earlier day is
/// midnight at the start of `date`, a time on a later day is [`day_end`].
pub fn day_minutes(date: NaiveDate, time: NaiveDateTime, slot_size: Minutes, round_up: bool) -> Minutes {
    let day = time.date();
    if day < date {
        0
    } else if day > date {
        day_end(slot_size)
    } else {
        round_to_slot(time, slot_size, round_up)
    }
}

/// The timestamp `minutes` after midnight on `date`.
pub fn time_at(date: NaiveDate, minutes: Minutes) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN) + Duration::minutes(minutes as i64)
}

/// Slot-aligned span a booking occupies on `date`.
///
/// An end before the start is treated as equal to the start, and an empty
/// span is widened to one slot.
pub fn booking_span(date: NaiveDate, booking: &Booking, slot_size: Minutes) -> SlotSpan {
    let mut start = day_minutes(date, booking.start, slot_size, false);
    let mut end = day_minutes(date, booking.end.max(booking.start), slot_size, true);
    if start >= MINUTES_PER_DAY {
        start = day_end(slot_size) - slot_size;
    }
    if end <= start {
        end = start + slot_size;
    }
    SlotSpan::new(start, end)
}
