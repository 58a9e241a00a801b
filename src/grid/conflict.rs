use chrono::NaiveDate;

use crate::clock::booking_span;
use crate::model::*;

/// True if any two bookings intersect once rounded to `slot_size`.
pub fn has_overlapping_bookings(date: NaiveDate, bookings: &[Booking], slot_size: Minutes) -> bool {
    let mut spans: Vec<SlotSpan> = bookings
        .iter()
        .map(|b| booking_span(date, b, slot_size))
        .collect();
    spans.sort_by_key(|s| s.start);

    let mut reach: Option<Minutes> = None;
    for span in spans {
        if let Some(end) = reach
            && span.start < end
        {
            return true;
        }
        reach = Some(reach.map_or(span.end, |end| end.max(span.end)));
    }
    false
}

/// First column in `columns` with no booking intersecting `span`.
pub(super) fn first_free_column(
    columns: &[Resource],
    date: NaiveDate,
    span: &SlotSpan,
    slot_size: Minutes,
) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.intersecting(date, span, slot_size).is_none())
}
