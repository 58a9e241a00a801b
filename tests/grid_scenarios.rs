use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ulid::Ulid;

use slotgrid::clock::{booking_span, minutes_since_midnight, round_to_slot, time_at};
use slotgrid::{
    Availability, Booking, Grid, GridConfig, Minutes, ResourceBookings, ResourceConfig, build_grid,
    build_multi_resource_grid, build_single_resource_grid, windowed,
};

// ── Test infrastructure ──────────────────────────────────────

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    date().and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn resource(spans: &[(NaiveDateTime, NaiveDateTime)]) -> ResourceBookings {
    let id = Ulid::new();
    ResourceBookings::new(id, spans.iter().map(|&(s, e)| Booking::new(id, s, e)).collect())
}

fn slot_starts<G: Grid + ?Sized>(grid: &G) -> Vec<Option<Minutes>> {
    (0..grid.slot_count()).map(|s| grid.start_minutes_of_slot(s)).collect()
}

/// Deterministic pseudo-random bookings: a day's worth of appointments with
/// plenty of collisions.
fn busy_day(resource: Ulid, n: u32, seed: u32) -> Vec<Booking> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (state >> 16) & 0x7fff
    };
    (0..n)
        .map(|_| {
            let start = 7 * 60 + (next() % (11 * 60)) as i32;
            let len = [5, 10, 15, 20, 30, 45, 60, 90][(next() % 8) as usize];
            Booking::new(resource, time_at(date(), start), time_at(date(), start + len))
        })
        .collect()
}

// ── End-to-end scenarios ─────────────────────────────────────

#[test]
fn scenario_one_booking_in_default_day() {
    let grid = build_single_resource_grid(date(), &GridConfig::default(), resource(&[(at(9, 0), at(9, 30))]))
        .unwrap();

    assert_eq!(grid.slot_count(), 40);
    assert_eq!(grid.start_time_of_slot(0), Some(at(8, 0)));
    let nine = grid.slot_of(at(9, 0)).unwrap();
    let nine_fifteen = grid.slot_of(at(9, 15)).unwrap();
    let b = grid.booking_at(0, nine).unwrap().clone();
    assert_eq!(grid.booking_at(0, nine_fifteen).map(|x| x.id), Some(b.id));
    assert_eq!(grid.slots_occupied(&b, nine), 2);

    for slot in 0..grid.slot_count() {
        let expected = if slot == nine || slot == nine_fifteen {
            Availability::Busy
        } else {
            Availability::Free
        };
        assert_eq!(grid.availability(0, slot), Some(expected), "slot {slot}");
    }
}

#[test]
fn scenario_booking_before_opening_widens_window() {
    let grid = build_single_resource_grid(date(), &GridConfig::default(), resource(&[(at(7, 50), at(8, 10))]))
        .unwrap();
    assert_eq!(grid.start_time_of_slot(0), Some(at(7, 45)));
    assert_eq!(grid.availability(0, 0), Some(Availability::Busy));
}

#[test]
fn scenario_two_resources_same_time_no_clones() {
    let grid = build_multi_resource_grid(
        date(),
        &GridConfig::default(),
        vec![resource(&[(at(10, 0), at(10, 30))]), resource(&[(at(10, 0), at(10, 30))])],
    )
    .unwrap();
    assert_eq!(grid.resources().len(), 2);
    assert_ne!(grid.resources()[0].id, grid.resources()[1].id);
    assert_eq!(grid.clone_count(), 0);
}

#[test]
fn scenario_double_booking_makes_clone_column() {
    let r = resource(&[(at(10, 0), at(10, 30)), (at(10, 15), at(10, 45))]);
    let (first, second) = (r.bookings[0].id, r.bookings[1].id);
    let grid = build_multi_resource_grid(date(), &GridConfig::default(), vec![r]).unwrap();

    assert_eq!(grid.resources().len(), 2);
    assert_eq!(grid.resources()[0].id, grid.resources()[1].id);
    let ids = |c: usize| grid.resources()[c].bookings.iter().map(|b| b.id).collect::<Vec<_>>();
    assert_eq!(ids(0), vec![first]);
    assert_eq!(ids(1), vec![second]);
}

#[test]
fn scenario_afternoon_window() {
    let grid = build_grid(date(), &GridConfig::default(), vec![resource(&[])]).unwrap();
    let view = windowed(&grid, 12 * 60, 17 * 60);
    assert_eq!(view.slot_count(), 20);
    assert_eq!(view.start_time_of_slot(0), Some(at(12, 0)));
}

// ── Properties ───────────────────────────────────────────────

#[test]
fn every_booking_covers_a_contiguous_run() {
    for seed in 1..20 {
        let id = Ulid::new();
        let mut bookings = busy_day(id, 12, seed);
        // keep one column: drop anything colliding with an earlier booking
        let mut kept: Vec<Booking> = Vec::new();
        bookings.sort_by_key(|b| b.start);
        for b in bookings {
            let span = booking_span(date(), &b, 15);
            if kept.iter().all(|k| !booking_span(date(), k, 15).overlaps(&span)) {
                kept.push(b);
            }
        }
        let grid =
            build_single_resource_grid(date(), &GridConfig::default(), ResourceBookings::new(id, kept.clone()))
                .unwrap();

        for b in &kept {
            let first = (0..grid.slot_count())
                .find(|&s| grid.booking_at(0, s).is_some_and(|x| x.id == b.id))
                .unwrap();
            let run = grid.slots_occupied(b, first);
            assert!(run >= 1);
            assert!(grid.start_time_of_slot(first).unwrap() <= b.start);
            for slot in first..first + run {
                assert_eq!(grid.booking_at(0, slot).map(|x| x.id), Some(b.id));
            }
            assert_ne!(grid.booking_at(0, first + run).map(|x| x.id), Some(b.id));
        }
    }
}

#[test]
fn columns_never_hold_overlapping_bookings() {
    for seed in 1..20 {
        let a = Ulid::new();
        let b = Ulid::new();
        let inputs = vec![
            ResourceBookings::new(a, busy_day(a, 25, seed)),
            ResourceBookings::new(b, busy_day(b, 10, seed * 7)),
        ];
        let grid = build_multi_resource_grid(date(), &GridConfig::default(), inputs).unwrap();
        let size = grid.slot_size();
        for column in grid.resources() {
            let spans: Vec<_> = column.bookings.iter().map(|x| booking_span(date(), x, size)).collect();
            for (i, x) in spans.iter().enumerate() {
                for y in &spans[i + 1..] {
                    assert!(!x.overlaps(y), "seed {seed}: {x:?} overlaps {y:?}");
                }
            }
        }
    }
}

#[test]
fn double_booking_loses_nothing() {
    for n in 1..6 {
        let id = Ulid::new();
        let bookings: Vec<Booking> = (0..n).map(|_| Booking::new(id, at(10, 0), at(11, 0))).collect();
        let mut expected: Vec<Ulid> = bookings.iter().map(|b| b.id).collect();
        let grid =
            build_multi_resource_grid(date(), &GridConfig::default(), vec![ResourceBookings::new(id, bookings)])
                .unwrap();

        let columns = grid.columns_of(id);
        assert_eq!(columns.len(), n);
        let ten = grid.slot_of(at(10, 0)).unwrap();
        let mut seen: Vec<Ulid> = columns
            .iter()
            .map(|&c| grid.booking_at(c, ten).unwrap().id)
            .collect();
        for &c in &columns {
            assert_eq!(grid.resources()[c].bookings.len(), 1);
        }
        seen.sort();
        expected.sort();
        assert_eq!(seen, expected);
    }
}

#[test]
fn every_booking_is_visible_somewhere() {
    let id = Ulid::new();
    let bookings = busy_day(id, 40, 99);
    let grid = build_grid(date(), &GridConfig::default(), vec![ResourceBookings::new(id, bookings.clone())])
        .unwrap();
    for b in &bookings {
        let found = (0..grid.resources().len())
            .any(|c| (0..grid.slot_count()).any(|s| grid.booking_at(c, s).is_some_and(|x| x.id == b.id)));
        assert!(found, "booking {} hidden", b.id);
    }
}

#[test]
fn bookings_across_midnight_stay_visible_at_any_slot_size() {
    let tomorrow = |h, m| at(h, m) + chrono::Duration::days(1);
    let yesterday = |h, m| at(h, m) - chrono::Duration::days(1);
    for slot_size in [7, 15, 25, 45, 50, 70] {
        let id = Ulid::new();
        let bookings = vec![
            Booking::new(id, yesterday(23, 0), at(0, 20)),
            Booking::new(id, at(23, 50), tomorrow(1, 50)),
            Booking::new(id, tomorrow(3, 0), tomorrow(4, 0)),
        ];
        let mut input = ResourceBookings::new(id, bookings.clone());
        input.config = ResourceConfig::new(8 * 60, 18 * 60, slot_size);
        let other = Ulid::new();

        let one = build_grid(date(), &GridConfig::default(), vec![input.clone()]).unwrap();
        let two = build_grid(date(), &GridConfig::default(), vec![input, ResourceBookings::new(other, vec![])])
            .unwrap();
        for grid in [&one, &two] {
            let end = grid.end_minutes().unwrap();
            assert_eq!(end % slot_size, 0, "slot {slot_size}");
            for slot in 0..grid.slot_count() {
                assert!(grid.start_minutes_of_slot(slot).unwrap() + slot_size <= end);
            }
            for b in &bookings {
                let found = (0..grid.resources().len())
                    .any(|c| (0..grid.slot_count()).any(|s| grid.booking_at(c, s).is_some_and(|x| x.id == b.id)));
                assert!(found, "slot {slot_size} {} lost booking {}", grid.kind(), b.id);
            }
        }
    }
}

#[test]
fn windowing_twice_changes_nothing() {
    let id = Ulid::new();
    let grid = build_grid(date(), &GridConfig::default(), vec![ResourceBookings::new(id, busy_day(id, 15, 3))])
        .unwrap();
    for (a, b) in [(0, 24 * 60), (9 * 60, 12 * 60), (12 * 60 + 5, 13 * 60 + 55), (6 * 60, 8 * 60)] {
        let once = windowed(&grid, a, b);
        let twice = windowed(&once, a, b);
        assert_eq!(slot_starts(&twice), slot_starts(&once));
    }
}

#[test]
fn rounding_brackets_every_minute() {
    for slot_size in [1, 5, 10, 15, 20, 30, 60] {
        for minute in 0..24 * 60 {
            let t = time_at(date(), minute as Minutes);
            let m = minutes_since_midnight(t);
            let down = round_to_slot(t, slot_size, false);
            let up = round_to_slot(t, slot_size, true);
            assert!(down <= m && m <= up);
            if m % slot_size == 0 {
                assert_eq!(down, m);
                assert_eq!(up, m);
            }
        }
    }
}
