use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use slotgrid::config::parse_time_of_day;
use slotgrid::grid::snapshot;
use slotgrid::{Grid, GridConfig, GridError, ResourceBookings, TimeRange, build_grid, windowed};

/// Input document: the day, the resources with their bookings, and an
/// optional part of the day to show.
#[derive(Debug, Deserialize)]
struct GridRequest {
    date: NaiveDate,
    #[serde(default)]
    resources: Vec<ResourceBookings>,
    #[serde(default)]
    window: Option<Window>,
    #[serde(default)]
    range: Option<String>,
}

/// `HH:MM` bounds (or minute counts) of the slots to show.
#[derive(Debug, Deserialize)]
struct Window {
    start: String,
    end: String,
}

impl GridRequest {
    fn bounds(&self) -> Result<Option<(i32, i32)>, GridError> {
        if let Some(w) = &self.window {
            let start = parse_time_of_day(&w.start)
                .ok_or_else(|| GridError::Config(format!("bad window start: {}", w.start)))?;
            let end = parse_time_of_day(&w.end)
                .ok_or_else(|| GridError::Config(format!("bad window end: {}", w.end)))?;
            return Ok(Some((start, end)));
        }
        match &self.range {
            Some(name) => {
                let range: TimeRange = name.parse()?;
                Ok(Some((range.start_minutes(), range.end_minutes())))
            }
            None => Ok(None),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = GridConfig::from_env();
    config.default_hours()?;

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let request: GridRequest = serde_json::from_str(&input)?;
    let bounds = request.bounds()?;

    let resource_count = request.resources.len();
    let grid = build_grid(request.date, &config, request.resources)?;
    info!(
        kind = grid.kind(),
        date = %grid.date(),
        resources = resource_count,
        columns = grid.resources().len(),
        slots = grid.slot_count(),
        "built grid"
    );

    let out = match bounds {
        Some((start, end)) => {
            let view = windowed(&grid, start, end);
            info!(start, end, slots = view.slot_count(), "windowed grid");
            snapshot(&view)
        }
        None => snapshot(&grid),
    };

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &out)?;
    println!();
    Ok(())
}
