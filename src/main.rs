// Timeline layout tool
// Lays out one day of events and prints the tile geometry as JSON

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;

use timeline_engine::models::event::CalendarEvent;
use timeline_engine::models::settings::TimelineSettings;
use timeline_engine::services::settings::SettingsService;
use timeline_engine::timeline::{layout_day, EventGeometry, VisibleTimeRange};

/// Lay out a day of calendar events on the timeline.
#[derive(Parser, Debug)]
#[command(name = "timeline-layout")]
#[command(about = "Compute day-view geometry for a set of calendar events")]
struct Args {
    /// JSON file holding an array of events
    events: PathBuf,

    /// Day to lay out (YYYY-MM-DD)
    day: NaiveDate,

    /// Settings file; defaults to the per-user timeline.toml
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Fit the visible hours into this many pixels
    #[arg(long)]
    height: Option<f64>,
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    day: NaiveDate,
    total_height: f64,
    pixels_per_hour: f64,
    all_day: Vec<&'a CalendarEvent>,
    timed: Vec<&'a EventGeometry>,
}

fn load_settings(path: Option<&Path>) -> Result<TimelineSettings> {
    match path {
        Some(path) => SettingsService::new(path).load(),
        None => match SettingsService::for_user() {
            Some(service) => service.load(),
            None => Ok(TimelineSettings::default()),
        },
    }
}

fn load_events(path: &Path) -> Result<Vec<CalendarEvent>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read events from {}", path.display()))?;
    let events: Vec<CalendarEvent> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse events in {}", path.display()))?;
    for event in &events {
        event
            .validate()
            .map_err(|e| anyhow!("Invalid event {}: {}", event.id, e))?;
    }
    Ok(events)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = load_settings(args.settings.as_deref())?;
    let events = load_events(&args.events)?;

    let mut range = VisibleTimeRange::from_settings(&settings.time_range)?;
    if let Some(height) = args.height {
        range = range.fit_to_height(height)?;
    }

    let layout = layout_day(&events, args.day, &range);
    log::info!(
        "laid out {} timed and {} all-day events for {}",
        layout.timed.len(),
        layout.all_day.len(),
        args.day
    );

    let report = LayoutReport {
        day: layout.day,
        total_height: range.total_height(),
        pixels_per_hour: range.pixels_per_hour(),
        all_day: layout.all_day.clone(),
        timed: layout.timed.iter().map(|placed| &placed.geometry).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
