//! Text rendering of optimal slots and headlines.

use crate::constants::SLOT_TIME_FORMAT;
use crate::models::{HeadlineOutcome, OptimalSlot};
use chrono::{Local, TimeZone};
use std::fmt::{Display, Write};

/// Render slots with timestamps in the local time zone
pub fn format_slots(slots: &[OptimalSlot]) -> String {
    format_slots_in(slots, &Local)
}

/// Render slots with timestamps in an explicit time zone
pub fn format_slots_in<Tz>(slots: &[OptimalSlot], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if slots.is_empty() {
        return "No optimal times found based on your preferences.\n".to_string();
    }

    let mut out = String::from("Optimal Times to Go Outside and Suggested Activities:\n\n");
    for slot in slots {
        let entry = &slot.entry;
        let _ = writeln!(
            out,
            "{} - Temp: {:.1}°F, Humidity: {}%, Condition: {}",
            entry.timestamp.with_timezone(tz).format(SLOT_TIME_FORMAT),
            entry.temperature,
            entry.humidity,
            entry.condition
        );
        if slot.activities.is_empty() {
            out.push_str("No specific activities suggested for this time.\n");
        } else {
            out.push_str("Suggested Activities:\n");
            for activity in &slot.activities {
                let _ = writeln!(out, " - {}", activity);
            }
        }
        out.push('\n');
    }
    out
}

pub fn format_headlines(outcome: &HeadlineOutcome) -> String {
    match outcome {
        HeadlineOutcome::Available(headlines) if !headlines.is_empty() => {
            let mut out = String::new();
            for headline in headlines {
                let _ = write!(
                    out,
                    "Title: {}\nDescription: {}\n\n",
                    headline.title, headline.description
                );
            }
            out
        }
        _ => "No news available.\n".to_string(),
    }
}
