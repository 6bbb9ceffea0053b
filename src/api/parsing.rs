use chrono::{Local, NaiveDateTime, TimeDelta, TimeZone};
use serde_json::Value;

use crate::utils::timestamp::DisplayZone;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn v_array<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    v_path(root, path).and_then(|v| v.as_array())
}

fn local_to_epoch<Z: TimeZone>(naive: &NaiveDateTime, zone: &Z) -> Option<i64> {
    zone.from_local_datetime(naive)
        .earliest()
        // Wall-clock time skipped by a DST jump: read it with the pre-jump offset.
        .or_else(|| {
            zone.from_local_datetime(&(*naive + TimeDelta::hours(1)))
                .earliest()
        })
        .map(|dt| dt.timestamp())
}

/// Combines a `YYYY-MM-DD` date and an `HH:MM` time, read as wall-clock time
/// in `zone`, into whole epoch seconds.
///
/// Returns `None` when either part is missing or the combination doesn't
/// parse.
#[must_use]
pub fn parse_schedule_time(
    date: Option<&str>,
    time: Option<&str>,
    zone: DisplayZone,
) -> Option<i64> {
    let combined = format!("{}T{}:00", date?, time?);
    let naive = NaiveDateTime::parse_from_str(&combined, "%Y-%m-%dT%H:%M:%S").ok()?;

    match zone {
        DisplayZone::Local => local_to_epoch(&naive, &Local),
        DisplayZone::Named(tz) => local_to_epoch(&naive, &tz),
    }
}
