//! Day bucketing for the month-calendar grid.
//!
//! The schedule list anchors every item once, at its start date. The
//! calendar grid is different: a five-day vacation occupies five cells, so
//! items are expanded across every day they span, clipped to the requested
//! range.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::types::ScheduleItem;

/// Bucket items into per-day cells over the inclusive range
/// `[range_start, range_end]`.
///
/// Within one day, items keep their order from the input slice. An item
/// whose span misses the range entirely contributes nothing; an end date
/// earlier than the start date is treated as a single-day item.
pub fn bucket_by_day<'a>(
    items: &'a [ScheduleItem],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> BTreeMap<NaiveDate, Vec<&'a ScheduleItem>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&ScheduleItem>> = BTreeMap::new();

    for item in items {
        let span_end = item.end_date.map_or(item.date, |end| end.max(item.date));
        let mut day = item.date.max(range_start);
        let last = span_end.min(range_end);
        while day <= last {
            buckets.entry(day).or_default().push(item);
            day = day + Duration::days(1);
        }
    }

    buckets
}

/// First and last day of a calendar month, for bucketing a month grid.
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_month - Duration::days(1)))
}
