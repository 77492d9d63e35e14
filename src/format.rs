//! Text formatting for counters, dates and pagination

use chrono::{DateTime, Utc};

use crate::client::error::SEARCH_RESULT_WINDOW;

/// Compact counter, `1234` -> `1.2k`; halves round up, `1250` -> `1.3k`
pub fn format_number(n: u64) -> String {
    if n >= 1000 {
        let thousands = (n as f64 / 100.0).round() / 10.0;
        format!("{thousands:.1}k")
    } else {
        n.to_string()
    }
}

/// Long-form date, e.g. `25 January 2011`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%-d %B %Y").to_string()
}

pub fn format_optional_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(format_date).unwrap_or_else(|| "unknown".to_string())
}

/// Pages a search can actually reach, given the provider's result window
pub fn total_pages(total_count: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let reachable = total_count.min(u64::from(SEARCH_RESULT_WINDOW));
    reachable.div_ceil(u64::from(per_page)) as u32
}
