//! Date-range reports and their CSV export.

use crate::{models::event::ScheduleEvent, week::parse_date_key};

pub const REPORT_FILE_NAME: &str = "Bao_cao_lich_cong_tac.csv";

const CSV_HEADERS: [&str; 6] = ["Ngày", "Thời gian", "Nội dung công tác", "Địa điểm", "Phân loại", "Ghi chú"];
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Events dated within `[from_key, to_key]`, ordered by date then start time.
///
/// An inverted range selects nothing.
pub fn build_report(events: &[ScheduleEvent], from_key: &str, to_key: &str) -> Vec<ScheduleEvent> {
    if from_key > to_key {
        return Vec::new();
    }

    let mut selected: Vec<ScheduleEvent> = events
        .iter()
        .filter(|event| {
            let key = event.date_key();
            key >= from_key && key <= to_key
        })
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        a.date_key()
            .cmp(b.date_key())
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    selected
}

/// Renders report rows as spreadsheet-friendly CSV with a UTF-8 byte order mark.
pub fn export_csv(events: &[ScheduleEvent]) -> String {
    let mut out = String::new();
    out.push(BYTE_ORDER_MARK);
    out.push_str(&CSV_HEADERS.join(","));

    for event in events {
        let row = [
            display_date(event.date_key()),
            event.time_label(),
            quote(&event.title),
            quote(&event.location),
            event.category.label().to_string(),
            quote(event.description.as_deref().unwrap_or_default()),
        ];
        out.push('\n');
        out.push_str(&row.join(","));
    }
    out
}

fn display_date(key: &str) -> String {
    parse_date_key(key)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| key.to_string())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
