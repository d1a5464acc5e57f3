//! HTML rendering of the result table

use std::fmt::Write;

use crate::storage::{CheckStatus, StatusRecord};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; }
th, td { padding: 0.3em 0.8em; border-bottom: 1px solid #ddd; text-align: left; }
td.ok { color: #1b7f3b; font-weight: bold; }
td.critical { color: #b3261e; font-weight: bold; }";

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn status_class(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Ok => "ok",
        CheckStatus::Critical => "critical",
    }
}

/// Full page listing `records` in the order given
pub fn render_results(records: &[StatusRecord]) -> String {
    let mut rows = String::new();
    for record in records {
        // writing into a String cannot fail
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>",
            record.id,
            escape_html(&record.hostname),
            escape_html(&record.checkname),
            status_class(record.status),
            record.status,
            record.formatted_timestamp(),
        );
    }

    if records.is_empty() {
        rows.push_str("<tr><td colspan=\"5\">No results recorded yet.</td></tr>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Monitoring</title>\n\
         <style>\n{STYLE}\n</style>\n</head>\n<body>\n<h1>Monitoring</h1>\n<table>\n\
         <tr><th>ID</th><th>Host</th><th>Check</th><th>Status</th><th>Time</th></tr>\n\
         {rows}</table>\n</body>\n</html>\n"
    )
}
