use colored::Colorize;

/// Format a points amount with color
pub fn format_points(points: u32) -> String {
    format!("{} pts", points).yellow().to_string()
}

/// Truncate text to a table column, keeping the start
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format timestamp in human-readable format
pub fn format_timestamp(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format the calendar day of a timestamp
pub fn format_date(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` day as midnight UTC
pub fn parse_date(input: &str) -> crate::Result<chrono::DateTime<chrono::Utc>> {
    let day = chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| crate::PileError::Validation(format!("invalid date '{}': {}", input, e)))?;
    Ok(day.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Print a formatted table border
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Width of text as shown in a terminal, ignoring ANSI color sequences
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // CSI sequence: ESC [ params final-byte
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

/// Lay out a table row, padding each cell to its column width
pub fn format_table_row(columns: &[&str], widths: &[usize]) -> String {
    let mut row = String::new();
    for (col, width) in columns.iter().zip(widths) {
        row.push_str(col);
        row.push_str(&" ".repeat(width.saturating_sub(visible_width(col)) + 2));
    }
    row.trim_end().to_string()
}

/// Print a table row with columns
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    println!("{}", format_table_row(columns, widths));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Mairie", 10), "Mairie");
        assert_eq!(truncate("École Primaire Jean Moulin", 10), "École P...");
    }

    #[test]
    fn test_visible_width_ignores_color() {
        assert_eq!(visible_width("Recycled"), 8);
        assert_eq!(visible_width("\x1b[32mRecycled\x1b[0m"), 8);
        assert_eq!(visible_width("\x1b[2mLocked\x1b[0m"), 6);
        assert_eq!(visible_width("École"), 5);
    }

    #[test]
    fn test_colored_cells_keep_columns_aligned() {
        let widths = [10, 4];
        let plain = format_table_row(&["Active", "1"], &widths);
        let colored = format_table_row(&["\x1b[32mRecycled\x1b[0m", "1"], &widths);

        assert_eq!(plain, "Active      1");
        assert_eq!(visible_width(&colored), plain.len());
        assert!(colored.ends_with("\x1b[0m    1"));
    }

    #[test]
    fn test_parse_date() {
        let parsed = parse_date("2025-01-15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(format_date(&parsed), "2025-01-15");
        assert!(parse_date("15/01/2025").is_err());
    }
}
