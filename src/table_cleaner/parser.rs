use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Formats tried for dates that spell out the month. Two-digit year
/// formats come first since `%Y` would also accept `24` as year 24.
const TEXTUAL_DATE_FORMATS: &[&str] = &[
    "%d %b %y",
    "%d %b %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d/%b/%y",
    "%d/%b/%Y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

fn non_amount_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\d.]").expect("static pattern"))
}

fn numeric_date() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/\-. ](\d{1,2})[/\-. ](\d{4}|\d{2})$").expect("static pattern")
    })
}

fn iso_date() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})$").expect("static pattern")
    })
}

/// Parse an amount cell the lenient way: commas and every character other
/// than digits and `.` are dropped before parsing.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let without_commas = raw.replace(',', "");
    let digits = non_amount_chars().replace_all(&without_commas, "");
    digits.parse::<f64>().ok()
}

/// Parse a statement date, reading ambiguous numeric dates day first
pub fn parse_statement_date(raw: &str) -> Option<NaiveDate> {
    parse_statement_date_with_year(raw, Local::now().year())
}

/// Same as [`parse_statement_date`] with an explicit reference year for
/// resolving two-digit years.
pub fn parse_statement_date_with_year(raw: &str, current_year: i32) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(caps) = iso_date().captures(value) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = numeric_date().captures(value) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year_text = &caps[3];
        let year: i32 = year_text.parse().ok()?;
        let year = if year_text.len() == 2 {
            expand_two_digit_year(year, current_year)
        } else {
            year
        };
        // day first, month first only when the day-first reading is impossible
        return NaiveDate::from_ymd_opt(year, second, first)
            .or_else(|| NaiveDate::from_ymd_opt(year, first, second));
    }

    TEXTUAL_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Place a two-digit year in the century that keeps it within 50 years
/// of `current_year`.
fn expand_two_digit_year(year: i32, current_year: i32) -> i32 {
    let century = current_year - current_year.rem_euclid(100);
    let candidate = century + year;
    if candidate >= current_year + 50 {
        candidate - 100
    } else if candidate < current_year - 50 {
        candidate + 100
    } else {
        candidate
    }
}

/// Replace every line break in a narration with a single space
pub fn clean_narration(raw: &str) -> String {
    raw.replace("\r\n", " ").replace('\n', " ")
}
