//! Document information dictionary values.

use chrono::{DateTime, FixedOffset, NaiveDate};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub creator: String,
    pub creation_date: Option<DateTime<FixedOffset>>,
    pub modification_date: Option<DateTime<FixedOffset>>,
}

impl Metadata {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "No title specified"
        } else {
            &self.title
        }
    }

    pub fn display_author(&self) -> &str {
        if self.author.trim().is_empty() {
            "No Author specified"
        } else {
            &self.author
        }
    }
}

/// Parse a PDF date string such as `D:20230415103000+02'00'`.
///
/// Every field after the year is optional. A missing time zone is read as UTC.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let text = raw.trim();
    let text = text.strip_prefix("D:").unwrap_or(text);

    let digits_end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(text.len(), |(i, _)| i);
    let (digits, zone) = text.split_at(digits_end);
    if digits.len() < 4 {
        return None;
    }

    let field = |start: usize, len: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + len) {
            Some(part) => part.parse().ok(),
            None if digits.len() <= start => Some(default),
            None => None,
        }
    };

    let year: i32 = digits[0..4].parse().ok()?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;

    let offset = parse_zone(zone)?;
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, second)?
        .and_local_timezone(offset)
        .single()
}

fn parse_zone(zone: &str) -> Option<FixedOffset> {
    let utc = FixedOffset::east_opt(0);
    let mut chars = zone.chars();
    let sign = match chars.next() {
        None | Some('Z') => return utc,
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let numbers: Vec<u32> = chars
        .as_str()
        .split('\'')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().ok())
        .collect::<Option<_>>()?;
    let hours = numbers.first().copied().unwrap_or(0);
    let minutes = numbers.get(1).copied().unwrap_or(0);
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
}
