use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// `2025-03-05` -> `"Mar 05, 2025"`
pub fn format_date(date: Date) -> String {
    date.strftime("%b %d, %Y").to_string()
}

/// Render a timestamp in the named IANA zone, falling back to UTC when the
/// zone is unknown.
pub fn format_timestamp(timestamp: Timestamp, tz_name: &str) -> String {
    let tz = TimeZone::get(tz_name).unwrap_or(TimeZone::UTC);
    timestamp
        .to_zoned(tz)
        .strftime("%b %d, %Y at %I:%M %p %Z")
        .to_string()
}

/// Join the non-empty class fragments with single spaces.
pub fn class_names<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    classes
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First letter of a name, upper-cased, for avatars.
pub fn initials(name: &str) -> String {
    name.chars()
        .find(|c| c.is_alphanumeric())
        .unwrap_or('?')
        .to_uppercase()
        .to_string()
}
