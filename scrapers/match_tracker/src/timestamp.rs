use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Every instant handed to callers is expressed in this zone.
pub const DISPLAY_TZ: Tz = chrono_tz::Europe::London;

static LIVE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)['’]|half[\s-]?time|\bFT\b|\blive\b").unwrap());

static ISO_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2})(?::(\d{2})(?:[.,](\d{1,9}))?)?(Z|[+-]\d{2}(?::?\d{2})?)?",
    )
    .unwrap()
});

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static YEAR_FIRST_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\D)(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})").unwrap());

static DAY_FIRST_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\D)(\d{1,2})[/.-](\d{1,2})[/.-](?:(\d{4})|(\d{2})(?:\D|$))").unwrap());

const MONTH_NAMES: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static DAY_MONTH_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?:^|\D)(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({})\.?,?\s+(\d{{4}})",
        MONTH_NAMES
    ))
    .unwrap()
});

static MONTH_DAY_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})",
        MONTH_NAMES
    ))
    .unwrap()
});

static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})[:.](\d{2})(?::(\d{2}))?(?:\s*([ap])\.?m\.?\b)?").unwrap()
});

static ZONE_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:UTC|GMT)\s*([+-])(\d{1,2})(?::?(\d{2}))?\b|(?:^|\s)([+-])(\d{2}):?(\d{2})\b")
        .unwrap()
});

static ZONE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(UTC|GMT|BST|CEST|CET)\b").unwrap());

/// Normalize one raw candidate into a UK-time instant.
///
/// Cards carry their kickoff as ISO-8601 attributes, epoch numbers, or free
/// text such as `31/08/202515:00`; live and finished cards show a clock or
/// a marker instead, which yields `None`.
///
/// Checks run from least to most ambiguous: live markers short-circuit,
/// then ISO-8601, then a 10–13 digit epoch, then day-first free text. Free
/// text without a zone is read as wall-clock time in `source_tz`.
pub fn parse(raw: &str, source_tz: Tz) -> Option<DateTime<Tz>> {
    parse_utc(raw, source_tz).map(|dt| dt.with_timezone(&DISPLAY_TZ))
}

/// Same as [`parse`] but returns the instant in UTC.
pub fn parse_utc(raw: &str, source_tz: Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() || is_live_marker(raw) {
        return None;
    }

    parse_iso(raw)
        .or_else(|| parse_epoch(raw))
        .or_else(|| parse_free_text(raw, source_tz))
}

/// True when the text shows a running clock or a final-state marker
/// (`45'`, `Half time`, `FT`, `Live`) rather than a kickoff time.
pub fn is_live_marker(raw: &str) -> bool {
    LIVE_MARKER.is_match(raw)
}

fn parse_iso(raw: &str) -> Option<DateTime<Utc>> {
    let caps = ISO_DATETIME.captures(raw)?;
    let date = NaiveDate::from_ymd_opt(num(&caps, 1)?, num(&caps, 2)?, num(&caps, 3)?)?;
    let nanos = caps
        .get(7)
        .map(|m| format!("{:0<9}", m.as_str()).parse::<u32>())
        .transpose()
        .ok()?
        .unwrap_or(0);
    let time = NaiveTime::from_hms_nano_opt(
        num(&caps, 4)?,
        num(&caps, 5)?,
        caps.get(6).map_or(Some(0), |_| num(&caps, 6))?,
        nanos,
    )?;
    let naive = date.and_time(time);

    let offset = match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") => FixedOffset::east_opt(0)?,
        Some(offset) => parse_numeric_offset(offset)?,
    };
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_numeric_offset(raw: &str) -> Option<FixedOffset> {
    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let run = DIGIT_RUN
        .find_iter(raw)
        .map(|m| m.as_str())
        .find(|run| (10..=13).contains(&run.len()))?;
    let value: i64 = run.parse().ok()?;
    let seconds = if run.len() == 13 { value / 1000 } else { value };
    DateTime::from_timestamp(seconds, 0)
}

fn parse_free_text(raw: &str, source_tz: Tz) -> Option<DateTime<Utc>> {
    let (date, rest) = find_date(raw)?;
    // A clock that is present but invalid sinks the whole parse.
    let (time, rest) = if CLOCK_TIME.is_match(&rest) {
        find_time(&rest)?
    } else {
        (NaiveTime::from_hms_opt(0, 0, 0)?, rest)
    };
    let naive = date.and_time(time);

    match find_zone(&rest) {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        None => localize(&naive, source_tz),
    }
}

/// Wall-clock time in `tz`. A time that falls in a DST gap does not exist
/// and yields `None`; an ambiguous one resolves to the earlier instant.
fn localize(naive: &NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Finds the first recognizable date and returns it with the text that is
/// left once the date is cut out.
fn find_date(raw: &str) -> Option<(NaiveDate, String)> {
    if let Some(caps) = YEAR_FIRST_DATE.captures(raw) {
        if let Some(date) = NaiveDate::from_ymd_opt(num(&caps, 1)?, num(&caps, 2)?, num(&caps, 3)?) {
            return Some((date, cut(raw, &caps)));
        }
    }
    if let Some(caps) = DAY_FIRST_DATE.captures(raw) {
        // A four-digit year may run straight into the time; a two-digit one may not.
        let year = match caps.get(3) {
            Some(_) => num(&caps, 3)?,
            None => expand_year(num(&caps, 4)?),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, num(&caps, 2)?, num(&caps, 1)?) {
            return Some((date, cut(raw, &caps)));
        }
    }
    if let Some(caps) = DAY_MONTH_TEXT.captures(raw) {
        let month = month_number(caps.get(2)?.as_str())?;
        if let Some(date) = NaiveDate::from_ymd_opt(num(&caps, 3)?, month, num(&caps, 1)?) {
            return Some((date, cut(raw, &caps)));
        }
    }
    if let Some(caps) = MONTH_DAY_TEXT.captures(raw) {
        let month = month_number(caps.get(1)?.as_str())?;
        if let Some(date) = NaiveDate::from_ymd_opt(num(&caps, 3)?, month, num(&caps, 2)?) {
            return Some((date, cut(raw, &caps)));
        }
    }
    None
}

fn find_time(rest: &str) -> Option<(NaiveTime, String)> {
    let caps = CLOCK_TIME.captures(rest)?;
    let mut hour: u32 = num(&caps, 1)?;
    let minute: u32 = num(&caps, 2)?;
    let second: u32 = caps.get(3).map_or(Some(0), |_| num(&caps, 3))?;

    if let Some(meridiem) = caps.get(4) {
        if hour == 0 || hour > 12 {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("p");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some((time, cut(rest, &caps)))
}

fn find_zone(rest: &str) -> Option<FixedOffset> {
    if let Some(caps) = ZONE_OFFSET.captures(rest) {
        // Named prefix (`GMT+2`) fills groups 1-3, a bare `+01:00` fills 4-6.
        let base = if caps.get(1).is_some() { 1 } else { 4 };
        let sign = if &caps[base] == "-" { -1 } else { 1 };
        let hours: i32 = num(&caps, base + 1)?;
        let minutes: i32 = caps.get(base + 2).map_or(Some(0), |_| num(&caps, base + 2))?;
        if hours <= 14 && minutes <= 59 {
            return FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60));
        }
    }
    let name = ZONE_NAME.captures(rest)?;
    let hours = match name[1].to_ascii_uppercase().as_str() {
        "UTC" | "GMT" => 0,
        "BST" | "CET" => 1,
        "CEST" => 2,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

fn cut(raw: &str, caps: &Captures<'_>) -> String {
    // Group 0 may include one leading boundary character; only drop the
    // span from the first capture group onward.
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let start = caps
        .iter()
        .skip(1)
        .flatten()
        .map(|m| m.start())
        .min()
        .unwrap_or(whole.start);
    format!("{} {}", &raw[..start], &raw[whole.end..])
}

fn num<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn expand_year(year: i32) -> i32 {
    2000 + year
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)?.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
