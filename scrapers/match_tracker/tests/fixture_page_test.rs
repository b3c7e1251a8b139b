use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use pretty_assertions::assert_eq;

use match_tracker::{
    assembler::{assemble, RawCard},
    classify,
    fixture_page::parse_page,
    parse, selection, Goals, MatchRecord, Status, DISPLAY_TZ,
};

const CHAMPIONSHIP_PAGE: &str = include_str!("fixtures/onefootball_championship.html");

fn uk(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
    DISPLAY_TZ.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn championship() -> Vec<MatchRecord> {
    parse_page(CHAMPIONSHIP_PAGE, "Championship", chrono_tz::Europe::London).unwrap()
}

#[test]
fn test_championship_page_records() {
    let records = championship();

    let summary: Vec<(&str, &str, Goals, Goals, Status)> = records
        .iter()
        .map(|r| (r.home.as_str(), r.away.as_str(), r.home_goals, r.away_goals, r.status()))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("Leeds United", "Hull City", Goals::Scored(2), Goals::Scored(1), Status::Live),
            ("Sheffield Wednesday", "Derby County", Goals::Scored(0), Goals::Scored(0), Status::Live),
            ("Stoke City", "Millwall", Goals::Scored(3), Goals::Scored(3), Status::Finished),
            ("Norwich City", "Middlesbrough", Goals::NotPlayed, Goals::NotPlayed, Status::Upcoming),
            ("Bristol City", "Watford", Goals::NotPlayed, Goals::NotPlayed, Status::Upcoming),
            ("Swansea City", "Coventry City", Goals::NotPlayed, Goals::NotPlayed, Status::Upcoming),
        ]
    );
}

#[test]
fn test_championship_page_kickoffs() {
    let kickoffs: Vec<Option<DateTime<Tz>>> = championship().iter().map(|r| r.kickoff).collect();

    assert_eq!(
        kickoffs,
        vec![
            None,
            None,
            None,
            // <time datetime> beats the visible text
            Some(uk(2025, 8, 31, 15, 0)),
            // visible text, read in the source timezone
            Some(uk(2025, 8, 31, 17, 30)),
            // data-timestamp on the cell beats "Tue 02/09 14:00"
            Some(uk(2025, 9, 2, 14, 0)),
        ]
    );
}

#[test]
fn test_display_text_is_kept_as_scraped() {
    let records = championship();
    assert_eq!(records[0].display_text, "78'");
    assert_eq!(records[1].display_text, "Half time");
    assert_eq!(records[4].display_text, "31/08/2025 17:30");
}

#[test]
fn test_source_timezone_only_moves_free_text() {
    let records = parse_page(CHAMPIONSHIP_PAGE, "Championship", chrono_tz::UTC).unwrap();
    assert_eq!(records[3].kickoff, Some(uk(2025, 8, 31, 15, 0)));
    assert_eq!(records[4].kickoff, Some(uk(2025, 8, 31, 18, 30)));
    assert_eq!(records[5].kickoff, Some(uk(2025, 9, 2, 14, 0)));
}

#[test]
fn test_parsing_twice_gives_identical_records() {
    assert_eq!(championship(), championship());
}

#[test]
fn test_ids_and_labels() {
    let records = championship();
    assert_eq!(records[3].id().as_str(), "Norwich City-vs-Middlesbrough");
    assert_eq!(
        selection::label(&records[3]),
        "Norwich City vs Middlesbrough | Aug 31, 15:00 | Championship"
    );
}

#[test]
fn test_documented_scenarios() {
    assert_eq!(classify("78'", Goals::Scored(2), Goals::Scored(1)), Status::Live);
    assert_eq!(parse("2025-08-31T15:00:00Z", chrono_tz::UTC), Some(uk(2025, 8, 31, 16, 0)));
    assert_eq!(
        parse("1735689600", chrono_tz::UTC).map(|dt| dt.to_rfc3339()),
        Some("2025-01-01T00:00:00+00:00".to_string())
    );
}

#[test]
fn test_assemble_from_live_card() {
    let raw = RawCard {
        competition: "Championship",
        home: "Leeds United",
        away: "Hull City",
        home_score: Some("2"),
        away_score: Some("1"),
        display_text: "78'",
        kickoff: parse("78'", chrono_tz::UTC),
    };
    let record = assemble(&raw).unwrap();
    assert_eq!(record.kickoff, None);
    assert_eq!(record.status(), Status::Live);
}

#[test]
fn test_export_page_to_csv_file() {
    let records = championship();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matches.csv");

    let file = std::fs::File::create(&path).unwrap();
    match_tracker::export::write_csv(&records, file).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 6);
    assert_eq!(&rows[2][1], "Stoke City-vs-Millwall");
    assert_eq!(&rows[2][6], "Finished");
    assert_eq!(&rows[3][8], "2025-08-31T15:00:00+01:00");
    assert_eq!(&rows[0][8], "");
}
