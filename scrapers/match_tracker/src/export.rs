use std::io::Write;

use crate::types::MatchRecord;

pub const HEADER: [&str; 9] = [
    "competition",
    "match_id",
    "home",
    "away",
    "home_goals",
    "away_goals",
    "status",
    "display_text",
    "kickoff",
];

/// Writes one CSV row per record in batch order. Kickoff is RFC 3339 in UK
/// time, empty when unknown.
pub fn write_csv<W: Write>(records: &[MatchRecord], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for record in records {
        let id = record.id();
        let home_goals = record.home_goals.to_string();
        let away_goals = record.away_goals.to_string();
        let kickoff = record.kickoff.map(|k| k.to_rfc3339()).unwrap_or_default();

        wtr.write_record([
            record.competition.as_str(),
            id.as_str(),
            record.home.as_str(),
            record.away.as_str(),
            home_goals.as_str(),
            away_goals.as_str(),
            record.status().label(),
            record.display_text.as_str(),
            kickoff.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
