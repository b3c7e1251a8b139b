use crate::selection::Tracked;
use crate::timestamp::DISPLAY_TZ;
use crate::types::MatchRecord;

/// One terminal line per match:
/// `Leeds  2 - 1  Hull  🟢 Live  78'`, with the UK kickoff appended when known.
pub fn card(record: &MatchRecord) -> String {
    let status = record.status();
    let mut line = format!(
        "{}  {} - {}  {}  {} {}",
        record.home,
        record.home_goals,
        record.away_goals,
        record.away,
        status.emoji(),
        status
    );
    if !record.display_text.is_empty() {
        line.push_str("  ");
        line.push_str(&record.display_text);
    }
    if let Some(kickoff) = record.kickoff {
        line.push_str(&format!(
            "  [{}]",
            kickoff.with_timezone(&DISPLAY_TZ).format("%a %d %b %H:%M %Z")
        ));
    }
    line
}

pub fn tracked(tracked: &Tracked<'_>) -> String {
    let mut out = String::new();
    for (competition, records) in &tracked.groups {
        out.push_str(&format!("🏆 {}\n", competition));
        for record in records {
            out.push_str("  ");
            out.push_str(&card(record));
            out.push('\n');
        }
    }
    for id in &tracked.missing {
        out.push_str(&format!("⚠️ Match not found: {}\n", id));
    }
    out
}
