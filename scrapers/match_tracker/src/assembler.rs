use chrono::DateTime;
use chrono_tz::Tz;
use tracing::debug;

use crate::error::RecordError;
use crate::types::{Goals, MatchRecord};

/// One card's fields as scraped, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCard<'a> {
    pub competition: &'a str,
    pub home: &'a str,
    pub away: &'a str,
    pub home_score: Option<&'a str>,
    pub away_score: Option<&'a str>,
    pub display_text: &'a str,
    pub kickoff: Option<DateTime<Tz>>,
}

/// Builds a [`MatchRecord`] from scraped fields.
///
/// Fails only when a team name is blank; callers drop that card and keep
/// going. Scores that cannot be read become [`Goals::NotPlayed`], and a card
/// with only one readable side is treated as not played at all.
pub fn assemble(raw: &RawCard<'_>) -> Result<MatchRecord, RecordError> {
    let home = team_name(raw.home, "home")?;
    let away = team_name(raw.away, "away")?;

    let (home_goals, away_goals) = match (parse_goals(raw.home_score), parse_goals(raw.away_score)) {
        (h @ Goals::Scored(_), a @ Goals::Scored(_)) => (h, a),
        (Goals::NotPlayed, Goals::NotPlayed) => (Goals::NotPlayed, Goals::NotPlayed),
        (h, a) => {
            debug!(%home, %away, ?h, ?a, "one-sided score, treating as not played");
            (Goals::NotPlayed, Goals::NotPlayed)
        }
    };

    Ok(MatchRecord {
        competition: raw.competition.trim().to_string(),
        home,
        away,
        home_goals,
        away_goals,
        display_text: raw.display_text.trim().to_string(),
        kickoff: raw.kickoff,
    })
}

fn team_name(raw: &str, side: &'static str) -> Result<String, RecordError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RecordError::MissingTeam { side });
    }
    Ok(name.to_string())
}

/// First whitespace-delimited token as a goal count.
pub fn parse_goals(raw: Option<&str>) -> Goals {
    raw.and_then(|s| s.split_whitespace().next())
        .and_then(|token| token.parse::<u32>().ok())
        .map_or(Goals::NotPlayed, Goals::Scored)
}
