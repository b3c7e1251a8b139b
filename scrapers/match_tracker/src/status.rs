use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::types::Goals;

static IN_PLAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)['’]|half[\s-]?time").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Live,
    Finished,
    Upcoming,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Live => "Live",
            Status::Finished => "Finished",
            Status::Upcoming => "Upcoming",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Status::Live => "🟢",
            Status::Finished => "🔵",
            Status::Upcoming => "⚪",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derives a card's status. The in-play check runs before the score check
/// because a live match already shows goals.
pub fn classify(display_text: &str, home_goals: Goals, away_goals: Goals) -> Status {
    if IN_PLAY.is_match(display_text) {
        Status::Live
    } else if home_goals.is_scored() && away_goals.is_scored() {
        Status::Finished
    } else {
        Status::Upcoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_marker_is_live_even_with_score() {
        assert_eq!(classify("78'", Goals::Scored(2), Goals::Scored(1)), Status::Live);
    }

    #[test]
    fn test_half_time_is_live() {
        assert_eq!(classify("Half time", Goals::Scored(0), Goals::Scored(0)), Status::Live);
        assert_eq!(classify("Half time", Goals::NotPlayed, Goals::NotPlayed), Status::Live);
    }

    #[test]
    fn test_scored_without_marker_is_finished() {
        assert_eq!(classify("FT", Goals::Scored(3), Goals::Scored(3)), Status::Finished);
    }

    #[test]
    fn test_no_score_is_upcoming() {
        assert_eq!(classify("31/08/2025 15:00", Goals::NotPlayed, Goals::NotPlayed), Status::Upcoming);
        assert_eq!(classify("", Goals::Scored(1), Goals::NotPlayed), Status::Upcoming);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Status::Finished.to_string(), "Finished");
        assert_eq!(Status::Live.emoji(), "🟢");
    }
}
