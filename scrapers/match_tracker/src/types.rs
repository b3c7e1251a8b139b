use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::status::{self, Status};

/// Goals for one side of a card. `NotPlayed` is shown as `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goals {
    NotPlayed,
    Scored(u32),
}

impl Goals {
    pub fn is_scored(&self) -> bool {
        matches!(self, Goals::Scored(_))
    }
}

impl fmt::Display for Goals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goals::NotPlayed => f.write_str("-"),
            Goals::Scored(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Goals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Goals::NotPlayed => serializer.serialize_str("-"),
            Goals::Scored(n) => serializer.serialize_u32(*n),
        }
    }
}

/// Identifier used to correlate a saved selection with a freshly fetched record.
///
/// Built from the two team names only, so the same pairing in two
/// competitions (or twice in the tracked window) shares one id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(home: &str, away: &str) -> Self {
        Self(format!("{}-vs-{}", home, away))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatchId {
    fn from(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub competition: String,
    pub home: String,
    pub away: String,
    pub home_goals: Goals,
    pub away_goals: Goals,
    pub display_text: String,
    pub kickoff: Option<DateTime<Tz>>,
}

impl MatchRecord {
    pub fn id(&self) -> MatchId {
        MatchId::new(&self.home, &self.away)
    }

    pub fn status(&self) -> Status {
        status::classify(&self.display_text, self.home_goals, self.away_goals)
    }
}
