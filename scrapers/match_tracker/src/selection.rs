use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use std::cmp::Ordering;
use tracing::debug;

use crate::error::SelectionError;
use crate::timestamp::DISPLAY_TZ;
use crate::types::{MatchId, MatchRecord};

pub const MAX_SELECTIONS: usize = 10;
pub const SHARE_PARAM: &str = "matches";

const WINDOW_BEFORE_DAYS: i64 = 1;
const WINDOW_AFTER_DAYS: i64 = 4;

/// Matches with a known kickoff from a day ago up to four days ahead,
/// soonest first.
pub fn candidates(records: &[MatchRecord], now: DateTime<Tz>) -> Vec<&MatchRecord> {
    let earliest = now - Duration::days(WINDOW_BEFORE_DAYS);
    let latest = now + Duration::days(WINDOW_AFTER_DAYS);

    let mut picked: Vec<&MatchRecord> = records
        .iter()
        .filter(|r| matches!(r.kickoff, Some(k) if k >= earliest && k <= latest))
        .collect();
    picked.sort_by_key(|r| r.kickoff);
    picked
}

/// `"Home vs Away | Aug 31, 15:00 | Competition"`, or `TBD` for the time.
pub fn label(record: &MatchRecord) -> String {
    let when = record
        .kickoff
        .map(|k| k.with_timezone(&DISPLAY_TZ).format("%b %d, %H:%M").to_string())
        .unwrap_or_else(|| "TBD".to_string());
    format!("{} vs {} | {} | {}", record.home, record.away, when, record.competition)
}

/// Ids of the matches a user follows. Carried in a share link's query
/// string, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<MatchId>,
}

impl Selection {
    /// Keeps first occurrences in order. Empty or oversized selections are
    /// rejected.
    pub fn new(ids: impl IntoIterator<Item = MatchId>) -> Result<Self, SelectionError> {
        let mut unique: Vec<MatchId> = Vec::new();
        for id in ids {
            if !id.as_str().is_empty() && !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(SelectionError::Empty);
        }
        if unique.len() > MAX_SELECTIONS {
            return Err(SelectionError::TooMany {
                max: MAX_SELECTIONS,
                got: unique.len(),
            });
        }
        Ok(Self { ids: unique })
    }

    /// Parses a comma-separated list such as a CLI argument.
    pub fn from_list(raw: &str) -> Result<Self, SelectionError> {
        Self::new(raw.split(',').map(MatchId::from))
    }

    pub fn ids(&self) -> &[MatchId] {
        &self.ids
    }

    pub fn contains(&self, id: &MatchId) -> bool {
        self.ids.contains(id)
    }
}

pub fn share_link(base_url: &str, selection: &Selection) -> String {
    let joined = selection
        .ids()
        .iter()
        .map(MatchId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}?{}={}", base_url, SHARE_PARAM, urlencoding::encode(&joined))
}

/// Reads the selection back out of a shared link or bare query string.
/// Accepts both `%20` and form-style `+` for spaces.
pub fn parse_share_query(link: &str) -> Result<Selection, SelectionError> {
    let query = link.split_once('?').map_or(link, |(_, q)| q);
    let query = query.split('#').next().unwrap_or_default();

    let value = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SHARE_PARAM)
        .map(|(_, value)| value)
        .ok_or(SelectionError::Empty)?;

    let spaced = value.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map_err(|_| SelectionError::Empty)?;
    Selection::from_list(&decoded)
}

/// Tracked matches for display, grouped by competition.
#[derive(Debug, Default)]
pub struct Tracked<'a> {
    pub groups: Vec<(String, Vec<&'a MatchRecord>)>,
    /// Selected ids that matched nothing in the current batch.
    pub missing: Vec<MatchId>,
}

/// Looks each selected id up in the batch. Groups follow `competitions`
/// order; within a group matches are sorted by kickoff, unknown kickoffs
/// last. When two records share an id the first one wins.
pub fn tracked<'a>(records: &'a [MatchRecord], selection: &Selection, competitions: &[&str]) -> Tracked<'a> {
    let mut found: Vec<&MatchRecord> = Vec::new();
    let mut missing = Vec::new();

    for id in selection.ids() {
        match records.iter().find(|r| &r.id() == id) {
            Some(record) => found.push(record),
            None => {
                debug!(%id, "Selected match not in current batch");
                missing.push(id.clone());
            }
        }
    }

    let groups = competitions
        .iter()
        .filter_map(|competition| {
            let mut group: Vec<&MatchRecord> = found
                .iter()
                .copied()
                .filter(|r| r.competition == *competition)
                .collect();
            if group.is_empty() {
                return None;
            }
            group.sort_by(|a, b| kickoff_order(a, b));
            Some((competition.to_string(), group))
        })
        .collect();

    Tracked { groups, missing }
}

fn kickoff_order(a: &MatchRecord, b: &MatchRecord) -> Ordering {
    match (a.kickoff, b.kickoff) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
