use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::assembler::{self, RawCard};
use crate::error::ScrapeError;
use crate::markup::MarkupNode;
use crate::resolver;
use crate::types::MatchRecord;

/// CSS selectors for the pieces of a fixtures page. Class names carry a
/// build hash suffix, so the defaults match on the stable prefix only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSelectors {
    pub time_cell: String,
    pub team_name: String,
    pub team_score: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            time_cell: r#"[class*="SimpleMatchCard_simpleMatchCard__matchContent"]"#.to_string(),
            team_name: r#"[class*="SimpleMatchCardTeam_simpleMatchCardTeam__name"]"#.to_string(),
            team_score: r#"[class*="SimpleMatchCardTeam_simpleMatchCardTeam__score"]"#.to_string(),
        }
    }
}

pub struct FixturePageParser {
    time_cell: Selector,
    team_name: Selector,
    team_score: Selector,
    source_tz: Tz,
}

impl FixturePageParser {
    pub fn new(source_tz: Tz) -> Result<Self, ScrapeError> {
        Self::with_selectors(&CardSelectors::default(), source_tz)
    }

    pub fn with_selectors(selectors: &CardSelectors, source_tz: Tz) -> Result<Self, ScrapeError> {
        Ok(Self {
            time_cell: compile(&selectors.time_cell)?,
            team_name: compile(&selectors.team_name)?,
            team_score: compile(&selectors.team_score)?,
            source_tz,
        })
    }

    /// Reads every match card on one competition's page, in page order.
    ///
    /// Team names come in home/away pairs and line up with the time cells.
    /// A page whose counts disagree has changed layout and is rejected as a
    /// whole; a single card with a blank team name is skipped.
    pub fn parse(&self, html: &str, competition: &str) -> Result<Vec<MatchRecord>, ScrapeError> {
        let document = Html::parse_document(html);

        let cells: Vec<ElementRef> = document.select(&self.time_cell).collect();
        if cells.is_empty() {
            return Err(ScrapeError::NoMatchCards);
        }

        let names: Vec<String> = document
            .select(&self.team_name)
            .map(|el| el.visible_text())
            .collect();
        if names.len() % 2 != 0 {
            return Err(ScrapeError::LayoutMismatch(format!(
                "odd number of team names ({})",
                names.len()
            )));
        }
        if names.len() / 2 != cells.len() {
            return Err(ScrapeError::LayoutMismatch(format!(
                "{} team pairs for {} match cards",
                names.len() / 2,
                cells.len()
            )));
        }

        let scores: Vec<String> = document
            .select(&self.team_score)
            .map(|el| el.visible_text())
            .collect();
        if !scores.is_empty() && scores.len() != names.len() {
            return Err(ScrapeError::LayoutMismatch(format!(
                "{} scores for {} teams",
                scores.len(),
                names.len()
            )));
        }

        let mut records = Vec::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            let display_text = cell.visible_text();
            let kickoff = resolver::resolve(cell, self.source_tz);
            let raw = RawCard {
                competition,
                home: &names[2 * i],
                away: &names[2 * i + 1],
                home_score: scores.get(2 * i).map(String::as_str),
                away_score: scores.get(2 * i + 1).map(String::as_str),
                display_text: &display_text,
                kickoff,
            };

            match assembler::assemble(&raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!(competition, card = i, "Skipping match card: {}", e),
            }
        }

        debug!(competition, count = records.len(), "Parsed fixtures page");
        Ok(records)
    }
}

fn compile(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Convenience wrapper using the default selectors.
pub fn parse_page(html: &str, competition: &str, source_tz: Tz) -> Result<Vec<MatchRecord>, ScrapeError> {
    FixturePageParser::new(source_tz)?.parse(html, competition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Goals;
    use chrono_tz::UTC;
    use pretty_assertions::assert_eq;

    fn card(time: &str, home: &str, away: &str, hs: &str, aws: &str) -> String {
        format!(
            r#"<a class="SimpleMatchCard_simpleMatchCard__abc">
                <div class="SimpleMatchCardTeam_simpleMatchCardTeam__x1">
                  <span class="SimpleMatchCardTeam_simpleMatchCardTeam__name__7Ud8D">{home}</span>
                  <span class="SimpleMatchCardTeam_simpleMatchCardTeam__score__UYMc_">{hs}</span>
                </div>
                <div class="SimpleMatchCardTeam_simpleMatchCardTeam__x1">
                  <span class="SimpleMatchCardTeam_simpleMatchCardTeam__name__7Ud8D">{away}</span>
                  <span class="SimpleMatchCardTeam_simpleMatchCardTeam__score__UYMc_">{aws}</span>
                </div>
                <div class="SimpleMatchCard_simpleMatchCard__matchContent__prwTf">{time}</div>
              </a>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><main>{}</main></body></html>", cards.concat())
    }

    #[test]
    fn test_parses_cards_in_order() {
        let html = page(&[
            card("<span>78'</span>", "Leeds", "Hull", "2", "1"),
            card("<span>FT</span>", "Derby", "Stoke", "0", "0"),
            card("<time datetime=\"2025-08-31T14:00:00Z\">31/08/2025</time><span>15:00</span>", "Millwall", "Luton", "", ""),
        ]);
        let records = parse_page(&html, "Championship", UTC).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].home, "Leeds");
        assert_eq!(records[0].display_text, "78'");
        assert_eq!(records[0].kickoff, None);
        assert_eq!(records[1].home_goals, Goals::Scored(0));
        assert_eq!(records[2].away, "Luton");
        assert_eq!(records[2].home_goals, Goals::NotPlayed);
        assert_eq!(records[2].display_text, "31/08/2025 15:00");
        assert_eq!(
            records[2].kickoff.map(|k| k.to_rfc3339()),
            Some("2025-08-31T15:00:00+01:00".to_string())
        );
        assert!(records.iter().all(|r| r.competition == "Championship"));
    }

    #[test]
    fn test_blank_team_skips_only_that_card() {
        let html = page(&[
            card("FT", "  ", "Hull", "1", "1"),
            card("FT", "Derby", "Stoke", "3", "2"),
        ]);
        let records = parse_page(&html, "Championship", UTC).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].home, "Derby");
    }

    #[test]
    fn test_no_cards_is_an_error() {
        let result = parse_page("<html><body><p>Consent required</p></body></html>", "League 1", UTC);
        assert_eq!(result, Err(ScrapeError::NoMatchCards));
    }

    #[test]
    fn test_layout_mismatch() {
        let mut html = page(&[card("FT", "Derby", "Stoke", "3", "2")]);
        html = html.replace(
            "</main>",
            r#"<div class="SimpleMatchCard_simpleMatchCard__matchContent__prwTf">FT</div></main>"#,
        );
        assert!(matches!(
            parse_page(&html, "League 2", UTC),
            Err(ScrapeError::LayoutMismatch(_))
        ));
    }

    #[test]
    fn test_custom_selectors() {
        let selectors = CardSelectors {
            time_cell: ".when".to_string(),
            team_name: ".team".to_string(),
            team_score: ".goals".to_string(),
        };
        let parser = FixturePageParser::with_selectors(&selectors, UTC).unwrap();
        let html = r#"<div><b class="team">A</b><b class="team">B</b><i class="when" data-time="1735689600"></i></div>"#;
        let records = parser.parse(html, "Friendly").unwrap();
        assert_eq!(records[0].id().as_str(), "A-vs-B");
        assert!(records[0].kickoff.is_some());
    }

    #[test]
    fn test_bad_selector() {
        let selectors = CardSelectors {
            time_cell: "[[".to_string(),
            ..CardSelectors::default()
        };
        assert!(matches!(
            FixturePageParser::with_selectors(&selectors, UTC),
            Err(ScrapeError::Selector { .. })
        ));
    }
}
