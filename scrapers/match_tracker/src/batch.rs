use chrono_tz::Tz;
use std::fmt;
use tracing::{info, warn};

use crate::config::Source;
use crate::error::{BatchError, SourceError};
use crate::fetcher::HtmlFetcher;
use crate::fixture_page::{CardSelectors, FixturePageParser};
use crate::types::MatchRecord;

/// A source that contributed nothing to the batch, and why.
#[derive(Debug)]
pub struct SourceFailure {
    pub competition: String,
    pub error: SourceError,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.competition, self.error)
    }
}

/// Everything one fetch cycle produced. Replaced wholesale on the next cycle.
#[derive(Debug, Default)]
pub struct Batch {
    pub records: Vec<MatchRecord>,
    pub failures: Vec<SourceFailure>,
}

impl Batch {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Fetches and parses every source in order with the default card selectors.
pub fn fetch_batch<F: HtmlFetcher>(fetcher: &F, sources: &[Source], source_tz: Tz) -> Result<Batch, BatchError> {
    fetch_batch_with_selectors(fetcher, &CardSelectors::default(), sources, source_tz)
}

/// Selectors that fail to compile fail every source.
pub fn fetch_batch_with_selectors<F: HtmlFetcher>(
    fetcher: &F,
    selectors: &CardSelectors,
    sources: &[Source],
    source_tz: Tz,
) -> Result<Batch, BatchError> {
    if sources.is_empty() {
        return Err(BatchError::NoSources);
    }
    match FixturePageParser::with_selectors(selectors, source_tz) {
        Ok(parser) => fetch_batch_with(fetcher, &parser, sources),
        Err(e) => {
            let failures = sources
                .iter()
                .map(|s| SourceFailure {
                    competition: s.competition.clone(),
                    error: e.clone().into(),
                })
                .collect();
            Err(BatchError::AllSourcesFailed(failures))
        }
    }
}

/// One source failing leaves its slot empty and is recorded; the batch only
/// fails when no source succeeded.
pub fn fetch_batch_with<F: HtmlFetcher>(
    fetcher: &F,
    parser: &FixturePageParser,
    sources: &[Source],
) -> Result<Batch, BatchError> {
    if sources.is_empty() {
        return Err(BatchError::NoSources);
    }

    let mut batch = Batch::default();
    for source in sources {
        match fetch_source(fetcher, parser, source) {
            Ok(records) => {
                info!("{}: {} matches", source.competition, records.len());
                batch.records.extend(records);
            }
            Err(error) => {
                let failure = SourceFailure {
                    competition: source.competition.clone(),
                    error,
                };
                warn!("Source failed, skipping: {}", failure);
                batch.failures.push(failure);
            }
        }
    }

    if batch.failures.len() == sources.len() {
        return Err(BatchError::AllSourcesFailed(batch.failures));
    }
    Ok(batch)
}

fn fetch_source<F: HtmlFetcher>(
    fetcher: &F,
    parser: &FixturePageParser,
    source: &Source,
) -> Result<Vec<MatchRecord>, SourceError> {
    let html = fetcher.fetch_html(&source.url)?;
    Ok(parser.parse(&html, &source.competition)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, ScrapeError};
    use chrono_tz::UTC;
    use std::collections::HashMap;

    struct CannedFetcher {
        pages: HashMap<&'static str, &'static str>,
    }

    impl HtmlFetcher for CannedFetcher {
        fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
            self.pages
                .get(url)
                .map(|page| page.to_string())
                .ok_or_else(|| FetchError::Status { url: url.to_string(), status: 404 })
        }
    }

    const PAGE_A: &str = r#"<span class="SimpleMatchCardTeam_simpleMatchCardTeam__name__1">Leeds</span>
        <span class="SimpleMatchCardTeam_simpleMatchCardTeam__name__1">Hull</span>
        <div class="SimpleMatchCard_simpleMatchCard__matchContent__1">FT</div>"#;
    const PAGE_B: &str = r#"<span class="SimpleMatchCardTeam_simpleMatchCardTeam__name__1">Bury</span>
        <span class="SimpleMatchCardTeam_simpleMatchCardTeam__name__1">Wigan</span>
        <div class="SimpleMatchCard_simpleMatchCard__matchContent__1">01/02/2025 15:00</div>"#;

    fn sources() -> Vec<Source> {
        vec![
            Source::new("A", "http://a"),
            Source::new("Broken", "http://broken"),
            Source::new("Missing", "http://missing"),
            Source::new("B", "http://b"),
        ]
    }

    fn fetcher() -> CannedFetcher {
        CannedFetcher {
            pages: HashMap::from([
                ("http://a", PAGE_A),
                ("http://b", PAGE_B),
                ("http://broken", "<p>nothing here</p>"),
            ]),
        }
    }

    #[test]
    fn test_partial_failure_keeps_order() {
        let batch = fetch_batch(&fetcher(), &sources(), UTC).unwrap();

        let homes: Vec<_> = batch.records.iter().map(|r| r.home.as_str()).collect();
        assert_eq!(homes, vec!["Leeds", "Bury"]);
        assert!(batch.is_partial());
        assert_eq!(batch.failures.len(), 2);
        assert_eq!(batch.failures[0].competition, "Broken");
        assert!(matches!(batch.failures[0].error, SourceError::Scrape(ScrapeError::NoMatchCards)));
        assert!(matches!(
            batch.failures[1].error,
            SourceError::Fetch(FetchError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn test_all_sources_failed() {
        let only_bad = vec![Source::new("Broken", "http://broken"), Source::new("Missing", "http://missing")];
        match fetch_batch(&fetcher(), &only_bad, UTC) {
            Err(BatchError::AllSourcesFailed(failures)) => {
                assert_eq!(failures.len(), 2);
                let message = BatchError::AllSourcesFailed(failures).to_string();
                assert!(message.starts_with("all 2 sources failed: Broken: no match cards found on page | Missing:"));
            }
            other => panic!("expected aggregate failure, got {:?}", other),
        }
    }

    #[test]
    fn test_no_sources() {
        assert!(matches!(fetch_batch(&fetcher(), &[], UTC), Err(BatchError::NoSources)));
    }

    #[test]
    fn test_bad_selectors() {
        let selectors = CardSelectors {
            time_cell: "[[".to_string(),
            ..CardSelectors::default()
        };
        assert!(matches!(
            fetch_batch_with_selectors(&fetcher(), &selectors, &[], UTC),
            Err(BatchError::NoSources)
        ));
        match fetch_batch_with_selectors(&fetcher(), &selectors, &sources(), UTC) {
            Err(BatchError::AllSourcesFailed(failures)) => {
                assert_eq!(failures.len(), 4);
                assert!(matches!(failures[0].error, SourceError::Scrape(ScrapeError::Selector { .. })));
            }
            other => panic!("expected selector failure, got {:?}", other),
        }
    }
}
