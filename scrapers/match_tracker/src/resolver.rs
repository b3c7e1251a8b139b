use chrono::DateTime;
use chrono_tz::Tz;
use tracing::trace;

use crate::markup::MarkupNode;
use crate::timestamp;

/// Attributes that carry a machine-readable kickoff, most specific first.
pub const TIMESTAMP_ATTRIBUTES: &[&str] = &[
    "datetime",
    "data-datetime",
    "data-time",
    "data-timestamp",
    "data-start-time",
    "data-kickoff",
    "data-date",
    "content",
];

const TIME_TAG: &str = "time";

/// Finds the kickoff instant for a match-card cell.
///
/// Looks, in order, at the node's own timestamp attributes, a nested
/// `<time>` element, every attribute of every descendant, and finally the
/// visible text. The first candidate [`timestamp::parse`] accepts wins.
/// `None` means the card shows no fixed kickoff (live, finished, or simply
/// unreadable), which is a normal outcome.
pub fn resolve<N: MarkupNode>(node: &N, source_tz: Tz) -> Option<DateTime<Tz>> {
    from_own_attributes(node, source_tz)
        .or_else(|| from_time_tag(node, source_tz))
        .or_else(|| from_descendant_attributes(node, source_tz))
        .or_else(|| from_visible_text(node, source_tz))
}

fn from_own_attributes<N: MarkupNode>(node: &N, source_tz: Tz) -> Option<DateTime<Tz>> {
    let found = first_known_attribute(node, source_tz);
    if found.is_some() {
        trace!("kickoff resolved from node attribute");
    }
    found
}

fn from_time_tag<N: MarkupNode>(node: &N, source_tz: Tz) -> Option<DateTime<Tz>> {
    let time = node.find_tag(TIME_TAG)?;
    let found = first_known_attribute(&time, source_tz);
    if found.is_some() {
        trace!("kickoff resolved from nested <time>");
    }
    found
}

fn from_descendant_attributes<N: MarkupNode>(node: &N, source_tz: Tz) -> Option<DateTime<Tz>> {
    for descendant in node.descendant_elements() {
        for (name, value) in descendant.attributes() {
            if let Some(instant) = timestamp::parse(value, source_tz) {
                trace!(attribute = name, "kickoff resolved from descendant attribute");
                return Some(instant);
            }
        }
    }
    None
}

fn from_visible_text<N: MarkupNode>(node: &N, source_tz: Tz) -> Option<DateTime<Tz>> {
    let text = node.visible_text();
    let found = timestamp::parse(&text, source_tz);
    if found.is_some() {
        trace!(%text, "kickoff resolved from visible text");
    }
    found
}

fn first_known_attribute<N: MarkupNode>(node: &N, source_tz: Tz) -> Option<DateTime<Tz>> {
    TIMESTAMP_ATTRIBUTES
        .iter()
        .filter_map(|name| node.attribute(name))
        .find_map(|value| timestamp::parse(value, source_tz))
}
