//! Who speaks near whom: a forward sliding window over dialogue order.
use std::collections::HashSet;

use log::debug;

use crate::frequency::tally;
use crate::model::{CooccurrenceGraph, Link, Node, SeasonFilter, TranscriptLine};

///Exclusive end of the window opened at `index`, never past `len`.
///The window includes the base line, so `window_size = 5` reaches four lines ahead.
/// # Example
/// ```
/// use dialogue_stats::window_end;
/// assert_eq!(window_end(0, 5, 9), 5);
/// assert_eq!(window_end(7, 5, 9), 9);
/// assert_eq!(window_end(3, 0, 9), 4);
/// ```
pub fn window_end(index: usize, window_size: i64, len: usize) -> usize {
    if window_size <= 0 {
        return (index + 1).min(len);
    }
    index.saturating_add(window_size as usize).min(len)
}

/// Order-independent key for a pair of speakers.
pub fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Co-speaking graph of the tracked characters.
///
/// Lines are filtered by season and sorted by `(season, episode, line_number)`
/// here, whatever order the caller passes them in. Untracked speakers take up
/// window slots but never become nodes. A non-positive `window_size` gives an
/// empty graph.
pub fn build_cooccurrence(
    lines: &[TranscriptLine],
    season: SeasonFilter,
    window_size: i64,
    tracked: &HashSet<String>,
) -> CooccurrenceGraph {
    if window_size <= 0 {
        return CooccurrenceGraph::default();
    }

    let mut sorted: Vec<&TranscriptLine> = season.apply(lines).collect();
    sorted.sort_by_key(|l| l.order_key());

    let mut pairs: Vec<(&str, &str)> = Vec::new();
    for (index, base) in sorted.iter().enumerate() {
        if !tracked.contains(&base.speaker) {
            continue;
        }
        let max = window_end(index, window_size, sorted.len());
        for other in sorted.iter().take(max).skip(index + 1) {
            if other.speaker != base.speaker && tracked.contains(&other.speaker) {
                pairs.push(pair_key(&base.speaker, &other.speaker));
            }
        }
    }

    let links: Vec<Link> = tally(pairs)
        .into_iter()
        .map(|((source, target), value)| Link {
            source: source.to_string(),
            target: target.to_string(),
            value,
        })
        .collect();
    debug!(
        "co-occurrence (season {season}, window {window_size}): {} lines, {} links",
        sorted.len(),
        links.len()
    );
    CooccurrenceGraph::from_links(links)
}

impl CooccurrenceGraph {
    /// Builds the node list from the characters named in `links`, in order of first appearance.
    pub fn from_links(links: Vec<Link>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut nodes = Vec::new();
        for link in &links {
            for id in [&link.source, &link.target] {
                if seen.insert(id.as_str()) {
                    nodes.push(Node { id: id.clone() });
                }
            }
        }
        Self { nodes, links }
    }

    /// Keeps links with `value >= min` and the nodes they touch.
    pub fn with_min_weight(&self, min: u32) -> Self {
        let links = self
            .links
            .iter()
            .filter(|l| l.value >= min)
            .cloned()
            .collect();
        Self::from_links(links)
    }

    pub fn weight(&self, a: &str, b: &str) -> Option<u32> {
        let (source, target) = pair_key(a, b);
        self.links
            .iter()
            .find(|l| l.source == source && l.target == target)
            .map(|l| l.value)
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
