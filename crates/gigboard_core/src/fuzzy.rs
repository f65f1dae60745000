//! Approximate substring matching used by the fuzzy filter.
//!
//! A pattern is matched against every substring of the text (Sellers' variant
//! of edit distance). The score of a match is
//! `errors / pattern_len + start / distance`, so 0.0 is an exact hit at the
//! start of the text and anything above the threshold is rejected.

use crate::JobRecord;

/// Default acceptance threshold on the 0..=1 score scale.
pub const DEFAULT_THRESHOLD: f64 = 0.4;
/// How far into a field a match may start before the offset alone disqualifies it.
pub const DEFAULT_DISTANCE: usize = 100;
/// Patterns longer than this are scored chunk by chunk.
pub const MAX_PATTERN_LEN: usize = 32;

const NO_MATCH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
    distance: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

/// A record accepted by [`FuzzyMatcher::search`] together with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyHit<'a> {
    pub record: &'a JobRecord,
    pub score: f64,
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            distance: DEFAULT_DISTANCE,
        }
    }

    pub fn with_distance(mut self, distance: usize) -> Self {
        self.distance = distance;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores `pattern` against `text`, case-insensitively.
    ///
    /// Returns `None` when no chunk of the pattern matches within the threshold.
    pub fn score(&self, pattern: &str, text: &str) -> Option<f64> {
        let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
        let text: Vec<char> = text.to_lowercase().chars().collect();
        if pattern.is_empty() {
            return None;
        }

        let chunks: Vec<&[char]> = pattern.chunks(MAX_PATTERN_LEN).collect();
        let mut matched = false;
        let mut total = 0.0;
        for chunk in &chunks {
            let score = self.best_chunk_score(chunk, &text);
            if score <= self.threshold {
                matched = true;
                total += score;
            } else {
                total += NO_MATCH;
            }
        }

        matched.then(|| total / chunks.len() as f64)
    }

    /// Ranks `records` against `query` over title, company and location.
    ///
    /// A record's score is the product of its matching field scores, each
    /// raised to the field's weight times its length norm, so a record that
    /// matches in several fields outranks one matching in a single field.
    /// Hits are ordered by ascending score; ties keep input order.
    pub fn search<'a>(&self, query: &str, records: &'a [JobRecord]) -> Vec<FuzzyHit<'a>> {
        let mut hits: Vec<FuzzyHit<'a>> = records
            .iter()
            .filter_map(|record| {
                self.record_score(query, record)
                    .map(|score| FuzzyHit { record, score })
            })
            .collect();
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }

    fn record_score(&self, query: &str, record: &JobRecord) -> Option<f64> {
        let fields = record.search_fields();
        let weight = 1.0 / fields.len() as f64;
        fields
            .into_iter()
            .flatten()
            .filter(|field| !field.is_empty())
            .filter_map(|field| {
                self.score(query, field)
                    .map(|score| score.max(f64::EPSILON).powf(weight * field_norm(field)))
            })
            .reduce(|total, score| total * score)
    }

    fn best_chunk_score(&self, pattern: &[char], text: &[char]) -> f64 {
        let len = pattern.len();
        // cost[i]: fewest edits aligning pattern[..i] with a substring ending at
        // the current text position; start[i]: where that substring begins.
        let mut cost: Vec<usize> = (0..=len).collect();
        let mut start: Vec<usize> = vec![0; len + 1];
        let mut best = self.chunk_score(cost[len], start[len], len);

        for (pos, &ch) in text.iter().enumerate() {
            let mut next_cost = vec![0; len + 1];
            let mut next_start = vec![pos + 1; len + 1];
            for i in 1..=len {
                let diagonal = cost[i - 1] + usize::from(pattern[i - 1] != ch);
                let skip_pattern = next_cost[i - 1] + 1;
                let skip_text = cost[i] + 1;

                let (value, from) = if diagonal <= skip_pattern && diagonal <= skip_text {
                    (diagonal, start[i - 1])
                } else if skip_pattern <= skip_text {
                    (skip_pattern, next_start[i - 1])
                } else {
                    (skip_text, start[i])
                };
                next_cost[i] = value;
                next_start[i] = from;
            }
            cost = next_cost;
            start = next_start;

            let score = self.chunk_score(cost[len], start[len], len);
            if score < best {
                best = score;
            }
        }

        best.min(NO_MATCH)
    }

    fn chunk_score(&self, errors: usize, start: usize, len: usize) -> f64 {
        let accuracy = errors as f64 / len as f64;
        if self.distance == 0 {
            return if start == 0 { accuracy } else { NO_MATCH };
        }
        accuracy + start as f64 / self.distance as f64
    }
}

/// Shorter fields weigh more: `1 / sqrt(tokens)`, rounded to three places.
fn field_norm(field: &str) -> f64 {
    let tokens = field.split_whitespace().count().max(1) as f64;
    (1000.0 / tokens.sqrt()).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::{FuzzyMatcher, DEFAULT_THRESHOLD};
    use crate::JobRecord;

    #[test]
    fn exact_prefix_scores_zero() {
        let matcher = FuzzyMatcher::default();
        assert_eq!(matcher.score("go", "Go Developer"), Some(0.0));
    }

    #[test]
    fn offset_is_penalised_by_distance() {
        let matcher = FuzzyMatcher::default();
        let score = matcher.score("developer", "Go Developer").unwrap();
        assert!((score - 0.03).abs() < 1e-9);
    }

    #[test]
    fn single_typo_is_tolerated() {
        let matcher = FuzzyMatcher::default();
        let score = matcher.score("devloper", "Developer").unwrap();
        assert!(score > 0.0 && score <= DEFAULT_THRESHOLD);
    }

    #[test]
    fn unrelated_text_is_rejected() {
        let matcher = FuzzyMatcher::default();
        assert_eq!(matcher.score("kotlin", "Berlin"), None);
        assert_eq!(matcher.score("", "anything"), None);
    }

    #[test]
    fn zero_threshold_only_accepts_exact_prefix() {
        let matcher = FuzzyMatcher::new(0.0);
        assert_eq!(matcher.score("java", "Java Developer"), Some(0.0));
        assert_eq!(matcher.score("developer", "Java Developer"), None);
    }

    #[test]
    fn long_patterns_match_chunk_wise() {
        let matcher = FuzzyMatcher::default();
        let text = "senior distributed systems engineer with rust";
        assert!(matcher.score(text, text).is_some());
    }

    #[test]
    fn search_keeps_load_order_on_equal_scores() {
        let records = vec![
            JobRecord::new("1").with_title("Backend Engineer").with_company("Rustacean GmbH"),
            JobRecord::new("2").with_title("Rust Developer"),
            JobRecord::new("3").with_title("Designer"),
        ];
        let hits = FuzzyMatcher::default().search("rust", &records);
        let ids: Vec<_> = hits.iter().map(|hit| hit.record.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn matches_in_several_fields_rank_first() {
        let records = vec![
            JobRecord::new("A").with_title("Rust Engineer").with_company("Acme"),
            JobRecord::new("B").with_title("Senior Rust Dev").with_company("Rust Labs"),
        ];
        let hits = FuzzyMatcher::default().search("rust", &records);
        let ids: Vec<_> = hits.iter().map(|hit| hit.record.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn shorter_fields_outrank_longer_ones_on_equal_matches() {
        let records = vec![
            JobRecord::new("long").with_title("Rust Platform Team Lead"),
            JobRecord::new("short").with_title("Rust"),
        ];
        let hits = FuzzyMatcher::default().search("rust", &records);
        let ids: Vec<_> = hits.iter().map(|hit| hit.record.id.as_str()).collect();
        assert_eq!(ids, vec!["short", "long"]);
    }
}
