//! Word counting and ranking.
//!
//! Two rankings are available. [`RankingPolicy::FirstSeen`] counts every word
//! once and sorts by count, keeping first-occurrence order among ties.
//! [`RankingPolicy::Incremental`] keeps the older behaviour of the service: each
//! count update appends a new entry and bubbles it left, so superseded counts
//! for the same word stay in the list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::text::{tokenize, SplitMode};

/// Number of entries the endpoint returns.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

impl WordCount {
    fn new(word: String, count: usize) -> Self {
        Self { word, count }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingPolicy {
    #[default]
    FirstSeen,
    Incremental,
}

/// How a text is cut into words and how the words are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Analysis {
    pub split: SplitMode,
    pub ranking: RankingPolicy,
}

impl Analysis {
    /// Single-space splitting and incremental ranking, as the first
    /// version of the endpoint answered. Normalization is shared with the
    /// default analysis and stays idempotent, so a token like `".\na"`
    /// counts as `"a"` here too.
    pub fn compat() -> Self {
        Self {
            split: SplitMode::SingleSpace,
            ranking: RankingPolicy::Incremental,
        }
    }

    /// Full ranked list for `text`.
    pub fn rank_text(&self, text: &str) -> Vec<WordCount> {
        rank(tokenize(text, self.split), self.ranking)
    }
}

/// Rank `tokens` descending by count.
pub fn rank<I>(tokens: I, policy: RankingPolicy) -> Vec<WordCount>
where
    I: IntoIterator<Item = String>,
{
    match policy {
        RankingPolicy::FirstSeen => rank_first_seen(tokens),
        RankingPolicy::Incremental => rank_incremental(tokens),
    }
}

fn rank_first_seen<I>(tokens: I) -> Vec<WordCount>
where
    I: IntoIterator<Item = String>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<WordCount> = Vec::new();

    for word in tokens {
        match slots.get(&word) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(word.clone(), counts.len());
                counts.push(WordCount::new(word, 1));
            }
        }
    }

    // stable: equal counts stay in first-occurrence order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn rank_incremental<I>(tokens: I) -> Vec<WordCount>
where
    I: IntoIterator<Item = String>,
{
    let mut running: HashMap<String, usize> = HashMap::new();
    let mut ordered: Vec<WordCount> = Vec::new();

    for word in tokens {
        let count = running.entry(word.clone()).or_insert(0);
        *count += 1;
        ordered.push(WordCount::new(word, *count));

        let mut i = ordered.len() - 1;
        while i > 0 && ordered[i - 1].count < ordered[i].count {
            ordered.swap(i - 1, i);
            i -= 1;
        }
    }

    ordered
}

/// The first [`TOP_N`] entries of the ranking of `text`.
///
/// # Errors
///
/// [`Error::InsufficientVocabulary`] when the ranked list is shorter than
/// [`TOP_N`]. Nothing is returned in that case.
pub fn top_words(text: &str, analysis: &Analysis) -> Result<Vec<WordCount>> {
    let mut ranked = analysis.rank_text(text);
    if ranked.len() < TOP_N {
        return Err(Error::InsufficientVocabulary {
            found: ranked.len(),
        });
    }
    ranked.truncate(TOP_N);
    Ok(ranked)
}
