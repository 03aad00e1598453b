//! Filtering and aggregation over the immutable dataset
//!
//! Every operation is a pure function of the dataset and its parameters.
//! No matching rows is a valid empty result, except for [`Dataset::random_post`].

use crate::coords::Coordinates;
use crate::dataset::Dataset;
use crate::post::Post;
use airsent_common::{AirsentError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Tokens removed from the word corpus
const RETWEET_MARKER: &str = "RT";

/// One key of a tally with its count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TallyEntry {
    pub label: String,
    pub count: usize,
}

/// A post that survived the geo filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub publisher: Option<String>,
    pub sentiment: Option<String>,
    pub text: String,
}

/// Publisher x sentiment cross-tabulation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Breakdown {
    /// Sentiment labels present in the selected rows, first-appearance order
    pub sentiments: Vec<String>,
    pub rows: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakdownRow {
    pub publisher: String,
    /// Count per sentiment label; labels absent for this publisher map to 0
    pub counts: BTreeMap<String, usize>,
}

impl BreakdownRow {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Breakdown {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count(&self, publisher: &str, sentiment: &str) -> usize {
        self.rows
            .iter()
            .find(|row| row.publisher == publisher)
            .and_then(|row| row.counts.get(sentiment).copied())
            .unwrap_or(0)
    }
}

/// Sort a tally descending by count, ties by label
pub fn sorted_tally(counts: HashMap<String, usize>) -> Vec<TallyEntry> {
    let mut entries: Vec<TallyEntry> = counts
        .into_iter()
        .map(|(label, count)| TallyEntry { label, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

/// Caption shown above the geo scatter
pub fn hour_caption(count: usize, hour: u32) -> String {
    format!("{} tweets between {}:00 and {}:00", count, hour, (hour + 1) % 24)
}

/// Drop URL, mention and retweet tokens from whitespace-separated text
pub fn clean_tokens(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| {
            !token.contains("http") && !token.starts_with('@') && *token != RETWEET_MARKER
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Dataset {
    /// Posts carrying the given sentiment label
    pub fn with_sentiment<'a, 's>(&'a self, sentiment: &'s str) -> impl Iterator<Item = &'a Post> + 's
    where
        'a: 's,
    {
        self.posts().iter().filter(move |p| p.has_sentiment(sentiment))
    }

    /// Pick one post with the given sentiment uniformly at random
    pub fn random_post<R: Rng + ?Sized>(&self, sentiment: &str, rng: &mut R) -> Result<&Post> {
        let candidates: Vec<&Post> = self
            .posts()
            .iter()
            .filter(|p| p.has_sentiment(sentiment))
            .collect();
        debug!("{} candidates for random {} post", candidates.len(), sentiment);
        candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| AirsentError::NoData(format!("no posts with sentiment '{}'", sentiment)))
    }

    /// Count posts per sentiment label. Unlabeled posts are not counted.
    pub fn sentiment_tally(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for label in self.posts().iter().filter_map(|p| p.sentiment.as_ref()) {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Count posts per publisher, descending by count
    pub fn publisher_tally(&self) -> Vec<TallyEntry> {
        let mut counts = HashMap::new();
        for publisher in self.posts().iter().filter_map(|p| p.publisher.as_ref()) {
            *counts.entry(publisher.clone()).or_insert(0) += 1;
        }
        sorted_tally(counts)
    }

    /// Posts with parseable coordinates created during the given hour of day
    pub fn geo_by_hour(&self, hour: u32) -> Result<Vec<GeoPoint>> {
        if hour > 23 {
            return Err(AirsentError::InvalidParameter(format!(
                "hour must be between 0 and 23, got {}",
                hour
            )));
        }

        let points: Vec<GeoPoint> = self
            .posts()
            .iter()
            .filter(|p| p.hour() == Some(hour))
            .filter_map(|p| {
                p.coordinates.map(|Coordinates { latitude, longitude }| GeoPoint {
                    latitude,
                    longitude,
                    publisher: p.publisher.clone(),
                    sentiment: p.sentiment.clone(),
                    text: p.text.clone(),
                })
            })
            .collect();

        debug!("{} geolocated posts at hour {}", points.len(), hour);
        Ok(points)
    }

    /// Cross-tabulate sentiment counts for the chosen publishers
    pub fn publisher_breakdown<S: AsRef<str>>(&self, publishers: &[S]) -> Breakdown {
        let mut order: Vec<&str> = Vec::new();
        for publisher in publishers {
            let publisher = publisher.as_ref();
            if !order.contains(&publisher) {
                order.push(publisher);
            }
        }
        if order.is_empty() {
            return Breakdown::default();
        }
        let chosen: HashSet<&str> = order.iter().copied().collect();

        let mut sentiments: Vec<String> = Vec::new();
        let mut cells: HashMap<(&str, &str), usize> = HashMap::new();
        for post in self.posts() {
            let (Some(publisher), Some(sentiment)) = (post.publisher.as_deref(), post.sentiment.as_deref()) else {
                continue;
            };
            if !chosen.contains(publisher) {
                continue;
            }
            if !sentiments.iter().any(|s| s == sentiment) {
                sentiments.push(sentiment.to_string());
            }
            *cells.entry((publisher, sentiment)).or_insert(0) += 1;
        }

        let rows = order
            .into_iter()
            .map(|publisher| BreakdownRow {
                publisher: publisher.to_string(),
                counts: sentiments
                    .iter()
                    .map(|s| {
                        let count = cells.get(&(publisher, s.as_str())).copied().unwrap_or(0);
                        (s.clone(), count)
                    })
                    .collect(),
            })
            .collect();

        Breakdown { sentiments, rows }
    }

    /// Concatenated bodies of one sentiment with URL, mention and retweet tokens removed
    pub fn word_corpus(&self, sentiment: &str) -> String {
        let joined = self
            .with_sentiment(sentiment)
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        clean_tokens(&joined)
    }

    /// Distinct publishers in first-appearance order
    pub fn publishers(&self) -> Vec<String> {
        distinct(self.posts().iter().filter_map(|p| p.publisher.as_deref()))
    }

    /// Distinct sentiment labels in first-appearance order
    pub fn sentiments(&self) -> Vec<String> {
        distinct(self.posts().iter().filter_map(|p| p.sentiment.as_deref()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
