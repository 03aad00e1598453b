//! Dashboard view assembly
//!
//! A view is recomputed from the immutable dataset and the current control
//! values on every interaction. Nothing is cached between calls.

use crate::dataset::Dataset;
use crate::query::{hour_caption, sorted_tally, Breakdown, GeoPoint, TallyEntry};
use crate::words::{stopword_set, word_frequencies, WordCount};
use airsent_common::{AirsentError, Result, WordCloudConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Sentiments offered by the random-post selector
pub const SAMPLE_SENTIMENTS: [&str; 3] = ["positive", "neutral", "negative"];

/// Chart used for a tally section
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
}

impl FromStr for ChartKind {
    type Err = AirsentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" | "bar plot" => Ok(ChartKind::Bar),
            "pie" | "pie chart" => Ok(ChartKind::Pie),
            other => Err(AirsentError::InvalidParameter(format!(
                "unknown chart type '{}', expected bar or pie",
                other
            ))),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Pie => write!(f, "pie"),
        }
    }
}

/// Per-section visibility toggles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Visibility {
    pub sample: bool,
    pub sentiment_counts: bool,
    pub geo: bool,
    pub publisher_counts: bool,
    pub breakdown: bool,
    pub words: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            sample: false,
            sentiment_counts: true,
            geo: true,
            publisher_counts: true,
            breakdown: false,
            words: true,
        }
    }
}

impl Visibility {
    pub fn all() -> Self {
        Self {
            sample: true,
            sentiment_counts: true,
            geo: true,
            publisher_counts: true,
            breakdown: true,
            words: true,
        }
    }
}

/// Every control value of the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardParams {
    pub sample_sentiment: String,
    pub sentiment_chart: ChartKind,
    pub hour: u32,
    pub publisher_chart: ChartKind,
    pub publishers: Vec<String>,
    /// `None` picks the first sentiment found in the data
    pub word_sentiment: Option<String>,
    pub visibility: Visibility,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            sample_sentiment: SAMPLE_SENTIMENTS[0].to_string(),
            sentiment_chart: ChartKind::Bar,
            hour: 0,
            publisher_chart: ChartKind::Bar,
            publishers: Vec::new(),
            word_sentiment: None,
            visibility: Visibility::default(),
        }
    }
}

/// Control values as they arrive in a query string. Absent values keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    pub sample_sentiment: Option<String>,
    pub sentiment_chart: Option<String>,
    pub hour: Option<String>,
    pub publisher_chart: Option<String>,
    /// One entry per repeated `publishers` key
    pub publishers: Vec<String>,
    pub word_sentiment: Option<String>,
    pub show_sample: Option<String>,
    pub show_sentiment_counts: Option<String>,
    pub show_geo: Option<String>,
    pub show_publisher_counts: Option<String>,
    pub show_breakdown: Option<String>,
    pub show_words: Option<String>,
}

impl DashboardQuery {
    /// Collect decoded query pairs. `publishers` may repeat; for every other
    /// key the last value wins and unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = DashboardQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "publishers" => {
                    if !value.trim().is_empty() {
                        query.publishers.push(value);
                    }
                    continue;
                }
                "sample_sentiment" => &mut query.sample_sentiment,
                "sentiment_chart" => &mut query.sentiment_chart,
                "hour" => &mut query.hour,
                "publisher_chart" => &mut query.publisher_chart,
                "word_sentiment" => &mut query.word_sentiment,
                "show_sample" => &mut query.show_sample,
                "show_sentiment_counts" => &mut query.show_sentiment_counts,
                "show_geo" => &mut query.show_geo,
                "show_publisher_counts" => &mut query.show_publisher_counts,
                "show_breakdown" => &mut query.show_breakdown,
                "show_words" => &mut query.show_words,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }
}

pub fn parse_hour(raw: &str) -> Result<u32> {
    let hour: u32 = raw
        .trim()
        .parse()
        .map_err(|_| AirsentError::InvalidParameter(format!("hour '{}' is not a number", raw)))?;
    if hour > 23 {
        return Err(AirsentError::InvalidParameter(format!(
            "hour must be between 0 and 23, got {}",
            hour
        )));
    }
    Ok(hour)
}

fn parse_flag(name: &str, raw: Option<&str>, default: bool) -> Result<bool> {
    match raw.map(|r| r.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(value) => match value.as_str() {
            "1" | "true" | "on" | "yes" | "show" => Ok(true),
            "0" | "false" | "off" | "no" | "hide" => Ok(false),
            _ => Err(AirsentError::InvalidParameter(format!(
                "{} must be true or false, got '{}'",
                name, value
            ))),
        },
    }
}

impl TryFrom<DashboardQuery> for DashboardParams {
    type Error = AirsentError;

    fn try_from(query: DashboardQuery) -> Result<Self> {
        let defaults = DashboardParams::default();
        let vis = defaults.visibility;

        Ok(DashboardParams {
            sample_sentiment: query
                .sample_sentiment
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.sample_sentiment),
            sentiment_chart: query
                .sentiment_chart
                .as_deref()
                .map(str::parse::<ChartKind>)
                .transpose()?
                .unwrap_or(defaults.sentiment_chart),
            hour: query.hour.as_deref().map(parse_hour).transpose()?.unwrap_or(defaults.hour),
            publisher_chart: query
                .publisher_chart
                .as_deref()
                .map(str::parse::<ChartKind>)
                .transpose()?
                .unwrap_or(defaults.publisher_chart),
            publishers: query.publishers,
            word_sentiment: query.word_sentiment.filter(|s| !s.trim().is_empty()),
            visibility: Visibility {
                sample: parse_flag("show_sample", query.show_sample.as_deref(), vis.sample)?,
                sentiment_counts: parse_flag(
                    "show_sentiment_counts",
                    query.show_sentiment_counts.as_deref(),
                    vis.sentiment_counts,
                )?,
                geo: parse_flag("show_geo", query.show_geo.as_deref(), vis.geo)?,
                publisher_counts: parse_flag(
                    "show_publisher_counts",
                    query.show_publisher_counts.as_deref(),
                    vis.publisher_counts,
                )?,
                breakdown: parse_flag("show_breakdown", query.show_breakdown.as_deref(), vis.breakdown)?,
                words: parse_flag("show_words", query.show_words.as_deref(), vis.words)?,
            },
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleSection {
    Post {
        sentiment: String,
        text: String,
        publisher: Option<String>,
    },
    /// No post carries the requested sentiment
    Unavailable { sentiment: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallySection {
    pub chart: ChartKind,
    pub entries: Vec<TallyEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoSection {
    pub hour: u32,
    pub caption: String,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCloudSection {
    pub sentiment: String,
    pub words: Vec<WordCount>,
}

/// Everything needed to draw one page of the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub params: DashboardParams,
    pub available_publishers: Vec<String>,
    pub available_sentiments: Vec<String>,
    pub sample: Option<SampleSection>,
    pub sentiment_counts: Option<TallySection>,
    pub geo: Option<GeoSection>,
    pub publisher_counts: Option<TallySection>,
    pub breakdown: Option<Breakdown>,
    pub words: Option<WordCloudSection>,
}

impl DashboardView {
    pub fn build<R: Rng + ?Sized>(
        dataset: &Dataset,
        params: DashboardParams,
        rng: &mut R,
        word_config: &WordCloudConfig,
    ) -> Result<Self> {
        let vis = params.visibility;
        let available_sentiments = dataset.sentiments();

        let sample = vis.sample.then(|| match dataset.random_post(&params.sample_sentiment, rng) {
            Ok(post) => SampleSection::Post {
                sentiment: params.sample_sentiment.clone(),
                text: post.text.clone(),
                publisher: post.publisher.clone(),
            },
            Err(e) => SampleSection::Unavailable {
                sentiment: params.sample_sentiment.clone(),
                message: e.to_string(),
            },
        });

        let sentiment_counts = vis.sentiment_counts.then(|| TallySection {
            chart: params.sentiment_chart,
            entries: sorted_tally(dataset.sentiment_tally()),
        });

        let geo = if vis.geo {
            let points = dataset.geo_by_hour(params.hour)?;
            Some(GeoSection {
                hour: params.hour,
                caption: hour_caption(points.len(), params.hour),
                points,
            })
        } else {
            None
        };

        let publisher_counts = vis.publisher_counts.then(|| TallySection {
            chart: params.publisher_chart,
            entries: dataset.publisher_tally(),
        });

        let breakdown = (vis.breakdown && !params.publishers.is_empty())
            .then(|| dataset.publisher_breakdown(&params.publishers));

        let word_sentiment = params
            .word_sentiment
            .clone()
            .or_else(|| available_sentiments.first().cloned());
        let words = match (vis.words, word_sentiment) {
            (true, Some(sentiment)) => {
                let corpus = dataset.word_corpus(&sentiment);
                let stopwords = stopword_set(&word_config.extra_stopwords);
                Some(WordCloudSection {
                    words: word_frequencies(&corpus, &stopwords, word_config.max_words),
                    sentiment,
                })
            }
            _ => None,
        };

        debug!("built dashboard view for {:?}", params);

        Ok(Self {
            available_publishers: dataset.publishers(),
            available_sentiments,
            params,
            sample,
            sentiment_counts,
            geo,
            publisher_counts,
            breakdown,
            words,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::SAMPLE_CSV;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build(params: DashboardParams) -> Result<DashboardView> {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        DashboardView::build(&dataset, params, &mut rng, &WordCloudConfig::default())
    }

    #[test]
    fn test_default_sections() {
        let view = build(DashboardParams::default()).unwrap();
        assert!(view.sample.is_none());
        assert!(view.breakdown.is_none());

        let counts = view.sentiment_counts.unwrap();
        assert_eq!(counts.chart, ChartKind::Bar);
        assert_eq!(counts.entries[0].count, 2);

        let geo = view.geo.unwrap();
        assert_eq!(geo.caption, "0 tweets between 0:00 and 1:00");

        assert_eq!(view.publisher_counts.unwrap().entries.len(), 3);

        let words = view.words.unwrap();
        assert_eq!(words.sentiment, "neutral");
        assert!(words.words.iter().all(|w| !w.word.starts_with('@')));
    }

    #[test]
    fn test_sample_placeholder_when_no_match() {
        let params = DashboardParams {
            sample_sentiment: "furious".into(),
            visibility: Visibility::all(),
            ..Default::default()
        };
        let view = build(params).unwrap();
        match view.sample.unwrap() {
            SampleSection::Unavailable { sentiment, .. } => assert_eq!(sentiment, "furious"),
            other => panic!("expected placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_breakdown_needs_selection() {
        let mut params = DashboardParams {
            visibility: Visibility::all(),
            ..Default::default()
        };
        assert!(build(params.clone()).unwrap().breakdown.is_none());

        params.publishers = vec!["United".into()];
        let breakdown = build(params).unwrap().breakdown.unwrap();
        assert_eq!(breakdown.count("United", "negative"), 2);
    }

    fn pairs(raw: &[(&str, &str)]) -> DashboardQuery {
        DashboardQuery::from_pairs(raw.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn test_query_conversion() {
        let query = pairs(&[
            ("sentiment_chart", "Pie Chart"),
            ("hour", "3"),
            ("hour", "11"),
            ("publishers", "United"),
            ("publishers", ""),
            ("publishers", "Acme, Inc"),
            ("show_sample", "true"),
            ("show_words", "hide"),
            ("unrelated", "x"),
        ]);
        let params = DashboardParams::try_from(query).unwrap();
        assert_eq!(params.sentiment_chart, ChartKind::Pie);
        assert_eq!(params.publisher_chart, ChartKind::Bar);
        assert_eq!(params.hour, 11);
        assert_eq!(params.publishers, vec!["United", "Acme, Inc"]);
        assert!(params.visibility.sample);
        assert!(!params.visibility.words);
        assert!(params.visibility.geo);
    }

    #[test]
    fn test_query_rejects_bad_values() {
        let bad_hour = DashboardQuery { hour: Some("24".into()), ..Default::default() };
        assert!(DashboardParams::try_from(bad_hour).is_err());

        let bad_chart = DashboardQuery { sentiment_chart: Some("donut".into()), ..Default::default() };
        assert!(DashboardParams::try_from(bad_chart).is_err());

        let bad_flag = DashboardQuery { show_geo: Some("maybe".into()), ..Default::default() };
        assert!(DashboardParams::try_from(bad_flag).is_err());
    }

    #[test]
    fn test_geo_for_selected_hour() {
        let params = DashboardParams { hour: 11, ..Default::default() };
        let geo = build(params).unwrap().geo.unwrap();
        assert_eq!(geo.points.len(), 2);
        assert_eq!(geo.caption, "2 tweets between 11:00 and 12:00");
    }
}
