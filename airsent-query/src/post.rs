//! Post model and row conversion

use crate::coords::{parse_coordinates, Coordinates};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One row of the dataset: a single tweet about an airline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: Option<u64>,
    /// Free-text body
    pub text: String,
    /// Sentiment label (`positive`, `neutral`, `negative` in the stock dataset)
    pub sentiment: Option<String>,
    pub sentiment_confidence: Option<f64>,
    pub negative_reason: Option<String>,
    /// Airline the tweet is about
    pub publisher: Option<String>,
    pub author: Option<String>,
    pub retweet_count: Option<u32>,
    /// Coordinate string exactly as found in the file
    pub coordinates_raw: Option<String>,
    /// Parsed form of `coordinates_raw`, if it parsed
    pub coordinates: Option<Coordinates>,
    /// Timestamp string exactly as found in the file
    pub created_at_raw: Option<String>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub location: Option<String>,
    pub timezone: Option<String>,
}

impl Post {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            sentiment: None,
            sentiment_confidence: None,
            negative_reason: None,
            publisher: None,
            author: None,
            retweet_count: None,
            coordinates_raw: None,
            coordinates: None,
            created_at_raw: None,
            created_at: None,
            location: None,
            timezone: None,
        }
    }

    pub fn with_sentiment(mut self, sentiment: impl Into<String>) -> Self {
        self.sentiment = Some(sentiment.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_coordinates(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        self.coordinates = parse_coordinates(&raw);
        self.coordinates_raw = Some(raw);
        self
    }

    pub fn with_created_at(mut self, raw: &str) -> Self {
        self.created_at = parse_timestamp(raw);
        self.created_at_raw = Some(raw.to_string());
        self
    }

    /// Hour of day (0-23) in the timestamp's own offset
    pub fn hour(&self) -> Option<u32> {
        self.created_at.map(|ts| ts.hour())
    }

    pub fn has_sentiment(&self, sentiment: &str) -> bool {
        self.sentiment.as_deref() == Some(sentiment)
    }

    /// A timestamp was present but could not be parsed
    pub fn has_unparsed_timestamp(&self) -> bool {
        self.created_at_raw.is_some() && self.created_at.is_none()
    }
}

/// Row shape as read from the CSV file. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPost {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    tweet_id: Option<u64>,
    airline_sentiment: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    airline_sentiment_confidence: Option<f64>,
    #[serde(default)]
    negativereason: Option<String>,
    airline: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    retweet_count: Option<u32>,
    text: Option<String>,
    tweet_coord: Option<String>,
    tweet_created: Option<String>,
    #[serde(default)]
    tweet_location: Option<String>,
    #[serde(default)]
    user_timezone: Option<String>,
}

impl RawPost {
    pub(crate) fn into_post(self) -> Post {
        let created_at_raw = non_blank(self.tweet_created);
        let created_at = created_at_raw.as_deref().and_then(parse_timestamp);

        let coordinates_raw = non_blank(self.tweet_coord);
        let coordinates = coordinates_raw.as_deref().and_then(parse_coordinates);

        Post {
            id: self.tweet_id,
            text: self.text.unwrap_or_default(),
            sentiment: non_blank(self.airline_sentiment),
            sentiment_confidence: self.airline_sentiment_confidence,
            negative_reason: non_blank(self.negativereason),
            publisher: non_blank(self.airline),
            author: non_blank(self.name),
            retweet_count: self.retweet_count,
            coordinates_raw,
            coordinates,
            created_at_raw,
            created_at,
            location: non_blank(self.tweet_location),
            timezone: non_blank(self.user_timezone),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse a creation timestamp. Accepts `2015-02-24 11:35:52 -0800`, RFC 3339,
/// and offset-less `2015-02-24 11:35:52` (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
}
