//! One-time ingestion of the tweets CSV into an immutable table

use crate::post::{Post, RawPost};
use airsent_common::{AirsentError, Result};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Columns whose absence makes the file unusable
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "text",
    "airline_sentiment",
    "airline",
    "tweet_coord",
    "tweet_created",
];

/// Immutable in-memory table of posts
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    posts: Vec<Post>,
    stats: LoadStats,
}

/// Counters collected while loading
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    pub rows: usize,
    pub with_coordinates: usize,
    /// Rows whose timestamp was present but unparseable
    pub unparsed_timestamps: usize,
}

impl LoadStats {
    fn collect(posts: &[Post]) -> Self {
        let mut stats = LoadStats { rows: posts.len(), ..Default::default() };
        for post in posts {
            if post.coordinates.is_some() {
                stats.with_coordinates += 1;
            }
            if post.has_unparsed_timestamp() {
                stats.unparsed_timestamps += 1;
            }
        }
        stats
    }
}

impl Dataset {
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let stats = LoadStats::collect(&posts);
        Self { posts, stats }
    }

    /// Load the dataset from a CSV file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading dataset from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load the dataset from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(AirsentError::MissingColumn(column.to_string()));
            }
        }

        let mut posts = Vec::new();
        for record in csv_reader.deserialize::<RawPost>() {
            posts.push(record?.into_post());
        }
        let stats = LoadStats::collect(&posts);

        if stats.unparsed_timestamps > 0 {
            warn!(
                "{} rows have unparseable timestamps and will not match any hour",
                stats.unparsed_timestamps
            );
        }
        info!(
            "Loaded {} posts ({} with coordinates)",
            stats.rows, stats.with_coordinates
        );

        Ok(Self { posts, stats })
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A slice of the stock dataset layout, including the columns the loader ignores
    pub const SAMPLE_CSV: &str = "\
tweet_id,airline_sentiment,airline_sentiment_confidence,negativereason,negativereason_confidence,airline,airline_sentiment_gold,name,negativereason_gold,retweet_count,text,tweet_coord,tweet_created,tweet_location,user_timezone
570306133677760513,neutral,1.0,,,Virgin America,,cairdin,,0,@VirginAmerica What @dhepburn said.,,2015-02-24 11:35:52 -0800,,Eastern Time (US & Canada)
570301130888122368,positive,0.3486,,0.0,Virgin America,,jnardino,,0,@VirginAmerica plus you've added commercials to the experience... tacky.,\"[40.64656067, -73.78334045]\",2015-02-24 11:15:59 -0800,,Pacific Time (US & Canada)
570301083672813571,negative,0.6837,Bad Flight,,United,,yvonnalynn,,0,@united I didn't today... Must mean I need to take another trip! http://t.co/x,\"[33.9, -118.4]\",2015-02-24 11:15:48 -0800,Lets Play,Central Time (US & Canada)
570301031407624196,negative,1.0,Late Flight,0.7033,United,,jnardino,,0,\"RT @united it's really aggressive to blast obnoxious \"\"entertainment\"\" in your guests' faces\",[0.0],2015-02-24 11:15:36 -0800,,Pacific Time (US & Canada)
570300817074462722,positive,1.0,,,Delta,,jnardino,,abc,@JetBlue great crew great flight,\"[40.7, -74.0]\",2015-02-24 12:01:00 -0800,NYC,
570300767074181121,,,,,Delta,,sam,,1,no label here,,not a date,,
";
}
