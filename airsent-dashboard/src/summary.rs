//! Terminal summary of the dataset

use airsent_query::{sorted_tally, Dataset, TallyEntry};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct TallyRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Tweets")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

fn tally_table(entries: &[TallyEntry]) -> String {
    let total: usize = entries.iter().map(|e| e.count).sum();
    let rows: Vec<TallyRow> = entries
        .iter()
        .map(|e| TallyRow {
            label: e.label.clone(),
            count: e.count,
            share: if total > 0 {
                format!("{:.1}%", e.count as f64 * 100.0 / total as f64)
            } else {
                "-".to_string()
            },
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Sentiment and airline tallies as printable tables
pub fn render_summary(dataset: &Dataset) -> String {
    let stats = dataset.stats();
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Dataset".bold().cyan()));
    out.push_str(&format!(
        "  posts: {}\n  with coordinates: {}\n  without usable timestamp: {}\n\n",
        stats.rows, stats.with_coordinates, stats.unparsed_timestamps
    ));

    out.push_str(&format!("{}\n", "Number of Tweets by Sentiment".bold().cyan()));
    out.push_str(&tally_table(&sorted_tally(dataset.sentiment_tally())));
    out.push_str("\n\n");

    out.push_str(&format!("{}\n", "Number of Tweets for Each Airline".bold().cyan()));
    out.push_str(&tally_table(&dataset.publisher_tally()));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use airsent_query::Post;

    #[test]
    fn test_summary_lists_tallies() {
        colored::control::set_override(false);
        let dataset = Dataset::from_posts(vec![
            Post::new("a").with_sentiment("negative").with_publisher("United"),
            Post::new("b").with_sentiment("negative").with_publisher("United"),
            Post::new("c").with_sentiment("positive").with_publisher("Delta"),
        ]);
        let summary = render_summary(&dataset);
        assert!(summary.contains("posts: 3"));
        assert!(summary.contains("United"));
        assert!(summary.contains("66.7%"));
        assert!(summary.contains("33.3%"));
    }

    #[test]
    fn test_empty_table() {
        let table = tally_table(&[]);
        assert!(table.contains("Label"));
    }
}
