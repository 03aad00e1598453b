//! Static HTML report generation

use airsent_common::{Result, WordCloudConfig};
use airsent_query::{render_page, Dataset, DashboardParams, DashboardView, RenderOptions, Visibility};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Build a view with every section visible and write it to `output_dir/index.html`
pub fn generate_report<R: Rng + ?Sized>(
    dataset: &Dataset,
    mut params: DashboardParams,
    options: &RenderOptions,
    word_config: &WordCloudConfig,
    output_dir: &Path,
    rng: &mut R,
) -> Result<PathBuf> {
    params.visibility = Visibility::all();
    let view = DashboardView::build(dataset, params, rng, word_config)?;

    let options = RenderOptions {
        interactive: false,
        ..options.clone()
    };
    let html = render_page(&view, &options);

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("index.html");
    fs::write(&path, html)?;
    info!("Report written to {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use airsent_query::Post;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_report_written_with_all_sections() {
        let dataset = Dataset::from_posts(vec![
            Post::new("on time and friendly")
                .with_sentiment("positive")
                .with_publisher("Delta")
                .with_coordinates("[33.6, -84.4]")
                .with_created_at("2015-02-24 08:00:00 -0500"),
            Post::new("delayed again").with_sentiment("negative").with_publisher("United"),
        ]);
        let params = DashboardParams {
            hour: 8,
            publishers: vec!["Delta".into(), "United".into()],
            ..Default::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report");
        let mut rng = StdRng::seed_from_u64(5);
        let path = generate_report(
            &dataset,
            params,
            &RenderOptions::default(),
            &WordCloudConfig::default(),
            &out,
            &mut rng,
        )
        .unwrap();

        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("Random Positive Tweet"));
        assert!(html.contains("on time and friendly"));
        assert!(html.contains("1 tweets between 8:00 and 9:00"));
        assert!(html.contains("Breakdown Airline Tweets by Sentiment"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_invalid_hour_fails() {
        let dataset = Dataset::default();
        let params = DashboardParams { hour: 30, ..Default::default() };
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let result = generate_report(
            &dataset,
            params,
            &RenderOptions::default(),
            &WordCloudConfig::default(),
            dir.path(),
            &mut rng,
        );
        assert!(result.is_err());
    }
}
