//! HTML rendering of a dashboard view
//!
//! Charts are emitted as Plotly traces and drawn client side. The sidebar is a
//! GET form, so every control change requests a freshly computed page.

use crate::query::{Breakdown, TallyEntry};
use crate::view::{ChartKind, DashboardView, GeoSection, SampleSection, TallySection, WordCloudSection, SAMPLE_SENTIMENTS};
use serde_json::{json, Value};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Page-level rendering options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub background_color: String,
    /// Include the sidebar control form
    pub interactive: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Sentiment Analysis on Tweets about US Airlines".to_string(),
            background_color: "#120128".to_string(),
            interactive: true,
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Capitalize the first letter, as used in section headings
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Serialize JSON for embedding inside a `<script>` element
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn plot(id: &str, data: Value, layout: Value) -> String {
    format!(
        r#"<div id="{id}" class="chart"></div>
<script>Plotly.newPlot("{id}", {}, {}, {{"responsive": true}});</script>
"#,
        script_json(&data),
        script_json(&layout),
    )
}

/// Plotly traces for a tally drawn as bar or pie
pub fn tally_traces(entries: &[TallyEntry], chart: ChartKind, value_label: &str) -> Value {
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    let counts: Vec<usize> = entries.iter().map(|e| e.count).collect();
    match chart {
        ChartKind::Bar => json!([{
            "type": "bar",
            "x": labels,
            "y": counts,
            "name": value_label,
            "marker": { "color": counts, "colorscale": "Viridis", "showscale": true },
        }]),
        ChartKind::Pie => json!([{
            "type": "pie",
            "labels": labels,
            "values": counts,
        }]),
    }
}

/// Grouped bars: one trace per sentiment across the chosen publishers
pub fn breakdown_traces(breakdown: &Breakdown) -> Value {
    let publishers: Vec<&str> = breakdown.rows.iter().map(|r| r.publisher.as_str()).collect();
    let traces: Vec<Value> = breakdown
        .sentiments
        .iter()
        .map(|sentiment| {
            let counts: Vec<usize> = breakdown
                .rows
                .iter()
                .map(|row| row.counts.get(sentiment).copied().unwrap_or(0))
                .collect();
            json!({ "type": "bar", "name": sentiment, "x": publishers, "y": counts })
        })
        .collect();
    Value::Array(traces)
}

pub fn geo_traces(geo: &GeoSection) -> Value {
    let lat: Vec<f64> = geo.points.iter().map(|p| p.latitude).collect();
    let lon: Vec<f64> = geo.points.iter().map(|p| p.longitude).collect();
    let text: Vec<String> = geo
        .points
        .iter()
        .map(|p| match &p.publisher {
            Some(publisher) => format!("{}: {}", publisher, p.text),
            None => p.text.clone(),
        })
        .collect();
    json!([{
        "type": "scattergeo",
        "mode": "markers",
        "lat": lat,
        "lon": lon,
        "text": text,
        "marker": { "size": 6, "color": "#ff4b4b" },
    }])
}

/// Render the full dashboard page
pub fn render_page(view: &DashboardView, options: &RenderOptions) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{PLOTLY_CDN}"></script>
    <style>
        body {{ background-color: {bg}; color: #f0f0f0; font-family: sans-serif; margin: 0; display: flex; }}
        aside {{ width: 280px; padding: 1rem; background: rgba(255, 255, 255, 0.06); min-height: 100vh; }}
        main {{ flex: 1; padding: 1rem 2rem; }}
        .chart {{ width: 100%; min-height: 420px; }}
        .placeholder {{ color: #ffb347; font-style: italic; }}
        .cloud span {{ display: inline-block; margin: 0.2rem 0.4rem; color: #120128; }}
        .cloud {{ background: white; padding: 1rem; border-radius: 4px; }}
        label {{ display: block; margin-top: 0.6rem; }}
    </style>
</head>
<body>
"#,
        title = escape_html(&options.title),
        bg = escape_html(&options.background_color),
    ));

    if options.interactive {
        html.push_str(&render_controls(view));
    }

    html.push_str(&format!("<main>\n<h1>{}</h1>\n<hr>\n", escape_html(&options.title)));

    if let Some(sample) = &view.sample {
        html.push_str(&render_sample(sample));
    }
    if let Some(counts) = &view.sentiment_counts {
        html.push_str("<h3>Number of Tweets by Sentiment</h3>\n");
        html.push_str(&render_tally("sentiment-counts", counts, "Tweets"));
    }
    if let Some(geo) = &view.geo {
        html.push_str(&render_geo(geo));
    }
    if let Some(counts) = &view.publisher_counts {
        html.push_str("<h3>Number of Tweets for Each Airline</h3>\n");
        html.push_str(&render_tally("publisher-counts", counts, "Tweets"));
    }
    if let Some(breakdown) = &view.breakdown {
        html.push_str(&render_breakdown(breakdown));
    }
    if let Some(words) = &view.words {
        html.push_str(&render_word_cloud(words));
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_sample(sample: &SampleSection) -> String {
    match sample {
        SampleSection::Post { sentiment, text, publisher } => format!(
            "<h3>Random {} Tweet</h3>\n<blockquote>{}</blockquote>\n<p>{}</p>\n<hr>\n",
            escape_html(&capitalize(sentiment)),
            escape_html(text),
            escape_html(publisher.as_deref().unwrap_or("")),
        ),
        SampleSection::Unavailable { sentiment, .. } => format!(
            "<h3>Random {} Tweet</h3>\n<p class=\"placeholder\">No data available for this sentiment.</p>\n<hr>\n",
            escape_html(&capitalize(sentiment)),
        ),
    }
}

fn render_tally(id: &str, section: &TallySection, value_label: &str) -> String {
    if section.entries.is_empty() {
        return "<p class=\"placeholder\">No data available.</p>\n".to_string();
    }
    plot(
        id,
        tally_traces(&section.entries, section.chart, value_label),
        json!({ "paper_bgcolor": "rgba(0,0,0,0)", "font": { "color": "#f0f0f0" } }),
    )
}

fn render_geo(geo: &GeoSection) -> String {
    let mut html = format!(
        "<h3>Tweet locations based on time of the day</h3>\n<p>{}</p>\n",
        escape_html(&geo.caption)
    );
    let fitbounds = if geo.points.is_empty() {
        Value::Bool(false)
    } else {
        json!("locations")
    };
    html.push_str(&plot(
        "geo",
        geo_traces(geo),
        json!({
            "geo": { "showland": true, "fitbounds": fitbounds },
            "paper_bgcolor": "rgba(0,0,0,0)",
            "margin": { "l": 0, "r": 0, "t": 0, "b": 0 },
        }),
    ));
    html.push_str("<hr>\n");
    html
}

fn render_breakdown(breakdown: &Breakdown) -> String {
    let mut html = String::from("<h2>Breakdown Airline Tweets by Sentiment</h2>\n");
    html.push_str(&plot(
        "breakdown",
        breakdown_traces(breakdown),
        json!({
            "barmode": "group",
            "xaxis": { "title": "airline" },
            "yaxis": { "title": "count" },
            "legend": { "title": { "text": "sentiment" } },
            "paper_bgcolor": "rgba(0,0,0,0)",
            "font": { "color": "#f0f0f0" },
        }),
    ));
    html.push_str("<hr>\n");
    html
}

fn render_word_cloud(section: &WordCloudSection) -> String {
    let mut html = format!(
        "<h3>Word Cloud for {} Sentiment</h3>\n",
        escape_html(&capitalize(&section.sentiment))
    );
    let Some(max) = section.words.iter().map(|w| w.count).max() else {
        html.push_str("<p class=\"placeholder\">No words to display.</p>\n<hr>\n");
        return html;
    };

    html.push_str("<div class=\"cloud\">\n");
    for word in &section.words {
        let size = 12.0 + 36.0 * (word.count as f64 / max as f64);
        html.push_str(&format!(
            "<span style=\"font-size: {:.0}px\" title=\"{}\">{}</span>\n",
            size,
            word.count,
            escape_html(&word.word)
        ));
    }
    html.push_str("</div>\n<hr>\n");
    html
}

fn select(name: &str, options: &[(String, String)], selected: &str) -> String {
    let mut html = format!("<select name=\"{}\">\n", name);
    for (value, label) in options {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape_html(value),
            if value == selected { " selected" } else { "" },
            escape_html(label)
        ));
    }
    html.push_str("</select>\n");
    html
}

fn chart_options() -> Vec<(String, String)> {
    vec![
        ("bar".to_string(), "Bar Plot".to_string()),
        ("pie".to_string(), "Pie Chart".to_string()),
    ]
}

fn visibility_select(name: &str, label: &str, shown: bool) -> String {
    let options = vec![
        ("true".to_string(), "Show".to_string()),
        ("false".to_string(), "Hide".to_string()),
    ];
    format!(
        "<label>{}</label>\n{}",
        escape_html(label),
        select(name, &options, if shown { "true" } else { "false" })
    )
}

fn render_controls(view: &DashboardView) -> String {
    let params = &view.params;
    let vis = params.visibility;
    let mut html = String::from("<aside>\n<h2>Sentiment Analysis on Tweets</h2>\n<form method=\"get\" action=\"/\">\n");

    html.push_str("<h4>Show Random Tweet</h4>\n<label>Sentiment</label>\n");
    let sample_options: Vec<(String, String)> = SAMPLE_SENTIMENTS
        .iter()
        .map(|s| (s.to_string(), s.to_string()))
        .collect();
    html.push_str(&select("sample_sentiment", &sample_options, &params.sample_sentiment));
    html.push_str(&visibility_select("show_sample", "Random tweet", vis.sample));

    html.push_str("<h4>Number of Tweets by Sentiment</h4>\n<label>Visualization Type</label>\n");
    html.push_str(&select("sentiment_chart", &chart_options(), &params.sentiment_chart.to_string()));
    html.push_str(&visibility_select("show_sentiment_counts", "Sentiment counts", vis.sentiment_counts));

    html.push_str(&format!(
        "<h4>Tweet locations based on time of day</h4>\n<label>Hour to look at: {hour}</label>\n<input type=\"range\" name=\"hour\" min=\"0\" max=\"23\" value=\"{hour}\">\n",
        hour = params.hour
    ));
    html.push_str(&visibility_select("show_geo", "Map", vis.geo));

    html.push_str("<h4>Number of tweets for each Airline</h4>\n<label>Visualization Type</label>\n");
    html.push_str(&select("publisher_chart", &chart_options(), &params.publisher_chart.to_string()));
    html.push_str(&visibility_select("show_publisher_counts", "Airline counts", vis.publisher_counts));

    html.push_str("<h4>Breakdown Airline Tweets by Sentiment</h4>\n<label>Pick Airline(s)</label>\n<select name=\"publishers\" multiple>\n");
    for publisher in &view.available_publishers {
        html.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>\n",
            escape_html(publisher),
            if params.publishers.contains(publisher) { " selected" } else { "" }
        ));
    }
    html.push_str("</select>\n");
    html.push_str(&visibility_select("show_breakdown", "Breakdown", vis.breakdown));

    html.push_str("<h4>Word Cloud</h4>\n<label>Which Sentiment to Display</label>\n");
    let word_options: Vec<(String, String)> = view
        .available_sentiments
        .iter()
        .map(|s| (s.clone(), s.clone()))
        .collect();
    let word_selected = view
        .words
        .as_ref()
        .map(|w| w.sentiment.clone())
        .or_else(|| params.word_sentiment.clone())
        .unwrap_or_default();
    html.push_str(&select("word_sentiment", &word_options, &word_selected));
    html.push_str(&visibility_select("show_words", "Word cloud", vis.words));

    html.push_str("<p><button type=\"submit\">Update</button></p>\n</form>\n</aside>\n");
    html
}
