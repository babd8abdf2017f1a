//! Server-side HTML for the upload page and report fragments

use pulldown_cmark::{html, Event, Parser, Tag};
use reviewlens_dataset::{ClassCounts, Sentiment};
use reviewlens_llm::ThemeSummary;

use crate::workflow::AnalysisReport;

pub const PAGE_TITLE: &str = "🧠 Google Reviews Analyzer (AI-powered)";
pub const SUCCESS_MESSAGE: &str = "CSV loaded successfully!";
pub const CHART_TITLE: &str = "Sentiment Overview";

const CHART_WIDTH: u32 = 400;
const CHART_HEIGHT: u32 = 300;
const PLOT_TOP: u32 = 40;
const PLOT_HEIGHT: u32 = 220;
const BAR_WIDTH: u32 = 100;

/// Escape text for HTML element and attribute content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Heading above each themes section
pub fn section_heading(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "✅ Top Themes in Positive Reviews",
        Sentiment::Negative => "⚠️ Top Themes in Negative Reviews",
    }
}

fn bar_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "green",
        Sentiment::Negative => "red",
    }
}

/// Bar height in pixels, scaled so the larger class fills the plot
pub fn bar_height(count: usize, max: usize) -> u32 {
    if max == 0 {
        return 0;
    }
    ((count as f64 / max as f64) * PLOT_HEIGHT as f64).round() as u32
}

/// Two-bar SVG chart: Positive (green) then Negative (red)
pub fn sentiment_chart(counts: &ClassCounts) -> String {
    let baseline = PLOT_TOP + PLOT_HEIGHT;
    let mut svg = format!(
        "<svg class=\"chart\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" role=\"img\">\
<title>{title}</title>\
<text x=\"{cx}\" y=\"22\" text-anchor=\"middle\" class=\"chart-title\">{title}</text>\
<line x1=\"40\" y1=\"{b}\" x2=\"{x2}\" y2=\"{b}\" stroke=\"#444\"/>",
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        title = CHART_TITLE,
        cx = CHART_WIDTH / 2,
        b = baseline,
        x2 = CHART_WIDTH - 40,
    );

    for (i, sentiment) in [Sentiment::Positive, Sentiment::Negative].into_iter().enumerate() {
        let count = counts.get(sentiment);
        let height = bar_height(count, counts.max());
        let x = 80 + i as u32 * 140;
        let y = baseline - height;
        let center = x + BAR_WIDTH / 2;

        svg.push_str(&format!(
            "<rect data-label=\"{label}\" data-count=\"{count}\" x=\"{x}\" y=\"{y}\" width=\"{bw}\" height=\"{height}\" fill=\"{color}\"/>\
<text x=\"{center}\" y=\"{ty}\" text-anchor=\"middle\">{count}</text>\
<text x=\"{center}\" y=\"{ly}\" text-anchor=\"middle\">{label}</text>",
            label = sentiment.title(),
            bw = BAR_WIDTH,
            color = bar_color(sentiment),
            ty = y.saturating_sub(6),
            ly = baseline + 20,
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Render model-written markdown
///
/// Raw HTML is shown as text and links or images keep only their text.
pub fn markdown_html(text: &str) -> String {
    let events = Parser::new(text).filter_map(|event| match event {
        Event::Html(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link(..) | Tag::Image(..)) => None,
        Event::End(Tag::Link(..) | Tag::Image(..)) => None,
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

fn themes_block(summary: &ThemeSummary) -> String {
    match summary {
        ThemeSummary::Themes { text } => {
            format!("<div class=\"themes\">{}</div>", markdown_html(text))
        }
        ThemeSummary::Failed { .. } => format!(
            "<div class=\"themes error\">{}</div>",
            escape_html(&summary.display_text())
        ),
    }
}

/// Report fragment shown after a successful upload
pub fn report_fragment(report: &AnalysisReport) -> String {
    let mut html = format!("<div class=\"banner success\">{}</div>", SUCCESS_MESSAGE);

    if report.skipped_rows > 0 {
        html.push_str(&format!(
            "<div class=\"banner info\">{} of {} row(s) skipped: class was not 0 or 1.</div>",
            report.skipped_rows, report.total_rows
        ));
    }

    html.push_str(&format!("<h2>📊 {}</h2>", CHART_TITLE));
    html.push_str(&sentiment_chart(&report.counts));

    for sentiment in [Sentiment::Positive, Sentiment::Negative] {
        html.push_str(&format!("<h2>{}</h2>", section_heading(sentiment)));
        html.push_str(&themes_block(report.themes(sentiment)));
    }

    html
}

/// Single banner shown when an upload is rejected
pub fn error_fragment(message: &str) -> String {
    format!("<div class=\"banner error\">{}</div>", escape_html(message))
}

/// Upload page
pub fn index_page() -> String {
    INDEX_TEMPLATE.replace("{{title}}", &escape_html(PAGE_TITLE))
}

const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #222; }
  .banner { padding: 0.75rem 1rem; border-radius: 6px; margin: 1rem 0; }
  .banner.success { background: #e6f4ea; color: #1e6b34; }
  .banner.error { background: #fdecea; color: #a4262c; }
  .banner.info { background: #e8f0fe; color: #1a4a8f; }
  .themes { background: #fafafa; border: 1px solid #eee; border-radius: 6px; padding: 0.75rem 1rem; }
  .themes ul { margin: 0; padding-left: 1.25rem; }
  .themes.error { color: #a4262c; white-space: pre-wrap; }
  .chart-title { font-weight: 600; }
  #spinner { display: flex; align-items: center; gap: 0.5rem; margin: 1rem 0; }
  #spinner[hidden] { display: none; }
  .dot { width: 1rem; height: 1rem; border: 3px solid #ccc; border-top-color: #555; border-radius: 50%; animation: spin 0.8s linear infinite; }
  @keyframes spin { to { transform: rotate(360deg); } }
</style>
</head>
<body>
<h1>{{title}}</h1>
<form id="upload">
  <label for="file">Upload your reviews CSV</label>
  <input id="file" name="file" type="file" accept=".csv,text/csv">
</form>
<div id="spinner" hidden><span class="dot"></span><span id="spinner-text"></span></div>
<div id="result"></div>
<script>
  const input = document.getElementById('file');
  const result = document.getElementById('result');
  const spinner = document.getElementById('spinner');
  const spinnerText = document.getElementById('spinner-text');

  function newTaskId() {
    if (window.crypto && crypto.randomUUID) return crypto.randomUUID();
    return 'xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx'.replace(/[xy]/g, c => {
      const r = Math.random() * 16 | 0;
      return (c === 'x' ? r : (r & 0x3 | 0x8)).toString(16);
    });
  }

  input.addEventListener('change', async () => {
    if (!input.files.length) return;
    const data = new FormData();
    data.append('file', input.files[0]);
    const taskId = newTaskId();
    result.innerHTML = '';
    spinnerText.textContent = 'Uploading...';
    spinner.hidden = false;

    const poll = setInterval(async () => {
      try {
        const response = await fetch('/progress/' + taskId);
        if (!response.ok) return;
        const task = await response.json();
        if (task.status === 'Running') spinnerText.textContent = task.message;
      } catch (_) {}
    }, 500);

    try {
      const response = await fetch('/analyze', {
        method: 'POST',
        headers: { 'X-Task-Id': taskId },
        body: data,
      });
      result.innerHTML = await response.text();
    } catch (e) {
      result.textContent = 'Error: ' + e;
    } finally {
      clearInterval(poll);
      spinner.hidden = true;
    }
  });
</script>
</body>
</html>
"##;
