use reviewlens_dataset::{ClassCounts, Sentiment};
use reviewlens_server::render::{section_heading, CHART_TITLE, SUCCESS_MESSAGE};
use reviewlens_server::AnalysisReport;

/// Width of the longest bar in characters
const BAR_COLUMNS: usize = 40;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

fn bar(count: usize, max: usize) -> String {
    let width = if max == 0 {
        0
    } else {
        ((count as f64 / max as f64) * BAR_COLUMNS as f64).round() as usize
    };
    "█".repeat(width)
}

/// Text bar chart, Positive (green) above Negative (red)
pub fn render_chart(counts: &ClassCounts, color: bool) -> String {
    let mut out = format!("📊 {}\n", CHART_TITLE);

    for sentiment in [Sentiment::Positive, Sentiment::Negative] {
        let count = counts.get(sentiment);
        let bar = bar(count, counts.max());
        let (start, end) = match (color, sentiment) {
            (false, _) => ("", ""),
            (true, Sentiment::Positive) => (GREEN, RESET),
            (true, Sentiment::Negative) => (RED, RESET),
        };
        out.push_str(&format!(
            "{:<8} | {}{}{} {}\n",
            sentiment.title(),
            start,
            bar,
            end,
            count
        ));
    }

    out
}

/// Full terminal report for a successful upload
pub fn render_report(report: &AnalysisReport, color: bool) -> String {
    let mut out = format!("{}\n", SUCCESS_MESSAGE);

    if report.skipped_rows > 0 {
        out.push_str(&format!(
            "{} of {} row(s) skipped: class was not 0 or 1.\n",
            report.skipped_rows, report.total_rows
        ));
    }

    out.push('\n');
    out.push_str(&render_chart(&report.counts, color));

    for sentiment in [Sentiment::Positive, Sentiment::Negative] {
        out.push_str(&format!(
            "\n{}\n{}\n",
            section_heading(sentiment),
            report.themes(sentiment).display_text().trim_end()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewlens_llm::{CompletionError, ThemeSummary};

    fn sample(skipped_rows: usize) -> AnalysisReport {
        AnalysisReport {
            counts: ClassCounts { positive: 2, negative: 1 },
            positive_themes: ThemeSummary::themes("- Friendly staff\n"),
            negative_themes: ThemeSummary::failed(CompletionError::Authentication(
                "Incorrect API key provided".to_string(),
            )),
            total_rows: 3 + skipped_rows,
            skipped_rows,
            model: "gpt-3.5-turbo".to_string(),
        }
    }

    #[test]
    fn test_chart_scales_bars() {
        let chart = render_chart(&ClassCounts { positive: 2, negative: 1 }, false);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0], "📊 Sentiment Overview");
        assert_eq!(lines[1], format!("Positive | {} 2", "█".repeat(40)));
        assert_eq!(lines[2], format!("Negative | {} 1", "█".repeat(20)));
    }

    #[test]
    fn test_chart_colors() {
        let chart = render_chart(&ClassCounts { positive: 1, negative: 1 }, true);
        assert!(chart.contains(&format!("Positive | {}", GREEN)));
        assert!(chart.contains(&format!("Negative | {}", RED)));
    }

    #[test]
    fn test_empty_counts_render_zero_bars() {
        let chart = render_chart(&ClassCounts::default(), false);
        assert!(chart.contains("Positive |  0"));
        assert!(chart.contains("Negative |  0"));
    }

    #[test]
    fn test_report_sections() {
        let text = render_report(&sample(0), false);

        assert!(text.starts_with("CSV loaded successfully!\n\n📊 Sentiment Overview"));
        assert!(text.contains("✅ Top Themes in Positive Reviews\n- Friendly staff\n"));
        assert!(text.contains(
            "⚠️ Top Themes in Negative Reviews\nError: authentication failed: Incorrect API key provided\n"
        ));
        assert!(!text.contains("skipped"));
    }

    #[test]
    fn test_report_mentions_skipped_rows() {
        let text = render_report(&sample(2), false);
        assert!(text.contains("2 of 5 row(s) skipped"));
    }
}
