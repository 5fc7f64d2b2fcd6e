//! Output formatters for normalization reports

use crate::config::OutputFormat;
use crate::error::{Result, SkillNormalizerError};
use crate::normalizer::{MatchOutcome, MatchResult};
use crate::output::report::NormalizationReport;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting normalization reports
pub trait OutputFormatter {
    fn format_report(&self, report: &NormalizationReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors and per-mention detail
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for review documents
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter for manual accept/reject review
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// Flattened view of one result shared by the text formatters
struct ResultRow {
    label: String,
    status: &'static str,
    target: String,
    strategy: String,
    score: String,
    proficiency: u8,
}

impl ResultRow {
    fn from_result(result: &MatchResult) -> Self {
        match &result.outcome {
            MatchOutcome::Matched {
                reference_id,
                canonical_name,
                sector,
                proficiency,
                strategy,
                similarity_score,
            } => Self {
                label: result.input_label.clone(),
                status: "matched",
                target: format!("{} [{}] ({})", canonical_name, reference_id, sector),
                strategy: strategy.to_string(),
                score: similarity_score
                    .map(|s| format!("{:.3}", s))
                    .unwrap_or_else(|| "-".to_string()),
                proficiency: *proficiency,
            },
            MatchOutcome::Unmatched { proficiency, .. } => Self {
                label: result.input_label.clone(),
                status: "unmatched",
                target: "suggested for addition".to_string(),
                strategy: "-".to_string(),
                score: "-".to_string(),
                proficiency: *proficiency,
            },
        }
    }
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Skill Normalization Report</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 900px; margin: 0 auto; padding: 20px; color: #333; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border-bottom: 1px solid #ddd; padding: 6px 10px; text-align: left; }
        .matched { color: #1e7e34; }
        .unmatched { color: #b02a37; }
        .metadata { margin-top: 30px; font-size: 0.85em; color: #666; }
    </style>
    {% endif %}
</head>
<body>
    <h1>Skill Normalization Report</h1>
    <p><strong>{{ matched }}</strong> of <strong>{{ total }}</strong> mentions matched ({{ match_rate }}%):
       {{ exact }} exact, {{ alias }} alias, {{ fuzzy }} fuzzy.</p>
    <table>
        <tr><th>Mention</th><th>Status</th><th>Skill</th><th>Strategy</th><th>Score</th><th>Proficiency</th></tr>
        {% for row in rows %}
        <tr class="{{ row.status }}"><td>{{ row.label }}</td><td>{{ row.status }}</td><td>{{ row.target }}</td><td>{{ row.strategy }}</td><td>{{ row.score }}</td><td>{{ row.proficiency }}</td></tr>
        {% endfor %}
    </table>
    {% if !suggestions.is_empty() %}
    <h2>Suggested additions</h2>
    <ul>
        {% for label in suggestions %}
        <li>{{ label }}</li>
        {% endfor %}
    </ul>
    {% endif %}
    <div class="metadata">
        <p>Generated {{ generated_at }} by skill-normalizer v{{ version }} (threshold {{ threshold }})</p>
        <p>Mentions: {{ mentions_source }} | Vocabulary: {{ vocabulary_source }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    total: usize,
    matched: usize,
    match_rate: u8,
    exact: usize,
    alias: usize,
    fuzzy: usize,
    rows: Vec<ResultRow>,
    suggestions: Vec<String>,
    generated_at: String,
    version: String,
    threshold: String,
    mentions_source: String,
    vocabulary_source: String,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".blue().bold(), title.blue().bold())
        } else {
            format!("\n{} {}\n", "█", title)
        }
    }

    fn format_rate_badge(&self, percentage: u8) -> String {
        let (badge, color) = match percentage {
            90..=100 => ("EXCELLENT", Color::Green),
            70..=89 => ("GOOD", Color::Yellow),
            50..=69 => ("FAIR", Color::BrightYellow),
            _ => ("LOW", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &NormalizationReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;

        output.push_str(&self.format_header("SKILL NORMALIZATION"));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Matched {}/{} ({}%) {}\n",
            summary.matched,
            summary.total,
            report.match_rate_percentage(),
            self.format_rate_badge(report.match_rate_percentage())
        ));
        output.push_str(&format!(
            "  exact: {}  alias: {}  fuzzy: {}  unmatched: {}\n",
            summary.exact, summary.alias, summary.fuzzy, summary.unmatched
        ));

        output.push_str(&self.format_header("Results"));
        for result in &report.results {
            let row = ResultRow::from_result(result);
            if result.is_matched() {
                output.push_str(&format!(
                    "{} {} -> {}",
                    self.colorize("✔", Color::Green),
                    row.label,
                    self.colorize(&row.target, Color::Cyan)
                ));
                if self.detailed {
                    output.push_str(&format!(
                        " | {} | score {} | proficiency {}",
                        row.strategy, row.score, row.proficiency
                    ));
                }
            } else {
                output.push_str(&format!(
                    "{} {} ({})",
                    self.colorize("✘", Color::Red),
                    row.label,
                    row.target
                ));
                if self.detailed {
                    output.push_str(&format!(" | proficiency {}", row.proficiency));
                }
            }
            output.push('\n');
        }

        if !report.suggested_additions.is_empty() {
            output.push_str(&self.format_header("Suggested additions"));
            for suggestion in &report.suggested_additions {
                output.push_str(&format!("  • {}\n", suggestion.label));
            }
        }

        if self.detailed {
            output.push_str(&format!(
                "\nVocabulary: {} ({} entries) | Aliases: {} | Threshold: {:.2}\n",
                report.metadata.vocabulary_source,
                report.metadata.vocabulary_size,
                report.metadata.alias_count,
                report.metadata.fuzzy_threshold
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &NormalizationReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &NormalizationReport) -> Result<String> {
        let mut output = String::from("# Skill Normalization Report\n\n");
        let summary = &report.summary;

        output.push_str(&format!(
            "**{}** of **{}** mentions matched ({}%): {} exact, {} alias, {} fuzzy.\n\n",
            summary.matched,
            summary.total,
            report.match_rate_percentage(),
            summary.exact,
            summary.alias,
            summary.fuzzy
        ));

        output.push_str("| Mention | Status | Skill | Strategy | Score | Proficiency |\n");
        output.push_str("|---|---|---|---|---|---|\n");
        for result in &report.results {
            let row = ResultRow::from_result(result);
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                escape_cell(&row.label),
                row.status,
                escape_cell(&row.target),
                row.strategy,
                row.score,
                row.proficiency
            ));
        }

        if !report.suggested_additions.is_empty() {
            output.push_str("\n## Suggested additions\n\n");
            for suggestion in &report.suggested_additions {
                output.push_str(&format!("- {}\n", suggestion.label));
            }
        }

        if self.include_metadata {
            let meta = &report.metadata;
            output.push_str(&format!(
                "\n---\n_Generated {} by skill-normalizer v{} from `{}` against `{}` (threshold {:.2})._\n",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                meta.normalizer_version,
                meta.mentions_source,
                meta.vocabulary_source,
                meta.fuzzy_threshold
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &NormalizationReport) -> HtmlTemplate {
        let meta = &report.metadata;
        HtmlTemplate {
            include_styles: self.include_styles,
            total: report.summary.total,
            matched: report.summary.matched,
            match_rate: report.match_rate_percentage(),
            exact: report.summary.exact,
            alias: report.summary.alias,
            fuzzy: report.summary.fuzzy,
            rows: report.results.iter().map(ResultRow::from_result).collect(),
            suggestions: report
                .suggested_additions
                .iter()
                .map(|s| s.label.clone())
                .collect(),
            generated_at: meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            version: meta.normalizer_version.clone(),
            threshold: format!("{:.2}", meta.fuzzy_threshold),
            mentions_source: meta.mentions_source.clone(),
            vocabulary_source: meta.vocabulary_source.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &NormalizationReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| SkillNormalizerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &NormalizationReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}
