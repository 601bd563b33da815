//! Markdown rendering of an analysis report
//!
//! The summary is purely tabular: every value comes straight from the report.

use crate::analysis::{AnalysisOutcome, AnalysisReport};
use crate::extract::MetadataField;

/// Formats an analysis outcome as markdown
pub fn format_markdown_report(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Report(report) => format_report(report),
        AnalysisOutcome::Failed { error } => format!("# Site-Lens Report\n\n**Error**: {}\n", error),
    }
}

fn format_report(report: &AnalysisReport) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Site-Lens Report\n\n");
    md.push_str(&format!("- **URL**: {}\n", report.url));
    md.push_str(&format!("- **Analyzed**: {}\n", report.analyzed_at.to_rfc3339()));
    md.push_str(&format!("- **Schema Version**: {}\n\n", report.schema_version));

    // Page structure
    let metrics = &report.html_metrics;
    md.push_str("## Page Structure\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Title | {} |\n", cell(&metrics.title)));
    md.push_str(&format!(
        "| Description | {} |\n",
        optional_cell(metrics.description.as_deref())
    ));
    md.push_str(&format!(
        "| First H1 | {} |\n",
        optional_cell(metrics.first_h1.as_deref())
    ));
    md.push_str(&format!("| H1 Count | {} |\n", metrics.h1_count));
    md.push_str(&format!("| H2 Count | {} |\n", metrics.h2_count));
    md.push_str(&format!("| Word Count | {} |\n", metrics.word_count));
    md.push_str(&format!("| Links | {} |\n", metrics.link_count));
    md.push_str(&format!("| Images | {} |\n", metrics.image_count));
    md.push_str(&format!(
        "| Images Missing Alt | {} |\n",
        metrics.images_missing_alt
    ));
    md.push_str(&format!(
        "| Language | {} |\n",
        optional_cell(metrics.lang.as_deref())
    ));
    md.push_str(&format!(
        "| Canonical | {} |\n",
        optional_cell(metrics.canonical.as_deref())
    ));
    md.push_str(&format!(
        "| Viewport Meta | {} |\n",
        yes_no(metrics.viewport_present)
    ));
    md.push_str(&format!(
        "| Structured Data Blocks | {} |\n\n",
        metrics.structured_data_count
    ));

    if !metrics.structured_data_types.is_empty() {
        md.push_str(&format!(
            "Structured data types: {}\n\n",
            metrics.structured_data_types.join(", ")
        ));
    }

    // Metadata
    if !report.metadata.is_empty() {
        md.push_str("## Metadata\n\n");
        md.push_str("| Field | Value |\n");
        md.push_str("|-------|-------|\n");
        for field in MetadataField::all() {
            if let Some(value) = report.metadata.get(field) {
                md.push_str(&format!("| {} | {} |\n", field.as_str(), cell(value)));
            }
        }
        md.push('\n');
    }

    // Site signals
    let signals = &report.site_signals;
    md.push_str("## Site Signals\n\n");
    md.push_str(&format!(
        "- **robots.txt**: {}\n",
        if signals.robots_txt_present {
            "present"
        } else {
            "absent"
        }
    ));
    md.push_str(&format!(
        "- **Sitemap**: {}\n",
        signals.sitemap_url.as_deref().unwrap_or("none found")
    ));
    md.push_str(&format!(
        "- **Crawl Allowed**: {}\n\n",
        yes_no(signals.crawl_allowed)
    ));

    // Accessibility
    let accessibility = &report.accessibility;
    md.push_str("## Accessibility\n\n");
    md.push_str(&format!(
        "- **Violations**: {}\n\n",
        accessibility.violation_count
    ));
    if !accessibility.violation_details.is_empty() {
        md.push_str("| Rule | Impact | Nodes | Help |\n");
        md.push_str("|------|--------|-------|------|\n");
        for violation in &accessibility.violation_details {
            md.push_str(&format!(
                "| {} | {} | {} | [{}]({}) |\n",
                violation.id,
                violation.impact.as_deref().unwrap_or("-"),
                violation.node_count,
                cell(&violation.help),
                violation.help_url
            ));
        }
        md.push('\n');
    }

    // Performance
    let performance = &report.performance;
    md.push_str("## Performance\n\n");
    if performance.measured {
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!(
            "| Score | {:.0} |\n",
            performance.performance_score
        ));
        md.push_str(&format!("| LCP | {:.0} ms |\n", performance.lcp));
        md.push_str(&format!("| CLS | {:.3} |\n", performance.cls));
        md.push_str(&format!("| TBT | {:.0} ms |\n\n", performance.tbt));
    } else {
        md.push_str("Not measured.\n\n");
    }

    // Keywords
    if !report.keywords.is_empty() {
        md.push_str("## Keywords\n\n");
        md.push_str(&format!("{}\n\n", report.keywords.join(", ")));
    }

    // Colors
    if !report.colors.palette.is_empty() {
        md.push_str("## Colors\n\n");
        for color in &report.colors.palette {
            md.push_str(&format!("- `{}`\n", color));
        }
        md.push_str(&format!(
            "\nPrimary contrast ratio: {:.2}\n\n",
            report.colors.primary_contrast
        ));
    }

    // Social links
    if !report.social_links.is_empty() {
        md.push_str("## Social Links\n\n");
        for link in &report.social_links {
            md.push_str(&format!("- {}: {}\n", link.network, link.url));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str("*Generated by Site-Lens*\n");

    md
}

/// Escapes pipes and flattens newlines so a value fits in one table cell
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn optional_cell(value: Option<&str>) -> String {
    match value {
        Some("") => "(empty)".to_string(),
        Some(value) => cell(value),
        None => "-".to_string(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
