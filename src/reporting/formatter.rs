use crate::models::VulnerabilitySummary;
use super::table::make_table;

pub const SUMMARY_LABELS: [&str; 3] = ["cve", "name", "affected images"];

pub fn summary_rows(summary: &VulnerabilitySummary) -> Vec<Vec<String>> {
    summary
        .entries()
        .iter()
        .map(|entry| vec![
            entry.markdown_link(),
            entry.pkg_name.clone(),
            entry.artifacts.join("<br>"),
        ])
        .collect()
}

/// Cross-image table: one row per vulnerability ID.
pub fn render_summary(summary: &VulnerabilitySummary) -> String {
    make_table(&SUMMARY_LABELS, &summary_rows(summary))
}

/// Section listing images whose scan did not complete.
pub fn format_failures(failures: &[(String, String)]) -> String {
    let rows: Vec<Vec<String>> = failures
        .iter()
        .map(|(image, reason)| vec![image.clone(), reason.clone()])
        .collect();
    format!("## Scan failures\n\n{}", make_table(&["image", "reason"], &rows))
}
