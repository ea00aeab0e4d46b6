use crate::models::{ScanResult, VulnerabilitySummary};
use super::table::make_table;

pub const ISSUE_HEADING: &str = "# These images have vulnerabilites.\n";
pub const ISSUE_LABELS: [&str; 7] = ["target", "type", "name", "path", "installed", "fixed", "cve"];

/// Flatten every vulnerability record of `result` into issue-table rows,
/// folding each record into `summary` along the way.
pub fn issue_rows(result: &ScanResult, summary: &mut VulnerabilitySummary) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(result.vulnerability_count());

    for group in &result.results {
        for vuln in &group.vulnerabilities {
            summary.upsert(vuln, &group.kind, &result.artifact_name);

            rows.push(vec![
                group.display_target().to_string(),
                group.kind.clone(),
                vuln.pkg_name.clone(),
                vuln.pkg_path_or_placeholder().to_string(),
                vuln.installed_version.clone(),
                vuln.fixed_version_or_empty().to_string(),
                vuln.markdown_link(),
            ]);
        }
    }

    rows
}

/// Turn one scan into issue text. A clean image yields `None` and leaves
/// the summary untouched.
pub fn to_report_fragment(result: &ScanResult, summary: &mut VulnerabilitySummary) -> Option<String> {
    if !result.has_vulnerabilities() {
        return None;
    }

    let rows = issue_rows(result, summary);
    let mut issue = String::from(ISSUE_HEADING);
    issue.push_str(&make_table(&ISSUE_LABELS, &rows));
    Some(issue)
}
