/// Render a GitHub-flavoured Markdown table.
///
/// Every line ends with `\n`. Pipes inside cells are escaped and newlines
/// become `<br>` so a cell never breaks the row.
pub fn make_table<S: AsRef<str>>(labels: &[&str], rows: &[Vec<S>]) -> String {
    let mut out = String::new();

    push_row(&mut out, labels.iter().map(|l| escape_cell(l)));
    push_row(&mut out, labels.iter().map(|_| "---".to_string()));
    for row in rows {
        push_row(&mut out, row.iter().map(|c| escape_cell(c.as_ref())));
    }

    out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    out.push('|');
    for cell in cells {
        out.push_str(&cell);
        out.push('|');
    }
    out.push('\n');
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}
