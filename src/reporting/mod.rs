pub mod aggregator;
pub mod assembler;
pub mod formatter;
pub mod table;

pub use aggregator::{issue_rows, to_report_fragment};
pub use assembler::ReportAssembler;
pub use formatter::render_summary;
pub use table::make_table;
