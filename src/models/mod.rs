pub mod scan_result;
pub mod summary;

pub use scan_result::*;
pub use summary::*;
