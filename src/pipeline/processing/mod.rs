// Pipeline processing: header reconciliation, merging, cleaning, and aggregation

pub mod clean;
pub mod merge;
pub mod metadata;
pub mod normalize;

pub use clean::{CleanStats, Cleaner};
pub use merge::merge;
pub use metadata::build_metadata;
pub use normalize::{normalize_sheet, ColumnMapping};
