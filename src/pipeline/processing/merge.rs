use tracing::info;

use crate::error::{ConvertError, Result};
use crate::types::CanonicalRow;

/// Concatenate per-sheet rows in sheet order. Duplicates are kept; an empty
/// result means nothing usable was loaded and the run cannot continue.
pub fn merge(per_sheet: Vec<Vec<CanonicalRow>>) -> Result<Vec<CanonicalRow>> {
    let merged: Vec<CanonicalRow> = per_sheet.into_iter().flatten().collect();
    if merged.is_empty() {
        return Err(ConvertError::NoData);
    }
    info!("Total records loaded: {}", merged.len());
    Ok(merged)
}
