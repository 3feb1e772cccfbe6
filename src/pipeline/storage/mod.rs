// Pipeline storage: JSON artifacts for the dashboard

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::constants::{METADATA_FILE, ORDERS_FILE};
use crate::error::Result;
use crate::types::{CleanedRecord, Metadata};

/// One file written by the exporter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub bytes: usize,
    /// Hex SHA-256 of the file contents; equal across runs on unchanged input
    pub sha256: String,
}

/// Writes `orders.json` then `metadata.json` into one directory. The two
/// writes are independent: if the second fails the first stays on disk.
pub struct JsonExporter {
    output_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[instrument(skip_all, fields(output_dir = %self.output_dir.display()))]
    pub fn export(&self, records: &[CleanedRecord], metadata: &Metadata) -> Result<Vec<ExportReport>> {
        fs::create_dir_all(&self.output_dir)?;

        let orders = self.write(ORDERS_FILE, serde_json::to_vec(records)?)?;
        info!("Exported {} records to {}", records.len(), orders.path.display());

        let meta = self.write(METADATA_FILE, serde_json::to_vec_pretty(metadata)?)?;
        info!("Exported metadata to {}", meta.path.display());

        Ok(vec![orders, meta])
    }

    fn write(&self, file_name: &str, content: Vec<u8>) -> Result<ExportReport> {
        let path = self.output_dir.join(file_name);
        let sha256 = hex::encode(Sha256::digest(&content));
        fs::write(&path, &content)?;
        Ok(ExportReport {
            path,
            bytes: content.len(),
            sha256,
        })
    }
}
