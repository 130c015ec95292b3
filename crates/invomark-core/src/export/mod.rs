pub mod csv;
pub mod pivot;
pub mod xlsx;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::InvomarkError;
use crate::model::InvoiceRecord;

pub const XLSX_FILE_NAME: &str = "output.xlsx";
pub const CSV_FILE_NAME: &str = "output.csv";

/// Files written by [`export_records`].
#[derive(Debug, Clone, Serialize)]
pub struct ExportPaths {
    pub xlsx: PathBuf,
    pub csv: PathBuf,
}

/// Write `output.xlsx` and `output.csv` into `dir`, creating it if needed.
pub fn export_records(records: &[InvoiceRecord], dir: &Path) -> Result<ExportPaths, InvomarkError> {
    std::fs::create_dir_all(dir)?;
    let paths = ExportPaths {
        xlsx: dir.join(XLSX_FILE_NAME),
        csv: dir.join(CSV_FILE_NAME),
    };

    xlsx::write_xlsx(records, File::create(&paths.xlsx)?)?;
    csv::write_csv(records, BufWriter::new(File::create(&paths.csv)?))?;

    info!(
        xlsx = %paths.xlsx.display(),
        csv = %paths.csv.display(),
        records = records.len(),
        "exported"
    );
    Ok(paths)
}
