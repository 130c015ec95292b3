use invomark_core::document::pdftotext::PdftotextLoader;
use invomark_core::error::InvomarkError;
use invomark_core::export::export_records;
use invomark_core::extract_invoices;
use invomark_core::fields::load_field_config;
use std::path::PathBuf;
use tracing::warn;

use crate::output;

pub fn run(
    pdf_dir: PathBuf,
    config_file: PathBuf,
    output_dir: PathBuf,
    output_format: &str,
) -> Result<(), InvomarkError> {
    let config = load_field_config(&config_file)?;
    if !PdftotextLoader::is_available() {
        return Err(InvomarkError::PdftotextNotFound);
    }

    let loader = PdftotextLoader::new();
    let records = extract_invoices(&pdf_dir, &config, &loader)?;
    if records.is_empty() {
        warn!(dir = %pdf_dir.display(), "no data extracted");
        return Ok(());
    }

    let paths = export_records(&records, &output_dir)?;

    match output_format {
        "json" => output::json::print(&records)?,
        _ => output::table::print_records(&records),
    }
    eprintln!(
        "{} invoice(s) written to {} and {}",
        records.len(),
        paths.xlsx.display(),
        paths.csv.display()
    );
    Ok(())
}
