use std::path::Path;

use tracing::{info, warn};

use crate::document::{DocumentLoader, PdfDocument};
use crate::error::InvomarkError;
use crate::fields::keyword::extract_value_by_keyword;
use crate::fields::schema::{FieldConfig, FileFields, KnownField};
use crate::model::InvoiceRecord;
use crate::normalize::{normalize_currency, normalize_date, NormalizedAmount, NormalizedDate};

/// Read the configured fields of one open invoice.
///
/// Fields that are not configured or whose keyword is not found come back
/// as `NotFound`.
pub fn extract_invoice(
    doc: &dyn PdfDocument,
    file_name: &str,
    fields: &FileFields,
) -> Result<InvoiceRecord, InvomarkError> {
    let mut date = NormalizedDate::NotFound;
    let mut original_value = NormalizedAmount::NotFound;

    for (field, spec) in fields {
        let Some(kind) = KnownField::from_name(field) else {
            warn!(file = file_name, field = %field, "ignoring unknown field");
            continue;
        };

        let raw = extract_value_by_keyword(doc, &spec.keyword, spec.offset, spec.page)?
            .filter(|v| !v.is_empty());
        let Some(raw) = raw else {
            warn!(
                file = file_name,
                field = %field,
                keyword = %spec.keyword,
                "keyword not found, defaulting to N/A"
            );
            continue;
        };

        match kind {
            KnownField::Date => date = normalize_date(&raw),
            KnownField::Value => original_value = normalize_currency(&raw),
        }
    }

    let value_in_eur = original_value.value_in_eur();
    Ok(InvoiceRecord {
        file_name: file_name.to_string(),
        date,
        original_value,
        value_in_eur,
    })
}

/// Extract a record from every configured PDF in `pdf_dir`, in file name order.
///
/// PDFs without a configuration entry are skipped with a warning. A PDF that
/// cannot be opened or read is logged and skipped.
pub fn extract_invoices(
    pdf_dir: &Path,
    config: &FieldConfig,
    loader: &dyn DocumentLoader,
) -> Result<Vec<InvoiceRecord>, InvomarkError> {
    let pdfs = crate::discover_pdfs(pdf_dir)?;
    info!(dir = %pdf_dir.display(), count = pdfs.len(), "found PDFs");

    let mut records = Vec::new();
    for path in pdfs {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(fields) = config.get(&file_name) else {
            warn!(file = %file_name, "no configuration found, skipping");
            continue;
        };

        let record = loader
            .open(&path)
            .and_then(|doc| extract_invoice(doc.as_ref(), &file_name, fields));
        match record {
            Ok(record) => {
                info!(file = %file_name, date = %record.date, value = %record.original_value, "extracted");
                records.push(record);
            }
            Err(e) => warn!(file = %file_name, error = %e, "skipping unreadable PDF"),
        }
    }
    Ok(records)
}
