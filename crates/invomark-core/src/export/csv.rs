use std::io::Write;

use crate::error::InvomarkError;
use crate::model::InvoiceRecord;

const SEPARATOR: char = ';';

/// Write records as `;`-separated CSV with a header row.
pub fn write_csv<W: Write>(records: &[InvoiceRecord], mut out: W) -> Result<(), InvomarkError> {
    let header: Vec<String> = InvoiceRecord::COLUMNS.iter().map(|c| quote(c)).collect();
    writeln!(out, "{}", header.join(&SEPARATOR.to_string()))?;

    for record in records {
        let fields = [
            quote(&record.file_name),
            quote(&record.date.to_string()),
            quote(&record.original_value.to_string()),
            record
                .value_in_eur
                .map(|v| format!("{:.2}", v.round_dp(2)))
                .unwrap_or_default(),
        ];
        writeln!(out, "{}", fields.join(&SEPARATOR.to_string()))?;
    }
    out.flush()?;
    Ok(())
}

fn quote(field: &str) -> String {
    if field.contains([SEPARATOR, '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
