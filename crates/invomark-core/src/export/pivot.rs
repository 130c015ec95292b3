use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::InvoiceRecord;

/// Sum of EUR values by date (rows) and file name (columns).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotTable {
    /// Sorted row labels.
    pub dates: Vec<String>,
    /// Sorted column labels.
    pub file_names: Vec<String>,
    /// `cells[row][column]`, zero where a file has no value for a date.
    pub cells: Vec<Vec<Decimal>>,
    /// Row sums.
    pub totals: Vec<Decimal>,
}

/// Build the pivot. Records without an EUR value are left out.
pub fn pivot_by_date(records: &[InvoiceRecord]) -> PivotTable {
    let mut sums: BTreeMap<String, BTreeMap<&str, Decimal>> = BTreeMap::new();
    let mut file_names = BTreeSet::new();

    for record in records {
        let Some(value) = record.value_in_eur else {
            continue;
        };
        file_names.insert(record.file_name.as_str());
        *sums
            .entry(record.date.to_string())
            .or_default()
            .entry(record.file_name.as_str())
            .or_default() += value;
    }

    let file_names: Vec<&str> = file_names.into_iter().collect();
    let mut table = PivotTable {
        file_names: file_names.iter().map(|f| f.to_string()).collect(),
        ..Default::default()
    };
    for (date, by_file) in sums {
        let row: Vec<Decimal> = file_names
            .iter()
            .map(|f| by_file.get(f).copied().unwrap_or(Decimal::ZERO))
            .collect();
        table.totals.push(row.iter().sum());
        table.cells.push(row);
        table.dates.push(date);
    }
    table
}
