use invomark_core::model::InvoiceRecord;
use invomark_core::AnnotatedPdf;

pub fn print_annotated(done: &[AnnotatedPdf]) {
    for pdf in done {
        println!("{} -> {}", pdf.input.display(), pdf.output.display());
        println!(
            "  {} line(s) indexed, {} index page(s)",
            pdf.outcome.indexed_lines.len(),
            pdf.outcome.index_pages
        );
    }
}

pub fn print_records(records: &[InvoiceRecord]) {
    let rows: Vec<[String; 4]> = records
        .iter()
        .map(|r| {
            [
                r.file_name.clone(),
                r.date.to_string(),
                r.original_value.to_string(),
                r.value_in_eur
                    .map(|v| format!("{:.2}", v.round_dp(2)))
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = InvoiceRecord::COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header = InvoiceRecord::COLUMNS.map(String::from);
    println!("{}", format_row(&header, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
