//! CSV export of the enriched location table.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::types::EnrichedRecord;

/// Column header for the exported table.
pub const HEADER: &[&str] = &[
    "Nama Lokasi",
    "Jenis Kabel",
    "Tipe Phase",
    "Panjang Jaringan (m)",
    "Beban Total (kVA)",
    "Tegangan (V)",
    "Daya Trafo (kVA)",
    "Rugi Trafo (kW)",
    "Baseline Losses (kW)",
    "Losses Konduktor (kW)",
    "Losses Total (kW)",
    "Penghematan Losses (kW)",
    "Efisiensi (%)",
    "Manfaat (Rp/tahun)",
    "Rekomendasi Kabel",
];

/// Formats a number with `,` thousands separators and fixed decimals.
///
/// `group_thousands(19710000.0, 2) == "19,710,000.00"`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Parses a number written with optional thousands separators.
pub fn parse_grouped(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse().ok()
}

/// Exports enriched records to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv<'a>(
    records: impl IntoIterator<Item = &'a EnrichedRecord>,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes enriched records as CSV to any writer.
///
/// Numeric columns use two decimals; the benefit column adds thousands
/// separators. Output is deterministic for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv<'a>(
    records: impl IntoIterator<Item = &'a EnrichedRecord>,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER)?;

    for r in records {
        wtr.write_record(&[
            r.name.clone(),
            r.cable_type.clone(),
            r.phase.label().to_string(),
            format!("{:.2}", r.length_m),
            format!("{:.2}", r.load_kva),
            format!("{:.2}", r.voltage_v),
            r.transformer_rated_kva
                .map(|v| format!("{v:.2}"))
                .unwrap_or_default(),
            format!("{:.2}", r.transformer_loss_kw),
            format!("{:.2}", r.baseline_losses_kw),
            format!("{:.2}", r.conductor_loss_kw),
            format!("{:.2}", r.total_loss_kw),
            format!("{:.2}", r.loss_savings_kw),
            format!("{:.2}", r.efficiency_pct),
            group_thousands(r.annual_benefit, 2),
            r.recommended_cable.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row read back from an exported CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedRow {
    pub name: String,
    pub cable_type: String,
    pub phase: String,
    pub length_m: f64,
    pub load_kva: f64,
    pub voltage_v: f64,
    pub transformer_rated_kva: Option<f64>,
    pub transformer_loss_kw: f64,
    pub baseline_losses_kw: f64,
    pub conductor_loss_kw: f64,
    pub total_loss_kw: f64,
    pub loss_savings_kw: f64,
    pub efficiency_pct: f64,
    pub annual_benefit: f64,
    pub recommended_cable: String,
}

/// Parses CSV produced by [`write_csv`].
///
/// # Errors
///
/// Returns an `io::Error` with kind `InvalidData` if the header differs or a
/// numeric field does not parse.
pub fn parse_exported_csv(reader: impl io::Read) -> io::Result<Vec<ExportedRow>> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(invalid("unexpected header row".to_string()));
    }

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let rec = record?;
        let num = |i: usize| -> io::Result<f64> {
            parse_grouped(&rec[i])
                .ok_or_else(|| invalid(format!("row {}: \"{}\" is not numeric", line + 2, &rec[i])))
        };
        rows.push(ExportedRow {
            name: rec[0].to_string(),
            cable_type: rec[1].to_string(),
            phase: rec[2].to_string(),
            length_m: num(3)?,
            load_kva: num(4)?,
            voltage_v: num(5)?,
            transformer_rated_kva: if rec[6].is_empty() {
                None
            } else {
                Some(num(6)?)
            },
            transformer_loss_kw: num(7)?,
            baseline_losses_kw: num(8)?,
            conductor_loss_kw: num(9)?,
            total_loss_kw: num(10)?,
            loss_savings_kw: num(11)?,
            efficiency_pct: num(12)?,
            annual_benefit: num(13)?,
            recommended_cable: rec[14].to_string(),
        });
    }
    Ok(rows)
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
