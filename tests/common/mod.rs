//! Shared workbook fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use rab_efficiency::io::workbook::{Cell, Sheet, Workbook};

pub const CABLE_2X70: &str = "NFA2X-T 2x70+N70mm²";
pub const CABLE_3X70: &str = "NFA2X-T 3x70+N70mm²";

/// Gambar headers including every optional column.
pub const GAMBAR_HEADERS: &[&str] = &[
    "Nama Lokasi",
    "Jenis Kabel",
    "Panjang Jaringan (m)",
    "Beban Total (kVA)",
    "Tegangan (V)",
    "Tipe Phase",
    "Daya Trafo (kVA)",
    "Baseline Losses (kW)",
];

/// One Gambar row in [`GAMBAR_HEADERS`] order.
pub struct Location {
    pub name: &'static str,
    pub cable: &'static str,
    pub length_m: f64,
    pub load_kva: f64,
    pub voltage_v: f64,
    pub phase: &'static str,
    pub rated_kva: Option<f64>,
    pub baseline_kw: f64,
}

impl Location {
    /// 100 kVA, 380 V, 500 m, three-phase, 160 kVA transformer.
    pub fn standard(name: &'static str) -> Self {
        Self {
            name,
            cable: CABLE_2X70,
            length_m: 500.0,
            load_kva: 100.0,
            voltage_v: 380.0,
            phase: "3 Phase",
            rated_kva: Some(160.0),
            baseline_kw: 10.0,
        }
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.name.to_string()),
            Cell::Text(self.cable.to_string()),
            Cell::Number(self.length_m),
            Cell::Number(self.load_kva),
            Cell::Number(self.voltage_v),
            Cell::Text(self.phase.to_string()),
            self.rated_kva.map_or(Cell::Empty, Cell::Number),
            Cell::Number(self.baseline_kw),
        ]
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| h.to_string()).collect()
}

/// RAB sheet with one `Total (Rp)` row per cost.
pub fn rab_sheet(costs: &[f64]) -> Sheet {
    Sheet::new(
        "RAB",
        headers(&["Uraian", "Total (Rp)"]),
        costs
            .iter()
            .enumerate()
            .map(|(i, c)| vec![Cell::Text(format!("Item {}", i + 1)), Cell::Number(*c)])
            .collect(),
    )
}

/// Gambar sheet with every optional column.
pub fn gambar_sheet(locations: &[Location]) -> Sheet {
    Sheet::new(
        "Gambar",
        headers(GAMBAR_HEADERS),
        locations.iter().map(Location::cells).collect(),
    )
}

/// Workbook with both sheets.
pub fn workbook(costs: &[f64], locations: &[Location]) -> Workbook {
    Workbook::new(vec![rab_sheet(costs), gambar_sheet(locations)])
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rab-efficiency-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Writes `RAB.csv` and `Gambar.csv` for a small two-location project.
pub fn write_csv_workbook(dir: &std::path::Path) {
    std::fs::write(
        dir.join("RAB.csv"),
        "Uraian,Total (Rp)\nTiang,60000000\nKabel,40000000\n",
    )
    .expect("write RAB.csv");
    std::fs::write(
        dir.join("Gambar.csv"),
        format!(
            "Nama Lokasi,Jenis Kabel,Panjang Jaringan (m),Beban Total (kVA),Tegangan (V),Tipe Phase,Daya Trafo (kVA),Baseline Losses (kW)\n\
             Gardu A,{CABLE_2X70},500,100,380,3 Phase,160,10\n\
             Gardu B,{CABLE_3X70},300,50,220,1 Phase,,4\n"
        ),
    )
    .expect("write Gambar.csv");
}
