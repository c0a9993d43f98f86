//! Maps the E-Services orientation report's legacy headers onto stable names.
//!
//! Everything downstream of [`normalize_report_headers`] looks columns up by
//! their semantic name, so a renamed `Textbox` in the export only touches the
//! table below.

use std::collections::{BTreeSet, HashMap};

use csv::StringRecord;

use crate::error::{OflightError, Result};
use crate::models::ActivitySlots;

pub const CAP_ID: &str = "CAPID";
pub const FULL_NAME: &str = "FullName";
pub const EIGHTEEN_PLUS: &str = "18+";
pub const WING: &str = "Wing";
pub const UNIT: &str = "Unit";
pub const GROUP_TYPE: &str = "GroupType";
pub const JOINED: &str = "Joined";
pub const POWERED_COUNT: &str = "powered_count";
pub const TOTAL_POINTS: &str = "total_points";

/// Legacy report header → semantic name.
const LEGACY_COLUMNS: [(&str, &str); 13] = [
    ("Miles", EIGHTEEN_PLUS),
    ("Textbox39", WING),
    ("Textbox25", UNIT),
    ("Textbox130", "glider_1"),
    ("Textbox131", "glider_2"),
    ("Textbox132", "glider_3"),
    ("Textbox133", "glider_4"),
    ("Textbox134", "glider_5"),
    ("Textbox135", "powered_1"),
    ("Textbox136", "powered_2"),
    ("Textbox137", "powered_3"),
    ("Textbox138", "powered_4"),
    ("Textbox139", "powered_5"),
];

/// Glider columns are not scored, so only the powered slots are required.
const REQUIRED_REPORT_COLUMNS: [&str; 12] = [
    "Miles",
    "Textbox39",
    "Textbox25",
    GROUP_TYPE,
    JOINED,
    CAP_ID,
    FULL_NAME,
    "Textbox135",
    "Textbox136",
    "Textbox137",
    "Textbox138",
    "Textbox139",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Glider,
    Powered,
}

impl ActivityKind {
    fn prefix(self) -> &'static str {
        match self {
            ActivityKind::Glider => "glider",
            ActivityKind::Powered => "powered",
        }
    }

    /// Column name for ordinal slot `1..=5`.
    pub fn column(self, ordinal: usize) -> String {
        format!("{}_{}", self.prefix(), ordinal)
    }
}

fn semantic_name(header: &str) -> &str {
    LEGACY_COLUMNS
        .iter()
        .find(|(legacy, _)| *legacy == header)
        .map(|(_, semantic)| *semantic)
        .unwrap_or(header)
}

/// Header positions keyed by column name. Absent columns read as empty cells.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn from_names<'a>(names: impl Iterator<Item = &'a str>) -> Self {
        let mut positions = HashMap::new();
        for (position, name) in names.enumerate() {
            positions.entry(name.to_string()).or_insert(position);
        }
        Self { positions }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn cell<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.positions
            .get(name)
            .and_then(|position| record.get(*position))
            .unwrap_or("")
    }

    pub fn slots(&self, record: &StringRecord, kind: ActivityKind) -> ActivitySlots {
        std::array::from_fn(|i| {
            let value = self.cell(record, &kind.column(i + 1));
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    fn require(&self, required: &[&str]) -> Result<()> {
        let missing: BTreeSet<String> = required
            .iter()
            .filter(|name| !self.contains(name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(OflightError::Schema {
                missing: missing.into_iter().collect(),
            })
        }
    }
}

/// Validates the raw report header and indexes it under semantic names.
///
/// A header already carrying its semantic name (`Wing`, `powered_3`, ...)
/// satisfies the legacy requirement, so a previously scored export can be fed
/// back in.
pub fn normalize_report_headers(headers: &StringRecord) -> Result<ColumnIndex> {
    let present: BTreeSet<&str> = headers.iter().map(str::trim).collect();
    let mut missing: Vec<String> = REQUIRED_REPORT_COLUMNS
        .iter()
        .filter(|name| !present.contains(*name) && !present.contains(semantic_name(name)))
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        missing.sort();
        return Err(OflightError::Schema { missing });
    }

    Ok(ColumnIndex::from_names(
        headers.iter().map(|header| semantic_name(header.trim())),
    ))
}

/// Indexes an already-normalized table, requiring the given columns.
pub fn index_headers(headers: &StringRecord, required: &[&str]) -> Result<ColumnIndex> {
    let index = ColumnIndex::from_names(headers.iter().map(str::trim));
    index.require(required)?;
    Ok(index)
}
