use std::io::Write;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::columns::{self, ActivityKind, ColumnIndex};
use crate::error::{OflightError, Result};
use crate::models::{CandidateRecord, ScoredRecord};

fn candidate_from_row(index: &ColumnIndex, row: &StringRecord) -> CandidateRecord {
    let field = |name: &str| index.cell(row, name).trim().to_string();
    CandidateRecord {
        cap_id: field(columns::CAP_ID),
        full_name: field(columns::FULL_NAME),
        eighteen_plus: field(columns::EIGHTEEN_PLUS),
        wing: field(columns::WING),
        unit: field(columns::UNIT),
        group_type: field(columns::GROUP_TYPE),
        joined: field(columns::JOINED),
        glider: index.slots(row, ActivityKind::Glider),
        powered: index.slots(row, ActivityKind::Powered),
    }
}

/// Reads the raw orientation report. Fails before reading any rows when a
/// required column is missing.
pub fn read_report(path: &Path) -> Result<Vec<CandidateRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let index = columns::normalize_report_headers(reader.headers()?)?;

    let mut candidates = Vec::new();
    for result in reader.records() {
        let row = result?;
        candidates.push(candidate_from_row(&index, &row));
    }
    Ok(candidates)
}

/// One row of `oflight_points.csv`. Only the identifier, count and total are
/// needed to slot; everything else defaults when a hand-edited table drops it.
#[derive(Debug, Serialize, Deserialize)]
struct ScoredRow {
    #[serde(rename = "CAPID")]
    cap_id: String,
    #[serde(rename = "FullName")]
    full_name: String,
    #[serde(rename = "18+", default)]
    eighteen_plus: String,
    #[serde(rename = "Wing", default)]
    wing: String,
    #[serde(rename = "Unit", default)]
    unit: String,
    #[serde(rename = "GroupType", default)]
    group_type: String,
    #[serde(rename = "Joined", default)]
    joined: String,
    #[serde(default)]
    glider_1: Option<String>,
    #[serde(default)]
    glider_2: Option<String>,
    #[serde(default)]
    glider_3: Option<String>,
    #[serde(default)]
    glider_4: Option<String>,
    #[serde(default)]
    glider_5: Option<String>,
    #[serde(default)]
    powered_1: Option<String>,
    #[serde(default)]
    powered_2: Option<String>,
    #[serde(default)]
    powered_3: Option<String>,
    #[serde(default)]
    powered_4: Option<String>,
    #[serde(default)]
    powered_5: Option<String>,
    powered_count: usize,
    #[serde(default)]
    last_powered: String,
    #[serde(default)]
    flight_points: Option<i64>,
    #[serde(default)]
    date_points: Option<i64>,
    total_points: i64,
}

/// Header of the scored table, in `ScoredRow` field order.
const SCORED_COLUMNS: [&str; 22] = [
    columns::CAP_ID,
    columns::FULL_NAME,
    columns::EIGHTEEN_PLUS,
    columns::WING,
    columns::UNIT,
    columns::GROUP_TYPE,
    columns::JOINED,
    "glider_1",
    "glider_2",
    "glider_3",
    "glider_4",
    "glider_5",
    "powered_1",
    "powered_2",
    "powered_3",
    "powered_4",
    "powered_5",
    columns::POWERED_COUNT,
    "last_powered",
    "flight_points",
    "date_points",
    columns::TOTAL_POINTS,
];

impl From<&ScoredRecord> for ScoredRow {
    fn from(record: &ScoredRecord) -> Self {
        let candidate = record.candidate.clone();
        let [glider_1, glider_2, glider_3, glider_4, glider_5] = candidate.glider;
        let [powered_1, powered_2, powered_3, powered_4, powered_5] = candidate.powered;
        Self {
            cap_id: candidate.cap_id,
            full_name: candidate.full_name,
            eighteen_plus: candidate.eighteen_plus,
            wing: candidate.wing,
            unit: candidate.unit,
            group_type: candidate.group_type,
            joined: candidate.joined,
            glider_1,
            glider_2,
            glider_3,
            glider_4,
            glider_5,
            powered_1,
            powered_2,
            powered_3,
            powered_4,
            powered_5,
            powered_count: record.powered_count,
            last_powered: record.last_powered.clone(),
            flight_points: Some(record.flight_points),
            date_points: Some(record.date_points),
            total_points: record.total_points,
        }
    }
}

impl From<ScoredRow> for ScoredRecord {
    fn from(row: ScoredRow) -> Self {
        ScoredRecord {
            candidate: CandidateRecord {
                cap_id: row.cap_id,
                full_name: row.full_name,
                eighteen_plus: row.eighteen_plus,
                wing: row.wing,
                unit: row.unit,
                group_type: row.group_type,
                joined: row.joined,
                glider: [row.glider_1, row.glider_2, row.glider_3, row.glider_4, row.glider_5],
                powered: [
                    row.powered_1,
                    row.powered_2,
                    row.powered_3,
                    row.powered_4,
                    row.powered_5,
                ],
            },
            powered_count: row.powered_count,
            last_powered: row.last_powered,
            flight_points: row.flight_points.unwrap_or_default(),
            date_points: row.date_points.unwrap_or_default(),
            total_points: row.total_points,
        }
    }
}

/// Reads a scored table back in, keeping its row order.
pub fn read_scored(path: &Path) -> Result<Vec<ScoredRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    columns::index_headers(
        reader.headers()?,
        &[
            columns::CAP_ID,
            columns::FULL_NAME,
            columns::POWERED_COUNT,
            columns::TOTAL_POINTS,
        ],
    )?;

    let mut records = Vec::new();
    for result in reader.deserialize::<ScoredRow>() {
        records.push(ScoredRecord::from(result?));
    }
    Ok(records)
}

/// Renders the scored table in rank order. The header is written even when
/// there are no rows, so an empty run still produces a readable table.
pub fn scored_csv(records: &[ScoredRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(SCORED_COLUMNS)?;

    for record in records {
        writer.serialize(ScoredRow::from(record))?;
    }

    writer
        .into_inner()
        .map_err(|err| OflightError::Io(err.into_error()))
}

/// Replaces `path` with `contents` via a sibling temp file, so a failed write
/// leaves any previous output untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let wrap = |source| OflightError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(wrap)?;
    file.write_all(contents).map_err(wrap)?;
    file.flush().map_err(wrap)?;
    file.persist(path).map_err(|err| wrap(err.error))?;
    Ok(())
}

pub fn write_scored(path: &Path, records: &[ScoredRecord]) -> Result<()> {
    write_atomic(path, &scored_csv(records)?)
}
