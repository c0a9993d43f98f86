use std::collections::HashSet;
use std::path::Path;

use tracing::error;

use crate::error::{OflightError, Result};
use crate::models::{CandidateList, Placement, ScoredRecord, SlotAssignment};
use crate::scoring;

fn load_candidate_list(path: &Path) -> Result<CandidateList> {
    let content =
        std::fs::read_to_string(path).map_err(|source| OflightError::CandidateListRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(CandidateList::from_lines(content.lines()))
}

/// Reads one CAP ID per line. An unreadable file is logged and yields an empty
/// list so slotting can still run.
pub fn read_candidate_list(path: &Path) -> CandidateList {
    load_candidate_list(path).unwrap_or_else(|err| {
        error!("{:#}, using an empty cadet list", anyhow::Error::from(err));
        CandidateList::default()
    })
}

/// Filters the ranked table to the listed cadets and splits off alternates.
///
/// The split only happens when there are strictly more matches than slots;
/// an exact fit (or a zero slot count) produces one combined list.
pub fn assign_slots(
    ranked: &[ScoredRecord],
    candidates: &CandidateList,
    slot_count: Option<usize>,
) -> SlotAssignment {
    let wanted: HashSet<&str> = candidates.ids().iter().map(String::as_str).collect();
    let mut matched: Vec<ScoredRecord> = ranked
        .iter()
        .filter(|record| wanted.contains(record.cap_id()))
        .cloned()
        .collect();
    scoring::rank(&mut matched);

    let matched_ids: HashSet<&str> = matched.iter().map(ScoredRecord::cap_id).collect();
    let unmatched: Vec<String> = candidates
        .ids()
        .iter()
        .filter(|id| !matched_ids.contains(id.as_str()))
        .cloned()
        .collect();

    let placement = match slot_count {
        Some(slots) if slots > 0 && matched.len() > slots => {
            let alternates = matched.split_off(slots);
            Placement::Split {
                primary: matched,
                alternates,
            }
        }
        _ => Placement::Combined(matched),
    };

    SlotAssignment {
        placement,
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateRecord;

    fn scored(cap_id: &str, total_points: i64) -> ScoredRecord {
        ScoredRecord {
            candidate: CandidateRecord {
                cap_id: cap_id.to_string(),
                full_name: format!("Cadet {cap_id}"),
                ..Default::default()
            },
            powered_count: 0,
            last_powered: "Jan-20".to_string(),
            flight_points: total_points,
            date_points: 0,
            total_points,
        }
    }

    fn ids(records: &[ScoredRecord]) -> Vec<&str> {
        records.iter().map(ScoredRecord::cap_id).collect()
    }

    #[test]
    fn splits_primary_and_alternates() {
        let table = vec![scored("300", 40), scored("400", 35), scored("100", 20)];
        let list = CandidateList::from_lines(["100", "200", "100", "300"]);

        let assignment = assign_slots(&table, &list, Some(1));
        match &assignment.placement {
            Placement::Split {
                primary,
                alternates,
            } => {
                assert_eq!(ids(primary), ["300"]);
                assert_eq!(ids(alternates), ["100"]);
            }
            other => panic!("expected split, got {other:?}"),
        }
        assert_eq!(assignment.unmatched, ["200"]);
        assert_eq!(assignment.matched_count() + assignment.unmatched.len(), list.len());
    }

    #[test]
    fn exact_fit_is_a_single_list() {
        let table = vec![scored("1", 10), scored("2", 5)];
        let list = CandidateList::from_lines(["1", "2"]);
        let assignment = assign_slots(&table, &list, Some(2));
        assert!(matches!(assignment.placement, Placement::Combined(ref all) if all.len() == 2));
    }

    #[test]
    fn missing_or_zero_slot_count_is_a_single_list() {
        let table = vec![scored("1", 10), scored("2", 5)];
        let list = CandidateList::from_lines(["2", "1"]);
        for slot_count in [None, Some(0), Some(5)] {
            let assignment = assign_slots(&table, &list, slot_count);
            match assignment.placement {
                Placement::Combined(all) => assert_eq!(ids(&all), ["1", "2"]),
                other => panic!("expected combined list, got {other:?}"),
            }
        }
    }

    #[test]
    fn ids_compare_as_text() {
        let table = vec![scored("042", 10), scored("42", 30)];
        let list = CandidateList::from_lines(["042", "0042"]);
        let assignment = assign_slots(&table, &list, None);
        assert_eq!(assignment.matched_count(), 1);
        assert_eq!(assignment.unmatched, ["0042"]);
    }

    #[test]
    fn re_sort_keeps_table_order_for_ties() {
        let table = vec![scored("a", 10), scored("b", 10), scored("c", 10)];
        let list = CandidateList::from_lines(["c", "a", "b"]);
        let assignment = assign_slots(&table, &list, Some(2));
        match assignment.placement {
            Placement::Split {
                primary,
                alternates,
            } => {
                assert_eq!(ids(&primary), ["a", "b"]);
                assert_eq!(ids(&alternates), ["c"]);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn empty_list_matches_nothing() {
        let table = vec![scored("1", 10)];
        let assignment = assign_slots(&table, &CandidateList::default(), Some(3));
        assert_eq!(assignment.matched_count(), 0);
        assert!(assignment.unmatched.is_empty());
    }

    #[test]
    fn reads_list_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cadet_list.txt");
        std::fs::write(&path, "100\n\n 200\n100\r\n300\n").unwrap();
        assert_eq!(read_candidate_list(&path).ids(), ["100", "200", "300"]);
    }

    #[test]
    fn unreadable_list_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        assert!(matches!(
            load_candidate_list(&path),
            Err(OflightError::CandidateListRead { .. })
        ));
        assert!(read_candidate_list(&path).is_empty());
    }
}
