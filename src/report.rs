use std::fmt::Write;

use crate::dates;
use crate::models::{Placement, ScoredRecord, SlotAssignment};
use crate::scoring;

const SECTION_RULE: usize = 70;
const UNMATCHED_RULE: usize = 20;

/// `Mon-YY` label of the latest powered flight, blank for cadets without one.
pub fn last_flight_label(record: &ScoredRecord) -> String {
    if record.powered_count == 0 {
        return String::new();
    }

    match scoring::last_recorded_flight(&record.candidate.powered) {
        Some(value) => dates::parse_date(value)
            .map(dates::month_label)
            .unwrap_or_else(|_| value.to_string()),
        None => String::new(),
    }
}

fn write_section(output: &mut String, title: &str, records: &[ScoredRecord], first_rank: usize) {
    let _ = writeln!(output, "{title}:");
    let _ = writeln!(output, "{}", "=".repeat(SECTION_RULE));
    let _ = writeln!(
        output,
        "{:>3}  {:<8} {:<30} {:>3}  {:>4}  {:<8}",
        "#", "CAPID", "Name", "Points", "Next", "Last Flight"
    );

    for (rank, record) in (first_rank..).zip(records) {
        let _ = writeln!(
            output,
            "{:>3}  {:<8} {:<30} {:>3}     {:>1}       {:<8}",
            rank,
            record.cap_id(),
            record.candidate.full_name,
            record.total_points,
            record.next_flight(),
            last_flight_label(record)
        );
    }
}

pub fn build_report(assignment: &SlotAssignment) -> String {
    let mut output = String::new();

    match &assignment.placement {
        Placement::Split {
            primary,
            alternates,
        } => {
            write_section(&mut output, "Primary Slots", primary, 1);
            let _ = writeln!(output);
            write_section(&mut output, "Alternates", alternates, primary.len() + 1);
        }
        Placement::Combined(records) => {
            write_section(&mut output, "Cadets sorted by total points", records, 1);
        }
    }

    if !assignment.unmatched.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Unmatched CAP IDs:");
        let _ = writeln!(output, "{}", "=".repeat(UNMATCHED_RULE));
        for cap_id in &assignment.unmatched {
            let _ = writeln!(output, "{cap_id}");
        }
    }

    output
}
