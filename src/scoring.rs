use chrono::NaiveDate;
use tracing::warn;

use crate::config::ScoringConfig;
use crate::dates;
use crate::models::{ActivitySlots, CandidateRecord, ScoredRecord, SLOTS_PER_KIND};

fn non_blank(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

pub fn count_powered_flights(powered: &ActivitySlots) -> usize {
    powered.iter().filter(|slot| non_blank(slot).is_some()).count()
}

/// Most recent recorded flight: higher ordinals are later flights.
pub fn last_recorded_flight(powered: &ActivitySlots) -> Option<&str> {
    powered.iter().rev().find_map(non_blank)
}

pub fn find_last_powered_date(record: &CandidateRecord) -> String {
    last_recorded_flight(&record.powered)
        .unwrap_or(record.joined.as_str())
        .to_string()
}

pub struct Scorer {
    config: ScoringConfig,
    today: NaiveDate,
}

impl Scorer {
    pub fn new(config: ScoringConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    pub fn flight_points(&self, powered_count: usize, group_type: &str) -> i64 {
        let remaining = SLOTS_PER_KIND.saturating_sub(powered_count) as i64;
        let points = remaining * self.config.flight_factor;
        if group_type == self.config.no_flight_group {
            points + self.config.no_flight_factor
        } else {
            points
        }
    }

    /// Months since `last_powered` times the date factor. Unparseable or empty
    /// dates count as zero months.
    pub fn date_points(&self, cap_id: &str, last_powered: &str) -> i64 {
        if last_powered.trim().is_empty() {
            return 0;
        }

        let months = match dates::parse_date(last_powered) {
            Ok(date) => dates::months_between(date, self.today).max(0),
            Err(err) => {
                warn!(cap_id, field = "last_powered", "{err}");
                0
            }
        };
        months * self.config.date_factor
    }

    pub fn score(&self, candidate: CandidateRecord) -> ScoredRecord {
        let powered_count = count_powered_flights(&candidate.powered);
        let last_powered = find_last_powered_date(&candidate);
        let flight_points = self.flight_points(powered_count, &candidate.group_type);
        let date_points = self.date_points(&candidate.cap_id, &last_powered);

        ScoredRecord {
            candidate,
            powered_count,
            last_powered,
            flight_points,
            date_points,
            total_points: flight_points + date_points,
        }
    }

    /// Scores every record and returns them ranked.
    pub fn score_all(&self, candidates: Vec<CandidateRecord>) -> Vec<ScoredRecord> {
        let mut scored: Vec<ScoredRecord> = candidates
            .into_iter()
            .map(|candidate| self.score(candidate))
            .collect();
        rank(&mut scored);
        scored
    }
}

/// Orders by total points, highest first. `sort_by` is stable, so tied records
/// keep their input order.
pub fn rank(records: &mut [ScoredRecord]) {
    records.sort_by(|a, b| b.total_points.cmp(&a.total_points));
}
