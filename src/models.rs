pub const SLOTS_PER_KIND: usize = 5;

/// Ordinal activity slots 1..=5; `None` when the report cell was empty.
pub type ActivitySlots = [Option<String>; SLOTS_PER_KIND];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    pub cap_id: String,
    pub full_name: String,
    pub eighteen_plus: String,
    pub wing: String,
    pub unit: String,
    pub group_type: String,
    pub joined: String,
    pub glider: ActivitySlots,
    pub powered: ActivitySlots,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredRecord {
    pub candidate: CandidateRecord,
    pub powered_count: usize,
    pub last_powered: String,
    pub flight_points: i64,
    pub date_points: i64,
    pub total_points: i64,
}

impl ScoredRecord {
    pub fn cap_id(&self) -> &str {
        &self.candidate.cap_id
    }

    pub fn next_flight(&self) -> usize {
        self.powered_count + 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    ids: Vec<String>,
}

impl CandidateList {
    /// Trims each line, skips blanks and keeps the first occurrence of each id.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut ids = Vec::new();
        for line in lines {
            let id = line.as_ref().trim();
            if !id.is_empty() && seen.insert(id.to_string()) {
                ids.push(id.to_string());
            }
        }
        Self { ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Split {
        primary: Vec<ScoredRecord>,
        alternates: Vec<ScoredRecord>,
    },
    Combined(Vec<ScoredRecord>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub placement: Placement,
    pub unmatched: Vec<String>,
}

impl SlotAssignment {
    pub fn matched_count(&self) -> usize {
        match &self.placement {
            Placement::Split {
                primary,
                alternates,
            } => primary.len() + alternates.len(),
            Placement::Combined(records) => records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_list_dedups_in_order() {
        let list = CandidateList::from_lines(["100", " 200 ", "", "100", "   ", "300", "200"]);
        assert_eq!(list.ids(), ["100", "200", "300"]);
    }

    #[test]
    fn candidate_list_keeps_leading_zeros() {
        let list = CandidateList::from_lines(["0042", "42"]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.ids()[0], "0042");
    }
}
