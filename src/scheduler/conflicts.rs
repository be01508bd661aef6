use super::{ConflictKind, ConflictRecord};
use crate::model::{Roster, StaffId};

/// Relève les anomalies jour par jour, sans rien corriger : doublons,
/// créneaux incohérents, puis créneaux non résolus.
pub fn validate(roster: &Roster) -> Vec<ConflictRecord> {
    let mut out = Vec::new();

    for day in &roster.days {
        let mut seen: Vec<&StaffId> = Vec::new();
        let mut duplicates: Vec<StaffId> = Vec::new();
        for id in day.slots.iter().filter_map(|s| s.staff_id.as_ref()) {
            if seen.contains(&id) {
                if !duplicates.contains(id) {
                    duplicates.push(id.clone());
                }
            } else {
                seen.push(id);
            }
        }

        if !duplicates.is_empty() {
            let names: Vec<&str> = duplicates.iter().map(StaffId::as_str).collect();
            out.push(ConflictRecord {
                date: day.date,
                weekday: day.weekday,
                description: format!(
                    "{} {}: staff assigned more than once: {}",
                    day.weekday_label(),
                    day.date,
                    names.join(", ")
                ),
                kind: ConflictKind::DuplicateStaff { staff: duplicates },
            });
        }

        let inconsistent: Vec<usize> = day
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_consistent())
            .map(|(i, _)| i + 1)
            .collect();
        if !inconsistent.is_empty() {
            let numbers: Vec<String> = inconsistent.iter().map(ToString::to_string).collect();
            out.push(ConflictRecord {
                date: day.date,
                weekday: day.weekday,
                description: format!(
                    "{} {}: slot(s) {} missing name or category",
                    day.weekday_label(),
                    day.date,
                    numbers.join(", ")
                ),
                kind: ConflictKind::InconsistentSlot {
                    slots: inconsistent,
                },
            });
        }

        let unresolved = day.unresolved_count();
        if unresolved > 0 {
            out.push(ConflictRecord {
                date: day.date,
                weekday: day.weekday,
                kind: ConflictKind::Unresolved { count: unresolved },
                description: format!(
                    "{} {}: {} unresolved slot(s)",
                    day.weekday_label(),
                    day.date,
                    unresolved
                ),
            });
        }
    }

    out
}
