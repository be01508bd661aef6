use super::StaffTally;
use crate::model::{Roster, StaffId};
use std::collections::BTreeMap;

/// Totaux par membre sur les créneaux remplis. Le nom affiché est celui
/// de la première occurrence.
pub fn summarize(roster: &Roster) -> BTreeMap<StaffId, StaffTally> {
    let mut out: BTreeMap<StaffId, StaffTally> = BTreeMap::new();
    for slot in roster.days.iter().flat_map(|d| d.slots.iter()) {
        let Some(id) = slot.staff_id.as_ref() else {
            continue;
        };
        out.entry(id.clone())
            .or_insert_with(|| StaffTally {
                display_name: slot.name.clone(),
                category: slot.category,
                total_assigned_days: 0,
            })
            .total_assigned_days += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{expand, CalendarSystem};
    use crate::model::{GuardSlot, LatePeriods, Staff};
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn keeps_first_display_name_and_skips_unresolved() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let mut days = expand(start, 2, &[Weekday::Sun], CalendarSystem::Civil);
        let first = Staff::teacher("t1", "Huda", LatePeriods::default());
        let renamed = Staff::teacher("t1", "Huda A.", LatePeriods::default());
        days[0].slots = vec![GuardSlot::filled(&first, None), GuardSlot::unresolved()];
        days[1].slots = vec![GuardSlot::filled(&renamed, None)];

        let stats = summarize(&Roster { days });
        assert_eq!(stats.len(), 1);
        let tally = &stats[&StaffId::new("t1")];
        assert_eq!(tally.display_name, "Huda");
        assert_eq!(tally.total_assigned_days, 2);
    }
}
