use super::eligibility::{classify, TierKind, Tiers};
use super::selector::pick_least_loaded;
use super::{AssignmentCounter, BACKUP_NOTE};
use crate::model::{DutyDay, GuardSlot, Roster, Staff, StaffId, StaffPool};
use crate::settings::RosterSettings;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Retire les journées fériées (phase 1 -> phase 2), ordre conservé.
pub fn filter_holidays(days: Vec<DutyDay>, holidays: &BTreeSet<NaiveDate>) -> Vec<DutyDay> {
    days.into_iter()
        .filter(|d| !holidays.contains(&d.date))
        .collect()
}

pub(super) fn assemble(
    mut days: Vec<DutyDay>,
    settings: &RosterSettings,
    pool: &StaffPool,
    counter: &mut AssignmentCounter,
) -> Roster {
    let tiers = classify(pool);
    let admin_only = tiers.admin_only(settings.admin_only_threshold);
    #[cfg(feature = "logging")]
    tracing::debug!(
        primary = tiers.primary.len(),
        backup = tiers.backup.len(),
        admin = tiers.admin.len(),
        admin_only,
        "staff pool classified"
    );

    for day in days.iter_mut() {
        let required = settings.required_guards(day.weekday);
        let mut slots = Vec::with_capacity(required);
        for _ in 0..required {
            let slot = fill_slot(&tiers, admin_only, &slots, counter);
            slots.push(slot);
        }
        #[cfg(feature = "logging")]
        {
            let unresolved = slots.iter().filter(|s| !s.is_resolved()).count();
            if unresolved > 0 {
                tracing::warn!(date = %day.date, unresolved, "day left with unresolved slots");
            } else {
                tracing::debug!(date = %day.date, required, "day filled");
            }
        }
        day.slots = slots;
    }

    Roster { days }
}

/// Remplit un créneau : premier palier ayant un candidat libre ce jour-là.
fn fill_slot(
    tiers: &Tiers<'_>,
    admin_only: bool,
    taken: &[GuardSlot],
    counter: &mut AssignmentCounter,
) -> GuardSlot {
    for (kind, members) in tiers.order(admin_only) {
        let free: Vec<&Staff> = members
            .iter()
            .copied()
            .filter(|s| !on_duty(taken, s.id()))
            .collect();
        if let Some(staff) = pick_least_loaded(&free, counter) {
            counter.increment(staff.id());
            let note = (kind == TierKind::Backup).then_some(BACKUP_NOTE);
            return GuardSlot::filled(staff, note);
        }
    }
    GuardSlot::unresolved()
}

fn on_duty(taken: &[GuardSlot], id: &StaffId) -> bool {
    taken.iter().any(|s| s.staff_id.as_ref() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{expand, CalendarSystem};
    use crate::model::{AdminRole, LatePeriods, StaffCategory};
    use chrono::Weekday;

    fn settings(guards: u8) -> RosterSettings {
        let mut s = RosterSettings::new(
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            vec![Weekday::Sun, Weekday::Mon, Weekday::Tue],
            2,
        );
        s.guards_per_day = guards;
        s
    }

    fn run(settings: &RosterSettings, pool: &StaffPool) -> Roster {
        let days = expand(
            settings.start_date,
            settings.weeks,
            &settings.weekdays,
            CalendarSystem::Civil,
        );
        assemble(days, settings, pool, &mut AssignmentCounter::new())
    }

    #[test]
    fn backup_pick_carries_note_after_primary_exhausted() {
        let pool = StaffPool::new(vec![
            Staff::teacher("t7", "Primary", LatePeriods::new(false, true, false)),
            Staff::teacher("t6", "Backup", LatePeriods::new(true, false, false)),
            Staff::administrator("a1", "Admin", AdminRole::Supervisor),
        ]);
        let roster = run(&settings(3), &pool);
        for day in &roster.days {
            assert_eq!(day.slots[0].staff_id, Some(StaffId::new("t7")));
            assert!(day.slots[0].note.is_empty());
            assert_eq!(day.slots[1].staff_id, Some(StaffId::new("t6")));
            assert_eq!(day.slots[1].note, BACKUP_NOTE);
            assert_eq!(day.slots[2].staff_id, Some(StaffId::new("a1")));
            assert_eq!(day.slots[2].category, Some(StaffCategory::Administrative));
            assert!(day.slots.iter().all(|s| s.auto_assigned));
        }
    }

    #[test]
    fn primary_tier_rotates_evenly() {
        let pool = StaffPool::new(vec![
            Staff::teacher("t1", "A", LatePeriods::new(false, false, true)),
            Staff::teacher("t2", "B", LatePeriods::new(false, true, false)),
            Staff::teacher("t3", "C", LatePeriods::new(false, true, true)),
        ]);
        let mut counter = AssignmentCounter::new();
        let s = settings(1);
        let days = expand(s.start_date, s.weeks, &s.weekdays, CalendarSystem::Civil);
        let roster = assemble(days, &s, &pool, &mut counter);
        let picks: Vec<_> = roster
            .days
            .iter()
            .map(|d| d.slots[0].staff_id.clone().unwrap())
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(picks, vec!["t1", "t2", "t3", "t1", "t2", "t3"]);
        assert_eq!(counter.total(), 6);
    }

    #[test]
    fn seeded_counter_shifts_first_pick() {
        let pool = StaffPool::new(vec![
            Staff::teacher("t1", "A", LatePeriods::new(false, false, true)),
            Staff::teacher("t2", "B", LatePeriods::new(false, false, true)),
        ]);
        let mut counter = AssignmentCounter::seeded([(StaffId::new("t1"), 1)]);
        let s = settings(1);
        let days = expand(s.start_date, 1, &[Weekday::Sun], CalendarSystem::Civil);
        let roster = assemble(days, &s, &pool, &mut counter);
        assert_eq!(roster.days[0].slots[0].staff_id, Some(StaffId::new("t2")));
    }

    #[test]
    fn empty_pool_leaves_every_slot_unresolved() {
        let roster = run(&settings(2), &StaffPool::default());
        assert_eq!(roster.total_slots(), 12);
        assert_eq!(roster.filled_slots(), 0);
        assert!(roster
            .days
            .iter()
            .flat_map(|d| d.slots.iter())
            .all(|s| !s.auto_assigned && s.note == crate::scheduler::MANUAL_NOTE && s.name.is_empty()));
    }

    #[test]
    fn holidays_are_dropped_in_order() {
        let s = settings(1);
        let days = expand(s.start_date, s.weeks, &s.weekdays, CalendarSystem::Civil);
        let holidays: BTreeSet<_> = [NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()]
            .into_iter()
            .collect();
        let kept = filter_holidays(days, &holidays);
        assert_eq!(kept.len(), 5);
        assert_eq!(kept[1].date, NaiveDate::from_ymd_opt(2025, 1, 7).unwrap());
    }
}
