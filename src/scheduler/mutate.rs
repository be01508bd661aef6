use super::SchedError;
use crate::model::{GuardSlot, Roster, StaffId, StaffPool};
use chrono::NaiveDate;

/// Choix manuel d'un titulaire pour un créneau (typiquement non résolu).
pub fn resolve_slot(
    roster: &mut Roster,
    pool: &StaffPool,
    date: NaiveDate,
    index: usize,
    staff_id: &StaffId,
) -> Result<(), SchedError> {
    let staff = pool
        .find_by_id(staff_id)
        .ok_or_else(|| SchedError::UnknownStaff(staff_id.as_str().to_string()))?;
    let day = roster.find_day_mut(date).ok_or(SchedError::UnknownDay(date))?;
    let len = day.slots.len();
    if index >= len {
        return Err(SchedError::SlotOutOfRange { date, index, len });
    }

    let busy = day
        .slots
        .iter()
        .enumerate()
        .any(|(i, s)| i != index && s.staff_id.as_ref() == Some(staff_id));
    if busy {
        return Err(SchedError::AlreadyOnDuty {
            staff: staff_id.as_str().to_string(),
            date,
        });
    }

    let mut slot = GuardSlot::filled(staff, None);
    slot.auto_assigned = false;
    day.slots[index] = slot;
    Ok(())
}

/// Remet un créneau à l'état non résolu.
pub fn clear_slot(roster: &mut Roster, date: NaiveDate, index: usize) -> Result<(), SchedError> {
    let day = roster.find_day_mut(date).ok_or(SchedError::UnknownDay(date))?;
    let len = day.slots.len();
    let slot = day
        .slots
        .get_mut(index)
        .ok_or(SchedError::SlotOutOfRange { date, index, len })?;
    *slot = GuardSlot::unresolved();
    Ok(())
}
