use super::AssignmentCounter;
use crate::model::Staff;

/// Candidat le moins chargé du palier. À charge égale, le premier dans
/// l'ordre du palier l'emporte. `None` seulement si le palier est vide.
pub fn pick_least_loaded<'a>(tier: &[&'a Staff], counters: &AssignmentCounter) -> Option<&'a Staff> {
    let mut best: Option<(&'a Staff, u32)> = None;
    for &staff in tier {
        let load = counters.get(staff.id());
        match best {
            Some((_, min)) if min <= load => {}
            _ => best = Some((staff, load)),
        }
    }
    best.map(|(staff, _)| staff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdminRole, StaffId};

    fn admins(n: usize) -> Vec<Staff> {
        (0..n)
            .map(|i| Staff::administrator(&format!("a{i}"), format!("Admin {i}"), AdminRole::Supervisor))
            .collect()
    }

    #[test]
    fn empty_tier_yields_none() {
        assert!(pick_least_loaded(&[], &AssignmentCounter::new()).is_none());
    }

    #[test]
    fn ties_go_to_first_in_tier_order() {
        let staff = admins(3);
        let tier: Vec<&Staff> = staff.iter().rev().collect();
        let picked = pick_least_loaded(&tier, &AssignmentCounter::new()).unwrap();
        assert_eq!(picked.id().as_str(), "a2");
    }

    #[test]
    fn picks_strictly_smallest_count() {
        let staff = admins(3);
        let tier: Vec<&Staff> = staff.iter().collect();
        let counters = AssignmentCounter::seeded([
            (StaffId::new("a0"), 2),
            (StaffId::new("a1"), 1),
            (StaffId::new("a2"), 1),
        ]);
        let picked = pick_least_loaded(&tier, &counters).unwrap();
        assert_eq!(picked.id().as_str(), "a1");
    }
}
