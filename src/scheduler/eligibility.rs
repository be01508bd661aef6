use crate::model::{AdminRole, Staff, StaffPool};

/// Périodes de fin de journée qui qualifient un enseignant en priorité.
pub const PRIMARY_PERIODS: [u8; 2] = [7, 8];
/// Période un peu plus tôt qui qualifie un enseignant en secours.
pub const BACKUP_PERIOD: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Primary,
    Backup,
    AdminFallback,
}

/// Partition du vivier par ordre de priorité. L'ordre d'entrée est conservé
/// dans chaque palier.
#[derive(Debug, Clone, Default)]
pub struct Tiers<'a> {
    pub primary: Vec<&'a Staff>,
    pub backup: Vec<&'a Staff>,
    pub admin: Vec<&'a Staff>,
    /// assistants administratifs du vivier
    pub assistants: usize,
}

impl<'a> Tiers<'a> {
    /// Mode « administrateurs uniquement » : actif dès que le nombre
    /// d'assistants atteint `threshold` (0 = jamais).
    pub fn admin_only(&self, threshold: usize) -> bool {
        threshold > 0 && self.assistants >= threshold
    }

    /// Paliers à essayer, dans l'ordre.
    pub fn order(&self, admin_only: bool) -> Vec<(TierKind, &[&'a Staff])> {
        if admin_only {
            return vec![(TierKind::AdminFallback, self.admin.as_slice())];
        }
        vec![
            (TierKind::Primary, self.primary.as_slice()),
            (TierKind::Backup, self.backup.as_slice()),
            (TierKind::AdminFallback, self.admin.as_slice()),
        ]
    }
}

pub fn classify(pool: &StaffPool) -> Tiers<'_> {
    let mut tiers = Tiers::default();
    for staff in &pool.members {
        match staff {
            Staff::Administrator(admin) => {
                if admin.role == AdminRole::Assistant {
                    tiers.assistants += 1;
                }
                tiers.admin.push(staff);
            }
            Staff::Teacher(teacher) => {
                let periods = teacher.late_periods;
                if PRIMARY_PERIODS.iter().any(|p| periods.holds(*p)) {
                    tiers.primary.push(staff);
                } else if periods.holds(BACKUP_PERIOD) {
                    tiers.backup.push(staff);
                }
            }
        }
    }
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LatePeriods;

    fn ids(tier: &[&Staff]) -> Vec<String> {
        tier.iter().map(|s| s.id().as_str().to_string()).collect()
    }

    #[test]
    fn partitions_by_late_periods() {
        let pool = StaffPool::new(vec![
            Staff::teacher("t8", "Eighth", LatePeriods::new(false, false, true)),
            Staff::administrator("a1", "Admin", AdminRole::Supervisor),
            Staff::teacher("t6", "Sixth", LatePeriods::new(true, false, false)),
            Staff::teacher("t67", "Both", LatePeriods::new(true, true, false)),
            Staff::teacher("t0", "None", LatePeriods::default()),
        ]);
        let tiers = classify(&pool);
        assert_eq!(ids(&tiers.primary), vec!["t8", "t67"]);
        assert_eq!(ids(&tiers.backup), vec!["t6"]);
        assert_eq!(ids(&tiers.admin), vec!["a1"]);
        assert_eq!(tiers.assistants, 0);
        assert!(!tiers.admin_only(4));
    }

    #[test]
    fn admin_only_counts_assistants() {
        let mut members: Vec<Staff> = (0..4)
            .map(|i| Staff::administrator(&format!("a{i}"), "A", AdminRole::Assistant))
            .collect();
        members.push(Staff::teacher("t7", "T", LatePeriods::new(false, true, false)));
        let pool = StaffPool::new(members);
        let tiers = classify(&pool);
        assert!(tiers.admin_only(4));
        assert!(!tiers.admin_only(5));
        assert!(!tiers.admin_only(0));
        let order = tiers.order(true);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].0, TierKind::AdminFallback);
    }
}
