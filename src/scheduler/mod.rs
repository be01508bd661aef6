mod assembler;
mod conflicts;
pub mod eligibility;
mod mutate;
mod selector;
mod stats;
mod types;

pub use assembler::filter_holidays;
pub use conflicts::validate;
pub use eligibility::{classify, TierKind, Tiers};
pub use mutate::{clear_slot, resolve_slot};
pub use selector::pick_least_loaded;
pub use stats::summarize;
pub use types::{
    AssignmentCounter, ConflictKind, ConflictRecord, SchedError, StaffTally, BACKUP_NOTE,
    MANUAL_NOTE,
};

use crate::calendar;
use crate::model::{DutyDay, Roster, StaffId, StaffPool};
use crate::settings::RosterSettings;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Remplit les journées avec un compteur neuf.
pub fn assemble(days: Vec<DutyDay>, settings: &RosterSettings, pool: &StaffPool) -> Roster {
    let mut counter = AssignmentCounter::new();
    assembler::assemble(days, settings, pool, &mut counter)
}

/// Remplit les journées en poursuivant un compteur fourni par l'appelant.
pub fn assemble_with_counter(
    days: Vec<DutyDay>,
    settings: &RosterSettings,
    pool: &StaffPool,
    counter: &mut AssignmentCounter,
) -> Roster {
    assembler::assemble(days, settings, pool, counter)
}

/// Résultat complet d'une génération (phase 2).
#[derive(Debug, Clone)]
pub struct RosterReport {
    pub roster: Roster,
    pub stats: BTreeMap<StaffId, StaffTally>,
    pub conflicts: Vec<ConflictRecord>,
}

/// Scheduler : paramètres validés + vivier, sans état entre deux générations.
#[derive(Debug, Clone)]
pub struct Scheduler {
    settings: RosterSettings,
    pool: StaffPool,
}

impl Scheduler {
    pub fn new(settings: RosterSettings, pool: StaffPool) -> Result<Self, SchedError> {
        settings.validate()?;
        Ok(Self { settings, pool })
    }

    pub fn settings(&self) -> &RosterSettings {
        &self.settings
    }
    pub fn pool(&self) -> &StaffPool {
        &self.pool
    }

    /// Phase 1 : calendrier complet, avant marquage des jours fériés.
    pub fn expand_calendar(&self) -> Vec<DutyDay> {
        calendar::expand(
            self.settings.start_date,
            self.settings.weeks,
            &self.settings.weekdays,
            self.settings.calendar,
        )
    }

    /// Phase 2 : affectation sur les journées retenues.
    pub fn assemble(&self, days: Vec<DutyDay>) -> Roster {
        assemble(days, &self.settings, &self.pool)
    }

    /// Enchaîne expansion, filtrage des fériés, affectation, totaux et conflits.
    pub fn generate(&self, holidays: &BTreeSet<NaiveDate>) -> RosterReport {
        let days = filter_holidays(self.expand_calendar(), holidays);
        let roster = self.assemble(days);
        RosterReport {
            stats: summarize(&roster),
            conflicts: validate(&roster),
            roster,
        }
    }

    pub fn resolve_slot(
        &self,
        roster: &mut Roster,
        date: NaiveDate,
        index: usize,
        staff_id: &StaffId,
    ) -> Result<(), SchedError> {
        mutate::resolve_slot(roster, &self.pool, date, index, staff_id)
    }

    pub fn clear_slot(
        &self,
        roster: &mut Roster,
        date: NaiveDate,
        index: usize,
    ) -> Result<(), SchedError> {
        mutate::clear_slot(roster, date, index)
    }
}
