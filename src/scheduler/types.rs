use crate::model::{StaffCategory, StaffId};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Note posée sur un créneau pris dans le vivier de secours.
pub const BACKUP_NOTE: &str = "backup: recommend reassignment";
/// Note posée sur un créneau laissé sans titulaire.
pub const MANUAL_NOTE: &str = "requires manual selection";

/// Compteur d'affectations propre à une génération. Jamais partagé entre
/// deux générations : chaque appel en crée un (ou reçoit le sien).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentCounter {
    counts: HashMap<StaffId, u32>,
}

impl AssignmentCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amorce le compteur avec des totaux existants.
    pub fn seeded<I: IntoIterator<Item = (StaffId, u32)>>(seed: I) -> Self {
        Self {
            counts: seed.into_iter().collect(),
        }
    }

    pub fn get(&self, id: &StaffId) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, id: &StaffId) {
        *self.counts.entry(id.clone()).or_insert(0) += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictKind {
    /// un même membre occupe plusieurs créneaux du même jour
    DuplicateStaff { staff: Vec<StaffId> },
    /// créneaux remplis sans nom ou sans catégorie (numéros à partir de 1)
    InconsistentSlot { slots: Vec<usize> },
    /// créneaux sans titulaire
    Unresolved { count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub date: NaiveDate,
    #[serde(with = "crate::calendar::weekday_serde")]
    pub weekday: Weekday,
    pub kind: ConflictKind,
    pub description: String,
}

/// Total d'affectations d'un membre sur un tableau.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffTally {
    pub display_name: String,
    pub category: Option<StaffCategory>,
    pub total_assigned_days: u32,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] crate::settings::SettingsError),
    #[error("unknown duty day: {0}")]
    UnknownDay(NaiveDate),
    #[error("slot {index} out of range for {date} ({len} slot(s))")]
    SlotOutOfRange {
        date: NaiveDate,
        index: usize,
        len: usize,
    },
    #[error("unknown staff id: {0}")]
    UnknownStaff(String),
    #[error("{staff} already on duty on {date}")]
    AlreadyOnDuty { staff: String, date: NaiveDate },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
