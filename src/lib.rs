#![forbid(unsafe_code)]
//! Duty roster — génération de tableaux de garde scolaires (sans BD).
//!
//! - Phase 1 : expansion de la semaine type en journées datées (hégirien/grégorien).
//! - Phase 2 : affectation équitable par paliers, après retrait des jours fériés.
//! - Totaux par membre et détection des conflits (doublons, créneaux non résolus).
//! - Stockage fichiers (JSON/CSV) en dehors du moteur.

pub mod calendar;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod settings;
pub mod storage;

pub use calendar::{expand, format_date, CalendarSystem};
pub use model::{
    AdminRole, Administrator, DutyDay, GuardSlot, LatePeriods, Roster, Staff, StaffCategory,
    StaffId, StaffPool, Teacher,
};
pub use scheduler::{
    assemble, assemble_with_counter, classify, clear_slot, filter_holidays, pick_least_loaded,
    resolve_slot, summarize, validate, AssignmentCounter, ConflictKind, ConflictRecord,
    RosterReport, SchedError, Scheduler, StaffTally,
};
pub use settings::{load_settings_from_file, RosterSettings, SettingsError};
pub use storage::{JsonStorage, Storage};
