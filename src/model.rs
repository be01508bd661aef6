use crate::calendar::CalendarSystem;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour un membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Catégorie de personnel portée par chaque créneau de garde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffCategory {
    Administrative,
    Teaching,
}

impl StaffCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffCategory::Administrative => "administrative",
            StaffCategory::Teaching => "teaching",
        }
    }
}

/// Fonction administrative. Seuls les assistants comptent pour le mode
/// « administrateurs uniquement ».
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Assistant,
    Supervisor,
    Custom(String),
}

impl AdminRole {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "assistant" => AdminRole::Assistant,
            "supervisor" => AdminRole::Supervisor,
            other => AdminRole::Custom(other.to_string()),
        }
    }
}

/// Séances de fin de journée tenues par un enseignant (périodes 6, 7 et 8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatePeriods {
    #[serde(default)]
    pub sixth: bool,
    #[serde(default)]
    pub seventh: bool,
    #[serde(default)]
    pub eighth: bool,
}

impl LatePeriods {
    pub fn new(sixth: bool, seventh: bool, eighth: bool) -> Self {
        Self {
            sixth,
            seventh,
            eighth,
        }
    }

    pub fn holds(&self, period: u8) -> bool {
        match period {
            6 => self.sixth,
            7 => self.seventh,
            8 => self.eighth,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Administrator {
    pub id: StaffId,
    pub name: String,
    pub role: AdminRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub late_periods: LatePeriods,
}

/// Membre du personnel : administratif ou enseignant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Staff {
    Administrator(Administrator),
    Teacher(Teacher),
}

impl Staff {
    pub fn administrator<N: Into<String>>(id: &str, name: N, role: AdminRole) -> Self {
        Staff::Administrator(Administrator {
            id: StaffId::new(id),
            name: name.into(),
            role,
        })
    }

    pub fn teacher<N: Into<String>>(id: &str, name: N, late_periods: LatePeriods) -> Self {
        Staff::Teacher(Teacher {
            id: StaffId::new(id),
            name: name.into(),
            late_periods,
        })
    }

    pub fn id(&self) -> &StaffId {
        match self {
            Staff::Administrator(a) => &a.id,
            Staff::Teacher(t) => &t.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Staff::Administrator(a) => &a.name,
            Staff::Teacher(t) => &t.name,
        }
    }

    pub fn category(&self) -> StaffCategory {
        match self {
            Staff::Administrator(_) => StaffCategory::Administrative,
            Staff::Teacher(_) => StaffCategory::Teaching,
        }
    }
}

/// Vivier de personnel, en lecture seule pour le moteur. L'ordre est
/// significatif : il départage les ex-aequo lors de la sélection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffPool {
    pub members: Vec<Staff>,
}

impl StaffPool {
    pub fn new(members: Vec<Staff>) -> Self {
        Self { members }
    }

    pub fn find_by_id<'a>(&'a self, id: &StaffId) -> Option<&'a Staff> {
        self.members.iter().find(|s| s.id() == id)
    }

    pub fn administrators(&self) -> impl Iterator<Item = &Administrator> {
        self.members.iter().filter_map(|s| match s {
            Staff::Administrator(a) => Some(a),
            Staff::Teacher(_) => None,
        })
    }

    pub fn teachers(&self) -> impl Iterator<Item = &Teacher> {
        self.members.iter().filter_map(|s| match s {
            Staff::Teacher(t) => Some(t),
            Staff::Administrator(_) => None,
        })
    }
}

/// Créneau de garde. Un créneau non résolu ne porte aucun identifiant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardSlot {
    pub staff_id: Option<StaffId>,
    pub name: String,
    pub category: Option<StaffCategory>,
    pub auto_assigned: bool,
    #[serde(default)]
    pub note: String,
}

impl GuardSlot {
    /// Créneau rempli automatiquement à partir d'un membre du vivier.
    pub fn filled(staff: &Staff, note: Option<&str>) -> Self {
        Self {
            staff_id: Some(staff.id().clone()),
            name: staff.name().to_string(),
            category: Some(staff.category()),
            auto_assigned: true,
            note: note.unwrap_or_default().to_string(),
        }
    }

    pub fn unresolved() -> Self {
        Self {
            staff_id: None,
            name: String::new(),
            category: None,
            auto_assigned: false,
            note: crate::scheduler::MANUAL_NOTE.to_string(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.staff_id.is_some()
    }

    /// Un créneau rempli porte aussi un nom et une catégorie.
    pub fn is_consistent(&self) -> bool {
        self.staff_id.is_none() || (!self.name.trim().is_empty() && self.category.is_some())
    }
}

/// Journée de garde : date canonique, libellés dans les deux calendriers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyDay {
    #[serde(with = "crate::calendar::weekday_serde")]
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub calendar: CalendarSystem,
    pub civil_label: String,
    pub lunar_label: String,
    #[serde(default)]
    pub slots: Vec<GuardSlot>,
}

impl DutyDay {
    /// Nom du jour en minuscules (`sunday`, `monday`, ...).
    pub fn weekday_label(&self) -> &'static str {
        crate::calendar::weekday_name(self.weekday)
    }

    /// Libellé dans le calendrier choisi lors de l'expansion.
    pub fn display_date(&self) -> &str {
        match self.calendar {
            CalendarSystem::Lunar => &self.lunar_label,
            CalendarSystem::Civil => &self.civil_label,
        }
    }

    pub fn unresolved_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_resolved()).count()
    }
}

/// Tableau de garde complet, dans l'ordre des journées.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub days: Vec<DutyDay>,
}

impl Roster {
    pub fn find_day(&self, date: NaiveDate) -> Option<&DutyDay> {
        self.days.iter().find(|d| d.date == date)
    }
    pub fn find_day_mut(&mut self, date: NaiveDate) -> Option<&mut DutyDay> {
        self.days.iter_mut().find(|d| d.date == date)
    }
    pub fn total_slots(&self) -> usize {
        self.days.iter().map(|d| d.slots.len()).sum()
    }
    pub fn filled_slots(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.slots.iter())
            .filter(|s| s.is_resolved())
            .count()
    }
}
