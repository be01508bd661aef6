use crate::calendar::{weekday_name, weekday_serde, CalendarSystem};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const MAX_WEEKS: u16 = 40;
pub const MAX_GUARDS_PER_DAY: u8 = 5;
/// Nombre d'assistants administratifs à partir duquel seuls les
/// administratifs sont affectés.
pub const ADMIN_ONLY_THRESHOLD: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("at least one weekday must be selected")]
    NoWeekdays,
    #[error("weekday selected twice: {0}")]
    DuplicateWeekday(&'static str),
    #[error("start date {0} is not a sunday (first day of the school week)")]
    StartNotWeekStart(NaiveDate),
    #[error("weeks must be within 1..=40, got {0}")]
    WeeksOutOfRange(u16),
    #[error("guards per day must be within 1..=5, got {0}")]
    GuardsOutOfRange(u8),
    #[error("override for {day} must be within 1..=5, got {count}")]
    OverrideOutOfRange { day: &'static str, count: u8 },
}

/// Paramètres d'une génération de tableau de garde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSettings {
    /// Jours retenus, dans l'ordre d'affichage de la semaine.
    #[serde(with = "weekday_serde::list")]
    pub weekdays: Vec<Weekday>,
    pub weeks: u16,
    /// Premier jour de la première semaine.
    pub start_date: NaiveDate,
    #[serde(default)]
    pub calendar: CalendarSystem,
    #[serde(default = "default_guards")]
    pub guards_per_day: u8,
    #[serde(
        default,
        with = "weekday_serde::map",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub guards_overrides: HashMap<Weekday, u8>,
    /// 0 désactive le mode « administrateurs uniquement ».
    #[serde(default = "default_admin_threshold")]
    pub admin_only_threshold: usize,
}

fn default_guards() -> u8 {
    1
}

fn default_admin_threshold() -> usize {
    ADMIN_ONLY_THRESHOLD
}

impl RosterSettings {
    pub fn new(start_date: NaiveDate, weekdays: Vec<Weekday>, weeks: u16) -> Self {
        Self {
            weekdays,
            weeks,
            start_date,
            calendar: CalendarSystem::default(),
            guards_per_day: default_guards(),
            guards_overrides: HashMap::new(),
            admin_only_threshold: ADMIN_ONLY_THRESHOLD,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.weekdays.is_empty() {
            return Err(SettingsError::NoWeekdays);
        }
        for (i, day) in self.weekdays.iter().enumerate() {
            if self.weekdays[..i].contains(day) {
                return Err(SettingsError::DuplicateWeekday(weekday_name(*day)));
            }
        }
        if self.start_date.weekday() != Weekday::Sun {
            return Err(SettingsError::StartNotWeekStart(self.start_date));
        }
        if !(1..=MAX_WEEKS).contains(&self.weeks) {
            return Err(SettingsError::WeeksOutOfRange(self.weeks));
        }
        if !(1..=MAX_GUARDS_PER_DAY).contains(&self.guards_per_day) {
            return Err(SettingsError::GuardsOutOfRange(self.guards_per_day));
        }
        for (day, count) in &self.guards_overrides {
            if !(1..=MAX_GUARDS_PER_DAY).contains(count) {
                return Err(SettingsError::OverrideOutOfRange {
                    day: weekday_name(*day),
                    count: *count,
                });
            }
        }
        Ok(())
    }

    /// Nombre de gardes requis pour ce jour (surcharge sinon valeur globale).
    pub fn required_guards(&self, day: Weekday) -> usize {
        let count = self
            .guards_overrides
            .get(&day)
            .copied()
            .unwrap_or(self.guards_per_day);
        usize::from(count)
    }
}

pub fn load_settings_from_file<P: AsRef<Path>>(path: P) -> Result<RosterSettings> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading settings {}", path.display()))?;
    let settings: RosterSettings = serde_json::from_slice(&data)
        .with_context(|| format!("parsing settings {}", path.display()))?;
    settings.validate()?;
    Ok(settings)
}

pub fn export_settings_json<P: AsRef<Path>>(path: P, settings: &RosterSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RosterSettings {
        RosterSettings::new(
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            vec![Weekday::Sun, Weekday::Mon],
            2,
        )
    }

    #[test]
    fn validates_bounds() {
        assert_eq!(sample().validate(), Ok(()));

        let mut s = sample();
        s.weekdays.clear();
        assert_eq!(s.validate(), Err(SettingsError::NoWeekdays));

        let mut s = sample();
        s.start_date = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        assert_eq!(
            s.validate(),
            Err(SettingsError::StartNotWeekStart(s.start_date))
        );

        let mut s = sample();
        s.weeks = 41;
        assert_eq!(s.validate(), Err(SettingsError::WeeksOutOfRange(41)));

        let mut s = sample();
        s.guards_per_day = 0;
        assert_eq!(s.validate(), Err(SettingsError::GuardsOutOfRange(0)));

        let mut s = sample();
        s.weekdays.push(Weekday::Sun);
        assert_eq!(s.validate(), Err(SettingsError::DuplicateWeekday("sunday")));

        let mut s = sample();
        s.guards_overrides.insert(Weekday::Mon, 9);
        assert_eq!(
            s.validate(),
            Err(SettingsError::OverrideOutOfRange {
                day: "monday",
                count: 9
            })
        );
    }

    #[test]
    fn override_wins_over_global_default() {
        let mut s = sample();
        s.guards_per_day = 2;
        s.guards_overrides.insert(Weekday::Mon, 3);
        assert_eq!(s.required_guards(Weekday::Sun), 2);
        assert_eq!(s.required_guards(Weekday::Mon), 3);
    }

    #[test]
    fn parses_minimal_json_with_defaults() {
        let raw = r#"{"weekdays":["sunday","Tue"],"weeks":3,"start_date":"2025-01-05","calendar":"lunar","guards_overrides":{"tuesday":2}}"#;
        let s: RosterSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(s.weekdays, vec![Weekday::Sun, Weekday::Tue]);
        assert_eq!(s.calendar, CalendarSystem::Lunar);
        assert_eq!(s.guards_per_day, 1);
        assert_eq!(s.admin_only_threshold, ADMIN_ONLY_THRESHOLD);
        assert_eq!(s.required_guards(Weekday::Tue), 2);
    }

    #[test]
    fn export_then_load_keeps_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut s = sample();
        s.guards_overrides.insert(Weekday::Mon, 2);
        export_settings_json(&path, &s).unwrap();
        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains(r#""sunday""#), "{json}");
        assert!(json.contains(r#""monday": 2"#), "{json}");
        assert!(!json.contains("Sun\""), "{json}");
        assert_eq!(load_settings_from_file(&path).unwrap(), s);

        s.weeks = 0;
        export_settings_json(&path, &s).unwrap();
        assert!(load_settings_from_file(&path).is_err());
    }
}
