use crate::model::Roster;
use anyhow::{bail, Context};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un tableau de garde depuis un support.
    fn load(&self) -> anyhow::Result<Roster>;
    /// Sauvegarde de manière atomique.
    fn save(&self, roster: &Roster) -> anyhow::Result<()>;
}

/// Tableau de garde finalisé, sérialisé en JSON sur disque.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Roster> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let roster: Roster = serde_json::from_slice(&data)
            .with_context(|| format!("parsing roster {}", self.path.display()))?;
        for day in &roster.days {
            if let Some(pos) = day.slots.iter().position(|s| !s.is_consistent()) {
                bail!(
                    "roster {}: slot {} on {} has a staff id without name or category",
                    self.path.display(),
                    pos + 1,
                    day.date
                );
            }
        }
        Ok(roster)
    }

    fn save(&self, roster: &Roster) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(roster)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{expand, CalendarSystem};
    use crate::model::{GuardSlot, LatePeriods, Staff};
    use chrono::{NaiveDate, Weekday};
    use tempfile::tempdir;

    #[test]
    fn save_replaces_previous_roster() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::open(dir.path().join("roster.json")).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();

        storage
            .save(&Roster {
                days: expand(start, 2, &[Weekday::Sun], CalendarSystem::Civil),
            })
            .unwrap();
        let second = Roster {
            days: expand(start, 1, &[Weekday::Sun], CalendarSystem::Lunar),
        };
        storage.save(&second).unwrap();

        assert_eq!(storage.load().unwrap(), second);
        assert!(JsonStorage::open(dir.path().join("missing.json"))
            .unwrap()
            .load()
            .is_err());
    }

    #[test]
    fn load_rejects_filled_slot_without_category() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::open(dir.path().join("roster.json")).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let mut days = expand(start, 1, &[Weekday::Sun], CalendarSystem::Civil);
        let teacher = Staff::teacher("t1", "Huda", LatePeriods::default());
        let mut slot = GuardSlot::filled(&teacher, None);
        slot.category = None;
        days[0].slots = vec![slot];
        storage.save(&Roster { days }).unwrap();

        let err = storage.load().unwrap_err();
        assert!(err.to_string().contains("slot 1 on 2025-01-05"), "{err}");
    }
}
