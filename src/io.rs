use crate::calendar::weekday_name;
use crate::model::{AdminRole, LatePeriods, Roster, Staff, StaffId, StaffPool};
use crate::scheduler::{ConflictKind, ConflictRecord, StaffTally};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Import du personnel depuis CSV: header `kind,id,name[,role][,p6,p7,p8]`
/// (`kind` = `admin` | `teacher`, id vide = identifiant aléatoire).
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<StaffPool> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut members = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let kind = rec.get(0).context("missing kind")?.trim().to_ascii_lowercase();
        let id = rec.get(1).context("missing id")?.trim();
        let name = rec.get(2).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid staff row (empty name)");
        }
        let id = if id.is_empty() {
            StaffId::random()
        } else {
            StaffId::new(id)
        };
        let staff = match kind.as_str() {
            "admin" | "administrator" => Staff::administrator(
                id.as_str(),
                name,
                AdminRole::parse(
                    rec.get(3)
                        .map(str::trim)
                        .filter(|r| !r.is_empty())
                        .unwrap_or("assistant"),
                ),
            ),
            "teacher" => {
                let flag = |i: usize| -> anyhow::Result<bool> {
                    match rec.get(i).map(str::trim) {
                        None | Some("") => Ok(false),
                        Some(raw) => parse_bool(raw)
                            .with_context(|| format!("invalid period flag for {name}")),
                    }
                };
                Staff::teacher(
                    id.as_str(),
                    name,
                    LatePeriods::new(flag(4)?, flag(5)?, flag(6)?),
                )
            }
            other => bail!("unknown staff kind: {other}"),
        };
        members.push(staff);
    }
    Ok(StaffPool::new(members))
}

/// Charge un vivier : JSON (`StaffPool`) si l'extension est `.json`, CSV sinon.
pub fn load_staff<P: AsRef<Path>>(path: P) -> anyhow::Result<StaffPool> {
    let path = path.as_ref();
    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let pool: StaffPool = serde_json::from_slice(&data)
            .with_context(|| format!("parsing staff pool {}", path.display()))?;
        return Ok(pool);
    }
    import_staff_csv(path)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Liste de jours fériés : une date `YYYY-MM-DD` par ligne (ou séparées par
/// des virgules), `#` pour les commentaires.
pub fn parse_holidays(raw: &str) -> anyhow::Result<BTreeSet<NaiveDate>> {
    raw.lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            NaiveDate::parse_from_str(chunk, "%Y-%m-%d")
                .with_context(|| format!("invalid holiday date: {chunk}"))
        })
        .collect()
}

pub fn load_holidays<P: AsRef<Path>>(path: P) -> anyhow::Result<BTreeSet<NaiveDate>> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_holidays(&raw)
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du roster, une ligne par créneau:
/// header `date,weekday,civil,lunar,slot,staff_id,name,category,auto,note`
pub fn export_roster_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "date", "weekday", "civil", "lunar", "slot", "staff_id", "name", "category", "auto",
        "note",
    ])?;
    let mut buf = itoa::Buffer::new();
    for day in &roster.days {
        let date = day.date.to_string();
        for (i, slot) in day.slots.iter().enumerate() {
            w.write_record([
                date.as_str(),
                day.weekday_label(),
                day.civil_label.as_str(),
                day.lunar_label.as_str(),
                buf.format(i + 1),
                slot.staff_id.as_ref().map(StaffId::as_str).unwrap_or(""),
                slot.name.as_str(),
                slot.category.map(|c| c.as_str()).unwrap_or(""),
                if slot.auto_assigned { "true" } else { "false" },
                slot.note.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des totaux: header `staff_id,name,total`
pub fn export_stats_csv<P: AsRef<Path>>(
    path: P,
    stats: &BTreeMap<StaffId, StaffTally>,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["staff_id", "name", "total"])?;
    let mut buf = itoa::Buffer::new();
    for (id, tally) in stats {
        w.write_record([
            id.as_str(),
            tally.display_name.as_str(),
            buf.format(tally.total_assigned_days),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des conflits: header `date,weekday,kind,description`
pub fn export_conflicts_csv<P: AsRef<Path>>(
    path: P,
    conflicts: &[ConflictRecord],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "weekday", "kind", "description"])?;
    for c in conflicts {
        let date = c.date.to_string();
        w.write_record([
            date.as_str(),
            weekday_name(c.weekday),
            match c.kind {
                ConflictKind::DuplicateStaff { .. } => "duplicate",
                ConflictKind::InconsistentSlot { .. } => "inconsistent",
                ConflictKind::Unresolved { .. } => "unresolved",
            },
            c.description.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
