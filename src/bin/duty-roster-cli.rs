#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use duty_roster::{
    io,
    model::{Roster, StaffId},
    scheduler::{self, Scheduler},
    settings::load_settings_from_file,
    storage::{JsonStorage, Storage},
};
use std::collections::BTreeSet;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération des tableaux de garde (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du tableau de garde
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Phase 1 : afficher le calendrier complet (avant jours fériés)
    Calendar {
        /// Paramètres JSON
        #[arg(long)]
        settings: String,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Phase 2 : générer le tableau de garde
    Generate {
        #[arg(long)]
        settings: String,
        /// Personnel (CSV ou JSON)
        #[arg(long)]
        staff: String,
        /// Jours fériés, une date YYYY-MM-DD par ligne
        #[arg(long)]
        holidays: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier les conflits du tableau enregistré
    Check {
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Totaux d'affectation par membre
    Stats {
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Choisir manuellement le titulaire d'un créneau
    Resolve {
        #[arg(long)]
        staff: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Numéro du créneau (à partir de 1)
        #[arg(long)]
        slot: usize,
        /// Identifiant du membre
        #[arg(long)]
        with: String,
    },

    /// Remettre un créneau à l'état non résolu
    Clear {
        #[arg(long)]
        date: String,
        #[arg(long)]
        slot: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster)?;

    let code = match cli.cmd {
        Commands::Calendar { settings, out_json } => {
            let settings = load_settings_from_file(&settings)?;
            let calendar = settings.calendar;
            let scheduler = Scheduler::new(settings, Default::default())?;
            let days = scheduler.expand_calendar();
            if let Some(path) = out_json {
                io::export_roster_json(path, &Roster { days: days.clone() })?;
            }
            for d in &days {
                println!(
                    "{} | {} | {}",
                    d.date,
                    d.weekday_label(),
                    duty_roster::format_date(d.date, calendar)
                );
            }
            0
        }
        Commands::Generate {
            settings,
            staff,
            holidays,
            out_csv,
        } => {
            let settings = load_settings_from_file(&settings)?;
            let pool = io::load_staff(&staff)?;
            let holidays = match holidays {
                Some(path) => io::load_holidays(path)?,
                None => BTreeSet::new(),
            };
            let scheduler = Scheduler::new(settings, pool)?;
            let report = scheduler.generate(&holidays);
            storage.save(&report.roster)?;
            if let Some(path) = out_csv {
                io::export_roster_csv(path, &report.roster)?;
            }
            println!(
                "{} day(s), {}/{} slot(s) filled",
                report.roster.days.len(),
                report.roster.filled_slots(),
                report.roster.total_slots()
            );
            for (id, tally) in &report.stats {
                println!("{} | {} | {}", id.as_str(), tally.display_name, tally.total_assigned_days);
            }
            report_conflicts(&report.conflicts)
        }
        Commands::Check { report } => {
            let roster = storage.load()?;
            let conflicts = scheduler::validate(&roster);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                if let Some(path) = report {
                    io::export_conflicts_csv(path, &conflicts)?;
                }
                report_conflicts(&conflicts)
            }
        }
        Commands::Stats { out_csv } => {
            let roster = storage.load()?;
            let stats = scheduler::summarize(&roster);
            if let Some(path) = out_csv {
                io::export_stats_csv(path, &stats)?;
            }
            for (id, tally) in &stats {
                println!("{} | {} | {}", id.as_str(), tally.display_name, tally.total_assigned_days);
            }
            0
        }
        Commands::Resolve {
            staff,
            date,
            slot,
            with,
        } => {
            let pool = io::load_staff(&staff)?;
            let mut roster = storage.load()?;
            let date = parse_date(&date)?;
            scheduler::resolve_slot(
                &mut roster,
                &pool,
                date,
                slot_index(slot)?,
                &StaffId::new(with),
            )?;
            storage.save(&roster)?;
            0
        }
        Commands::Clear { date, slot } => {
            let mut roster = storage.load()?;
            let date = parse_date(&date)?;
            scheduler::clear_slot(&mut roster, date, slot_index(slot)?)?;
            storage.save(&roster)?;
            0
        }
    };

    std::process::exit(code);
}

fn report_conflicts(conflicts: &[scheduler::ConflictRecord]) -> i32 {
    if conflicts.is_empty() {
        return 0;
    }
    eprintln!("Found {} conflict(s)", conflicts.len());
    for c in conflicts {
        eprintln!("- {}", c.description);
    }
    // Code 2 = WARNING/INCOMPLETE
    2
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

fn slot_index(slot: usize) -> Result<usize> {
    slot.checked_sub(1).context("slot numbers start at 1")
}
