//! Calendriers (hégirien tabulaire / grégorien) et expansion des journées de garde.
//!
//! Le formatage ne peut pas échouer : une date hors du domaine hégirien
//! retombe sur la table des mois grégoriens.

use crate::model::DutyDay;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Calendrier d'affichage des dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    /// Hégirien (calendrier lunaire)
    Lunar,
    /// Grégorien (calendrier civil)
    #[default]
    Civil,
}

impl std::str::FromStr for CalendarSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lunar" | "hijri" => Ok(CalendarSystem::Lunar),
            "civil" | "gregorian" => Ok(CalendarSystem::Civil),
            other => Err(format!("unknown calendar system: {other}")),
        }
    }
}

const CIVIL_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const LUNAR_MONTHS: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Shaban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qadah",
    "Dhu al-Hijjah",
];

/// Jour julien du 1er Muharram de l'an 1 (époque civile, 19/07/622 grégorien).
const LUNAR_EPOCH_JDN: i64 = 1_948_440;
/// Décalage entre `num_days_from_ce` et le numéro de jour julien.
const CE_TO_JDN: i64 = 1_721_425;

/// Date du calendrier hégirien tabulaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

fn lunar_to_jdn(year: i64, month: i64, day: i64) -> i64 {
    day + (59 * (month - 1) + 1) / 2 + (year - 1) * 354 + (3 + 11 * year).div_euclid(30)
        + LUNAR_EPOCH_JDN
        - 1
}

/// Conversion arithmétique (cycle de 30 ans). `None` avant l'époque hégirienne.
pub fn to_lunar(date: NaiveDate) -> Option<LunarDate> {
    let jdn = i64::from(date.num_days_from_ce()) + CE_TO_JDN;
    let year = (30 * (jdn - LUNAR_EPOCH_JDN) + 10646).div_euclid(10631);
    if year < 1 {
        return None;
    }
    let since_first = jdn - (29 + lunar_to_jdn(year, 1, 1));
    // ceil(since_first / 29.5)
    let month = (-(-2 * since_first).div_euclid(59) + 1).clamp(1, 12);
    let day = jdn - lunar_to_jdn(year, month, 1) + 1;
    Some(LunarDate {
        year,
        month: u32::try_from(month).ok()?,
        day: u32::try_from(day).ok().filter(|d| (1..=30).contains(d))?,
    })
}

/// Libellé civil, ex. `5 January 2025`.
pub fn format_civil(date: NaiveDate) -> String {
    let month = CIVIL_MONTHS[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Libellé hégirien, ex. `5 Rajab 1446 AH`. Retombe sur le libellé civil
/// si la conversion est impossible.
pub fn format_lunar(date: NaiveDate) -> String {
    match to_lunar(date) {
        Some(l) => format!(
            "{} {} {} AH",
            l.day,
            LUNAR_MONTHS[(l.month - 1) as usize],
            l.year
        ),
        None => format_civil(date),
    }
}

pub fn format_date(date: NaiveDate, calendar: CalendarSystem) -> String {
    match calendar {
        CalendarSystem::Lunar => format_lunar(date),
        CalendarSystem::Civil => format_civil(date),
    }
}

/// Décalage du jour dans la semaine scolaire (dimanche = 0 .. samedi = 6).
pub fn weekday_offset(day: Weekday) -> i64 {
    i64::from(day.num_days_from_sunday())
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "sunday",
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
    }
}

/// (Dé)sérialisation des jours par leur nom en minuscules (`sunday`, ...).
/// La lecture accepte aussi les formes courtes de chrono (`Sun`, `mon`).
pub mod weekday_serde {
    use super::weekday_name;
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::HashMap;

    fn parse<E: serde::de::Error>(raw: &str) -> Result<Weekday, E> {
        raw.parse::<Weekday>()
            .map_err(|_| E::custom(format!("unknown weekday: {raw}")))
    }

    pub fn serialize<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(weekday_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw)
    }

    pub mod list {
        use super::*;

        pub fn serialize<S: Serializer>(days: &[Weekday], s: S) -> Result<S::Ok, S::Error> {
            s.collect_seq(days.iter().map(|d| weekday_name(*d)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Weekday>, D::Error> {
            let raw = Vec::<String>::deserialize(d)?;
            raw.iter().map(|r| parse(r)).collect()
        }
    }

    /// Clés triées du dimanche au samedi.
    pub mod map {
        use super::*;

        pub fn serialize<S: Serializer>(
            map: &HashMap<Weekday, u8>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(day, _)| day.num_days_from_sunday());
            s.collect_map(entries.into_iter().map(|(day, n)| (weekday_name(*day), *n)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<HashMap<Weekday, u8>, D::Error> {
            let raw = HashMap::<String, u8>::deserialize(d)?;
            raw.iter()
                .map(|(day, n)| parse(day).map(|day| (day, *n)))
                .collect()
        }
    }
}

/// Dimanche de la semaine contenant `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(weekday_offset(date.weekday())))
        .unwrap_or(date)
}

/// Développe la semaine type en une suite ordonnée de journées (créneaux vides).
///
/// Semaine `w` (1-based), jour `d` : `dimanche(start) + (w-1)*7 + offset(d)`,
/// de sorte que `weekday` correspond toujours à la date. Une liste de jours
/// vide ou `weeks == 0` donne une suite vide.
pub fn expand(
    start: NaiveDate,
    weeks: u16,
    weekdays: &[Weekday],
    calendar: CalendarSystem,
) -> Vec<DutyDay> {
    let start = week_start(start);
    let mut out = Vec::with_capacity(usize::from(weeks) * weekdays.len());
    for week in 0..i64::from(weeks) {
        for &weekday in weekdays {
            let Some(date) = start.checked_add_signed(Duration::days(
                week * 7 + weekday_offset(weekday),
            )) else {
                continue;
            };
            out.push(DutyDay {
                weekday,
                date,
                calendar,
                civil_label: format_civil(date),
                lunar_label: format_lunar(date),
                slots: Vec::new(),
            });
        }
    }
    out
}
