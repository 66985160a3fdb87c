//! Pregnancy calendar computed from the last menstrual period (LMP).

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Trimester;

#[derive(Error, Debug, PartialEq)]
pub enum PregnancyError {
    #[error("Validation error: {0}")]
    Validation(String),
}

pub const PREGNANCY_DAYS: i64 = 280;
/// Past 41 SA the pregnancy is post-term.
pub const POST_TERM_WEEKS: u32 = 41;

/// Age in completed weeks plus days since the LMP ("SA").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GestationalAge {
    pub weeks: u32,
    pub days: u32,
}

impl GestationalAge {
    pub fn from_days(total: u32) -> Self {
        Self {
            weeks: total / 7,
            days: total % 7,
        }
    }

    pub fn total_days(&self) -> u32 {
        self.weeks * 7 + self.days
    }

    pub fn trimester(&self) -> Trimester {
        match self.weeks {
            0..=13 => Trimester::First,
            14..=27 => Trimester::Second,
            _ => Trimester::Third,
        }
    }
}

impl std::fmt::Display for GestationalAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} SA + {} d", self.weeks, self.days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    PregnancyDeclaration,
    FirstUltrasound,
    GlucoseScreening,
    SecondUltrasound,
    ThirdUltrasound,
    AnaesthesiaConsultation,
    Term,
    DueDate,
}

impl MilestoneKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PregnancyDeclaration => "Pregnancy declaration",
            Self::FirstUltrasound => "First trimester ultrasound",
            Self::GlucoseScreening => "Gestational diabetes screening",
            Self::SecondUltrasound => "Second trimester ultrasound",
            Self::ThirdUltrasound => "Third trimester ultrasound",
            Self::AnaesthesiaConsultation => "Anaesthesia consultation",
            Self::Term => "Term",
            Self::DueDate => "Due date",
        }
    }

    /// Window as (first day, last day) counted in days since the LMP.
    fn window(&self) -> (i64, i64) {
        match self {
            Self::PregnancyDeclaration => (0, 15 * 7 - 1),
            Self::FirstUltrasound => (11 * 7, 13 * 7 + 6),
            Self::GlucoseScreening => (24 * 7, 28 * 7 + 6),
            Self::SecondUltrasound => (20 * 7, 24 * 7 + 6),
            Self::ThirdUltrasound => (30 * 7, 34 * 7 + 6),
            Self::AnaesthesiaConsultation => (32 * 7, 36 * 7 + 6),
            Self::Term => (37 * 7, 41 * 7 + 6),
            Self::DueDate => (PREGNANCY_DAYS, PREGNANCY_DAYS),
        }
    }
}

const MILESTONES: [MilestoneKind; 8] = [
    MilestoneKind::PregnancyDeclaration,
    MilestoneKind::FirstUltrasound,
    MilestoneKind::SecondUltrasound,
    MilestoneKind::GlucoseScreening,
    MilestoneKind::ThirdUltrasound,
    MilestoneKind::AnaesthesiaConsultation,
    MilestoneKind::Term,
    MilestoneKind::DueDate,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Done,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: MilestoneStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyCalendar {
    pub lmp: NaiveDate,
    pub due_date: NaiveDate,
    pub gestational_age: GestationalAge,
    pub trimester: Trimester,
    /// Negative once the due date has passed.
    pub days_until_due: i64,
    pub post_term: bool,
    pub milestones: Vec<Milestone>,
}

impl PregnancyCalendar {
    pub fn current_milestones(&self) -> impl Iterator<Item = &Milestone> {
        self.milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Current)
    }

    pub fn next_milestone(&self) -> Option<&Milestone> {
        self.milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Upcoming)
            .min_by_key(|m| m.start)
    }
}

pub fn pregnancy_calendar(
    lmp: NaiveDate,
    today: NaiveDate,
) -> Result<PregnancyCalendar, PregnancyError> {
    if lmp > today {
        return Err(PregnancyError::Validation(format!(
            "last menstrual period {lmp} is after {today}"
        )));
    }

    let elapsed = u32::try_from((today - lmp).num_days())
        .map_err(|_| PregnancyError::Validation(format!("LMP {lmp} is too far in the past")))?;
    let gestational_age = GestationalAge::from_days(elapsed);
    let due_date = lmp + Duration::days(PREGNANCY_DAYS);

    let milestones = MILESTONES
        .iter()
        .map(|kind| {
            let (from, to) = kind.window();
            let start = lmp + Duration::days(from);
            let end = lmp + Duration::days(to);
            let status = if today > end {
                MilestoneStatus::Done
            } else if today >= start {
                MilestoneStatus::Current
            } else {
                MilestoneStatus::Upcoming
            };
            Milestone {
                kind: *kind,
                label: kind.label().to_string(),
                start,
                end,
                status,
            }
        })
        .collect();

    Ok(PregnancyCalendar {
        lmp,
        due_date,
        gestational_age,
        trimester: gestational_age.trimester(),
        days_until_due: (due_date - today).num_days(),
        post_term: gestational_age.total_days() > POST_TERM_WEEKS * 7,
        milestones,
    })
}
