//! Rule-based alerting on prenatal consultation vitals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Proteinuria;

#[derive(Error, Debug, PartialEq)]
pub enum VitalsError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Gestational age from which hypertension with proteinuria suggests pre-eclampsia.
pub const PRE_ECLAMPSIA_MIN_WEEKS: u32 = 20;

/// Readings taken during a prenatal consultation. Absent readings are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrenatalVitals {
    /// mmHg
    pub systolic: Option<f64>,
    /// mmHg
    pub diastolic: Option<f64>,
    /// Maternal heart rate, bpm.
    pub heart_rate: Option<f64>,
    /// °C
    pub temperature: Option<f64>,
    /// bpm
    pub fetal_heart_rate: Option<f64>,
    pub proteinuria: Option<Proteinuria>,
    pub gestational_weeks: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalAlertKind {
    SevereHypertension,
    Hypertension,
    PreEclampsia,
    Hypotension,
    MaternalTachycardia,
    MaternalBradycardia,
    Fever,
    FetalBradycardia,
    FetalTachycardia,
    Proteinuria,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalAlert {
    pub kind: VitalAlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsAssessment {
    pub alerts: Vec<VitalAlert>,
    /// Highest alert severity, `Info` when nothing fired.
    pub overall: AlertSeverity,
}

impl VitalsAssessment {
    pub fn has_critical(&self) -> bool {
        self.overall == AlertSeverity::Critical
    }
}

pub fn check_prenatal_vitals(vitals: &PrenatalVitals) -> Result<VitalsAssessment, VitalsError> {
    validate(vitals)?;

    let mut alerts = Vec::new();
    let significant_proteinuria = vitals.proteinuria.is_some_and(|p| p >= Proteinuria::Plus);
    let mut proteinuria_explained = false;

    if let (Some(sys), Some(dia)) = (vitals.systolic, vitals.diastolic) {
        let bp = format!("{sys:.0}/{dia:.0} mmHg");
        let hypertensive = sys >= 140.0 || dia >= 90.0;
        let past_20_weeks = vitals
            .gestational_weeks
            .is_some_and(|w| w >= PRE_ECLAMPSIA_MIN_WEEKS);

        if hypertensive && significant_proteinuria && past_20_weeks {
            proteinuria_explained = true;
            let proteinuria = vitals.proteinuria.map(|p| p.as_str()).unwrap_or_default();
            alerts.push(alert(
                VitalAlertKind::PreEclampsia,
                AlertSeverity::Critical,
                format!("Suspected pre-eclampsia: BP {bp} with proteinuria {proteinuria}"),
            ));
        } else if sys >= 160.0 || dia >= 110.0 {
            alerts.push(alert(
                VitalAlertKind::SevereHypertension,
                AlertSeverity::Critical,
                format!("Severe hypertension: BP {bp}"),
            ));
        } else if hypertensive {
            alerts.push(alert(
                VitalAlertKind::Hypertension,
                AlertSeverity::Warning,
                format!("Hypertension: BP {bp} (threshold 140/90)"),
            ));
        } else if sys < 90.0 || dia < 60.0 {
            alerts.push(alert(
                VitalAlertKind::Hypotension,
                AlertSeverity::Warning,
                format!("Hypotension: BP {bp}"),
            ));
        }
    }

    if let Some(hr) = vitals.heart_rate {
        if hr > 120.0 {
            alerts.push(alert(
                VitalAlertKind::MaternalTachycardia,
                AlertSeverity::Critical,
                format!("Marked maternal tachycardia: {hr:.0} bpm"),
            ));
        } else if hr > 100.0 {
            alerts.push(alert(
                VitalAlertKind::MaternalTachycardia,
                AlertSeverity::Warning,
                format!("Maternal tachycardia: {hr:.0} bpm"),
            ));
        } else if hr < 50.0 {
            alerts.push(alert(
                VitalAlertKind::MaternalBradycardia,
                AlertSeverity::Warning,
                format!("Maternal bradycardia: {hr:.0} bpm"),
            ));
        }
    }

    if let Some(t) = vitals.temperature {
        if t >= 39.0 {
            alerts.push(alert(
                VitalAlertKind::Fever,
                AlertSeverity::Critical,
                format!("High fever: {t:.1} °C"),
            ));
        } else if t >= 38.0 {
            alerts.push(alert(
                VitalAlertKind::Fever,
                AlertSeverity::Warning,
                format!("Fever: {t:.1} °C"),
            ));
        }
    }

    if let Some(fhr) = vitals.fetal_heart_rate {
        let (kind, word) = if fhr < 110.0 {
            (VitalAlertKind::FetalBradycardia, "bradycardia")
        } else {
            (VitalAlertKind::FetalTachycardia, "tachycardia")
        };
        if !(100.0..=180.0).contains(&fhr) {
            alerts.push(alert(
                kind,
                AlertSeverity::Critical,
                format!("Severe fetal {word}: {fhr:.0} bpm"),
            ));
        } else if !(110.0..=160.0).contains(&fhr) {
            alerts.push(alert(
                kind,
                AlertSeverity::Warning,
                format!("Fetal {word}: {fhr:.0} bpm (normal 110-160)"),
            ));
        }
    }

    if !proteinuria_explained {
        if let Some(p) = vitals.proteinuria.filter(|p| *p >= Proteinuria::PlusPlus) {
            alerts.push(alert(
                VitalAlertKind::Proteinuria,
                AlertSeverity::Warning,
                format!("Proteinuria {}", p.as_str()),
            ));
        }
    }

    let overall = alerts
        .iter()
        .map(|a| a.severity)
        .max()
        .unwrap_or(AlertSeverity::Info);

    if overall == AlertSeverity::Critical {
        tracing::warn!(alerts = alerts.len(), "Critical prenatal vitals");
    }

    Ok(VitalsAssessment { alerts, overall })
}

fn alert(kind: VitalAlertKind, severity: AlertSeverity, message: String) -> VitalAlert {
    VitalAlert {
        kind,
        severity,
        message,
    }
}

fn validate(vitals: &PrenatalVitals) -> Result<(), VitalsError> {
    let readings = [
        ("systolic", vitals.systolic),
        ("diastolic", vitals.diastolic),
        ("heart rate", vitals.heart_rate),
        ("temperature", vitals.temperature),
        ("fetal heart rate", vitals.fetal_heart_rate),
    ];
    for (name, value) in readings {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(VitalsError::Validation(format!(
                    "{name} must be a positive number, got {v}"
                )));
            }
        }
    }

    match (vitals.systolic, vitals.diastolic) {
        (Some(sys), Some(dia)) if dia >= sys => Err(VitalsError::Validation(format!(
            "diastolic ({dia}) must be lower than systolic ({sys})"
        ))),
        (Some(_), None) | (None, Some(_)) => Err(VitalsError::Validation(
            "blood pressure needs both systolic and diastolic".into(),
        )),
        _ => Ok(()),
    }
}
