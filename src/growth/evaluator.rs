use serde::{Deserialize, Serialize};

use crate::models::{MeasurementKind, Sex};

use super::reference::{GrowthReference, GrowthRow};
use super::GrowthError;

/// Clinical tier of a measurement, ordered from least to most worrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStatus {
    Normal,
    Surveillance,
    Pathologique,
}

impl GrowthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Surveillance => "surveillance",
            Self::Pathologique => "pathologique",
        }
    }

    /// Prefix used on alert lines.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Normal => "[NORMAL]",
            Self::Surveillance => "[SURVEILLANCE]",
            Self::Pathologique => "[PATHOLOGIQUE]",
        }
    }
}

/// A measurement taken at a given age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementSample {
    /// Raw clinical unit: grams, centimeters, or millimeters for head circumference.
    pub value: f64,
    pub age_months: f64,
    pub sex: Sex,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileResult {
    pub kind: MeasurementKind,
    /// Value in the reference unit (kg or cm).
    pub value: f64,
    pub percentile: u8,
    pub status: GrowthStatus,
    pub message: String,
}

/// Half-open percentile bins. A value equal to a threshold falls in the
/// higher bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    BelowP3,
    P3ToP10,
    P10ToP25,
    P25ToP50,
    P50ToP75,
    P75ToP90,
    P90ToP97,
    AboveP97,
}

impl Band {
    fn classify(value: f64, row: &GrowthRow) -> Self {
        if value < row.p3 {
            Self::BelowP3
        } else if value < row.p10 {
            Self::P3ToP10
        } else if value < row.p25 {
            Self::P10ToP25
        } else if value < row.p50 {
            Self::P25ToP50
        } else if value < row.p75 {
            Self::P50ToP75
        } else if value < row.p90 {
            Self::P75ToP90
        } else if value < row.p97 {
            Self::P90ToP97
        } else {
            Self::AboveP97
        }
    }

    fn percentile(self) -> u8 {
        match self {
            Self::BelowP3 => 1,
            Self::P3ToP10 => 5,
            Self::P10ToP25 => 17,
            Self::P25ToP50 => 37,
            Self::P50ToP75 => 62,
            Self::P75ToP90 => 82,
            Self::P90ToP97 => 93,
            Self::AboveP97 => 99,
        }
    }

    fn status(self) -> GrowthStatus {
        match self {
            Self::BelowP3 | Self::AboveP97 => GrowthStatus::Pathologique,
            Self::P3ToP10 | Self::P90ToP97 => GrowthStatus::Surveillance,
            _ => GrowthStatus::Normal,
        }
    }

    fn message(self, kind: MeasurementKind, row: &GrowthRow) -> String {
        let unit = kind.reference_unit();
        let v = |x: f64| format_measure(kind, x);
        match self {
            Self::BelowP3 => format!(
                "Below the 3rd percentile (P3 = {} {unit}): growth deficit to investigate",
                v(row.p3)
            ),
            Self::P3ToP10 => format!(
                "Between P3 ({}) and P10 ({}) {unit}: low, monitor the growth curve",
                v(row.p3),
                v(row.p10)
            ),
            Self::P10ToP25 => format!(
                "Between P10 ({}) and P25 ({}) {unit}: within the normal range",
                v(row.p10),
                v(row.p25)
            ),
            Self::P25ToP50 => format!(
                "Between P25 ({}) and P50 ({}) {unit}: within the normal range",
                v(row.p25),
                v(row.p50)
            ),
            Self::P50ToP75 => format!(
                "Between P50 ({}) and P75 ({}) {unit}: within the normal range",
                v(row.p50),
                v(row.p75)
            ),
            Self::P75ToP90 => format!(
                "Between P75 ({}) and P90 ({}) {unit}: within the normal range",
                v(row.p75),
                v(row.p90)
            ),
            Self::P90ToP97 => format!(
                "Between P90 ({}) and P97 ({}) {unit}: high, monitor the growth curve",
                v(row.p90),
                v(row.p97)
            ),
            Self::AboveP97 => format!(
                "Above the 97th percentile (P97 = {} {unit}): excess to investigate",
                v(row.p97)
            ),
        }
    }
}

/// Weights keep two decimals, lengths one.
pub(crate) fn format_measure(kind: MeasurementKind, value: f64) -> String {
    match kind {
        MeasurementKind::Weight => format!("{value:.2}"),
        MeasurementKind::Length | MeasurementKind::HeadCircumference => format!("{value:.1}"),
    }
}

/// Place one measurement on its growth chart.
///
/// `raw_value` is in the clinical input unit (grams, cm, mm); the age is
/// clamped into 0..=24 months.
pub fn evaluate(
    reference: &GrowthReference,
    raw_value: f64,
    age_months: f64,
    sex: Sex,
    kind: MeasurementKind,
) -> Result<PercentileResult, GrowthError> {
    if !raw_value.is_finite() || raw_value <= 0.0 {
        return Err(GrowthError::Validation(format!(
            "{} must be a positive number, got {raw_value}",
            kind.label()
        )));
    }
    if !age_months.is_finite() {
        return Err(GrowthError::Validation(format!(
            "age in months must be a finite number, got {age_months}"
        )));
    }

    let value = kind.to_reference_unit(raw_value);
    let row = reference.table(sex, kind)?.row_at(age_months);
    let band = Band::classify(value, &row);

    tracing::debug!(
        kind = kind.as_str(),
        sex = sex.as_str(),
        age_months,
        percentile = band.percentile(),
        "Growth measurement evaluated"
    );

    Ok(PercentileResult {
        kind,
        value,
        percentile: band.percentile(),
        status: band.status(),
        message: band.message(kind, &row),
    })
}

pub fn evaluate_sample(
    reference: &GrowthReference,
    sample: &MeasurementSample,
    kind: MeasurementKind,
) -> Result<PercentileResult, GrowthError> {
    evaluate(reference, sample.value, sample.age_months, sample.sex, kind)
}
