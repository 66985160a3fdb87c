use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::models::{MeasurementKind, Sex};

use super::evaluator::{evaluate, format_measure, GrowthStatus, PercentileResult};
use super::reference::GrowthReference;
use super::GrowthError;

/// Average month length used to turn a day count into months.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Weight, length and head circumference evaluated together at one visit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthAnalysis {
    /// Age at the visit, one decimal.
    pub age_months: f64,
    pub weight_result: PercentileResult,
    pub length_result: PercentileResult,
    pub head_result: PercentileResult,
    /// One line per non-normal measurement, prefixed by its status marker.
    pub alerts: Vec<String>,
    pub global_status: GrowthStatus,
}

/// Age in months between birth and `today`, rounded to one decimal.
///
/// Negative when the birth date is after `today`; `evaluate` clamps it to
/// the first reference row.
pub fn age_in_months(birth_date: NaiveDate, today: NaiveDate) -> f64 {
    let days = (today - birth_date).num_days();
    (days as f64 / DAYS_PER_MONTH * 10.0).round() / 10.0
}

/// Evaluate the three measurements of a visit.
///
/// Inputs are in clinical units: weight in grams, length in cm, head
/// circumference in mm.
pub fn analyze_measurements(
    reference: &GrowthReference,
    weight_g: f64,
    length_cm: f64,
    head_mm: f64,
    birth_date: NaiveDate,
    sex: Sex,
    today: NaiveDate,
) -> Result<GrowthAnalysis, GrowthError> {
    let age_months = age_in_months(birth_date, today);

    let weight_result = evaluate(reference, weight_g, age_months, sex, MeasurementKind::Weight)?;
    let length_result = evaluate(reference, length_cm, age_months, sex, MeasurementKind::Length)?;
    let head_result = evaluate(
        reference,
        head_mm,
        age_months,
        sex,
        MeasurementKind::HeadCircumference,
    )?;

    let results = [&weight_result, &length_result, &head_result];
    let alerts: Vec<String> = results
        .iter()
        .filter(|r| r.status != GrowthStatus::Normal)
        .map(|r| format_alert(r))
        .collect();
    let global_status = results
        .iter()
        .map(|r| r.status)
        .max()
        .unwrap_or(GrowthStatus::Normal);

    if global_status != GrowthStatus::Normal {
        tracing::info!(
            age_months,
            status = global_status.as_str(),
            alerts = alerts.len(),
            "Growth analysis flagged measurements"
        );
    }

    Ok(GrowthAnalysis {
        age_months,
        weight_result,
        length_result,
        head_result,
        alerts,
        global_status,
    })
}

/// `analyze_measurements` against the local calendar date.
pub fn analyze_measurements_today(
    reference: &GrowthReference,
    weight_g: f64,
    length_cm: f64,
    head_mm: f64,
    birth_date: NaiveDate,
    sex: Sex,
) -> Result<GrowthAnalysis, GrowthError> {
    let today = Local::now().date_naive();
    analyze_measurements(reference, weight_g, length_cm, head_mm, birth_date, sex, today)
}

fn format_alert(result: &PercentileResult) -> String {
    format!(
        "{} {}: {} {} (P{}) - {}",
        result.status.marker(),
        result.kind.label(),
        format_measure(result.kind, result.value),
        result.kind.reference_unit(),
        result.percentile,
        result.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_rounded_to_one_decimal() {
        // 61 days / 30.44 = 2.0039...
        assert_eq!(age_in_months(date(2024, 1, 1), date(2024, 3, 2)), 2.0);
        // 100 days / 30.44 = 3.285...
        assert_eq!(age_in_months(date(2024, 1, 1), date(2024, 4, 10)), 3.3);
        assert_eq!(age_in_months(date(2024, 1, 1), date(2024, 1, 1)), 0.0);
        // 30 days before birth
        assert_eq!(age_in_months(date(2024, 5, 1), date(2024, 4, 1)), -1.0);
    }

    #[test]
    fn future_birth_date_clamps_to_birth_row() {
        let reference = GrowthReference::bundled();
        let at_birth = analyze_measurements(
            &reference, 3300.0, 49.9, 345.0, date(2024, 6, 1), Sex::Male, date(2024, 6, 1),
        )
        .unwrap();
        let ahead = analyze_measurements(
            &reference, 3300.0, 49.9, 345.0, date(2024, 6, 2), Sex::Male, date(2024, 6, 1),
        )
        .unwrap();
        assert!(ahead.age_months <= 0.0);
        assert_eq!(ahead.weight_result, at_birth.weight_result);
        assert_eq!(ahead.length_result, at_birth.length_result);
        assert_eq!(ahead.head_result, at_birth.head_result);
        assert_eq!(ahead.global_status, at_birth.global_status);
    }

    #[test]
    fn all_normal_has_no_alerts() {
        let reference = GrowthReference::bundled();
        // Boy at birth: medians 3.3 kg, 49.9 cm, 34.5 cm.
        let a = analyze_measurements(
            &reference, 3300.0, 49.9, 345.0, date(2024, 6, 1), Sex::Male, date(2024, 6, 1),
        )
        .unwrap();
        assert_eq!(a.age_months, 0.0);
        assert_eq!(a.global_status, GrowthStatus::Normal);
        assert!(a.alerts.is_empty());
        assert_eq!(a.weight_result.percentile, 62);
    }

    #[test]
    fn global_status_is_worst_and_alerts_are_marked() {
        let reference = GrowthReference::bundled();
        // Girl at birth: weight below P3 (2.4 kg), length between P90 and P97, head normal.
        let a = analyze_measurements(
            &reference, 2200.0, 52.0, 340.0, date(2024, 6, 1), Sex::Female, date(2024, 6, 1),
        )
        .unwrap();
        assert_eq!(a.weight_result.status, GrowthStatus::Pathologique);
        assert_eq!(a.length_result.status, GrowthStatus::Surveillance);
        assert_eq!(a.head_result.status, GrowthStatus::Normal);
        assert_eq!(a.global_status, GrowthStatus::Pathologique);
        assert_eq!(a.alerts.len(), 2);
        assert!(a.alerts[0].starts_with("[PATHOLOGIQUE] Weight: 2.20 kg (P1)"), "{}", a.alerts[0]);
        assert!(a.alerts[1].starts_with("[SURVEILLANCE] Length: 52.0 cm (P93)"), "{}", a.alerts[1]);
    }

    #[test]
    fn invalid_measurement_propagates() {
        let reference = GrowthReference::bundled();
        let err = analyze_measurements(
            &reference, 4000.0, -1.0, 350.0, date(2024, 1, 1), Sex::Male, date(2024, 2, 1),
        )
        .unwrap_err();
        assert!(matches!(err, GrowthError::Validation(_)));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let reference = GrowthReference::bundled();
        let a = analyze_measurements(
            &reference, 3300.0, 49.9, 345.0, date(2024, 6, 1), Sex::Male, date(2024, 6, 1),
        )
        .unwrap();
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["globalStatus"], "normal");
        assert_eq!(json["weightResult"]["percentile"], 62);
        assert!(json["headResult"].is_object());
    }
}
