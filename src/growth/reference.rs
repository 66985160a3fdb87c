use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{MeasurementKind, Sex};

use super::tables;
use super::GrowthError;

/// Youngest and oldest ages covered by the evaluator, in months.
pub const MIN_AGE_MONTHS: f64 = 0.0;
pub const MAX_AGE_MONTHS: f64 = 24.0;

/// One chart row. Serialized as `[age_months, p3, p10, p25, p50, p75, p90, p97]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 8]", into = "[f64; 8]")]
pub struct GrowthRow {
    pub age_months: f64,
    pub p3: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p97: f64,
}

impl From<[f64; 8]> for GrowthRow {
    fn from(r: [f64; 8]) -> Self {
        Self {
            age_months: r[0],
            p3: r[1],
            p10: r[2],
            p25: r[3],
            p50: r[4],
            p75: r[5],
            p90: r[6],
            p97: r[7],
        }
    }
}

impl From<GrowthRow> for [f64; 8] {
    fn from(r: GrowthRow) -> Self {
        [r.age_months, r.p3, r.p10, r.p25, r.p50, r.p75, r.p90, r.p97]
    }
}

impl GrowthRow {
    /// The seven thresholds, P3 first.
    pub fn percentiles(&self) -> [f64; 7] {
        [self.p3, self.p10, self.p25, self.p50, self.p75, self.p90, self.p97]
    }

    fn with_percentiles(age_months: f64, p: [f64; 7]) -> Self {
        Self {
            age_months,
            p3: p[0],
            p10: p[1],
            p25: p[2],
            p50: p[3],
            p75: p[4],
            p90: p[5],
            p97: p[6],
        }
    }

    /// Linear interpolation of every percentile column at `age`.
    fn interpolate(prev: &Self, next: &Self, age: f64) -> Self {
        let span = next.age_months - prev.age_months;
        let t = age - prev.age_months;
        let a = prev.percentiles();
        let b = next.percentiles();
        let p = std::array::from_fn(|i| a[i] + t * (b[i] - a[i]) / span);
        Self::with_percentiles(age, p)
    }
}

/// Rows for one (sex, measurement) pair, ascending by age.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthTable {
    rows: Vec<GrowthRow>,
}

impl GrowthTable {
    /// Build a table, checking that it is non-empty, strictly ascending by
    /// age, finite, and non-decreasing from P3 to P97 on every row.
    pub fn new(rows: Vec<GrowthRow>) -> Result<Self, GrowthError> {
        if rows.is_empty() {
            return Err(GrowthError::ReferenceData("table has no rows".into()));
        }
        for row in &rows {
            let values: [f64; 8] = (*row).into();
            if values.iter().any(|v| !v.is_finite()) {
                return Err(GrowthError::ReferenceData(format!(
                    "non-finite value in row at {} months",
                    row.age_months
                )));
            }
            if row.percentiles().windows(2).any(|w| w[0] > w[1]) {
                return Err(GrowthError::ReferenceData(format!(
                    "percentiles decrease in row at {} months",
                    row.age_months
                )));
            }
        }
        if rows.windows(2).any(|w| w[0].age_months >= w[1].age_months) {
            return Err(GrowthError::ReferenceData(
                "rows are not strictly ascending by age".into(),
            ));
        }
        Ok(Self { rows })
    }

    fn from_static(rows: &[[f64; 8]]) -> Self {
        Self {
            rows: rows.iter().copied().map(GrowthRow::from).collect(),
        }
    }

    pub fn rows(&self) -> &[GrowthRow] {
        &self.rows
    }

    /// Reference row at `age_months` (clamped to 0..=24): the listed row when
    /// the age matches exactly, an interpolated row between the bracketing
    /// rows, or the nearest row when the table does not cover the age.
    pub fn row_at(&self, age_months: f64) -> GrowthRow {
        let age = age_months.clamp(MIN_AGE_MONTHS, MAX_AGE_MONTHS);

        if let Some(row) = self.rows.iter().find(|r| r.age_months == age) {
            return *row;
        }

        if let Some(pair) = self
            .rows
            .windows(2)
            .find(|w| w[0].age_months < age && age < w[1].age_months)
        {
            return GrowthRow::interpolate(&pair[0], &pair[1], age);
        }

        // Non-empty by construction.
        let mut nearest = self.rows[0];
        for row in &self.rows[1..] {
            if (row.age_months - age).abs() < (nearest.age_months - age).abs() {
                nearest = *row;
            }
        }
        nearest
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReferenceFile {
    tables: Vec<ReferenceFileTable>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReferenceFileTable {
    sex: Sex,
    kind: MeasurementKind,
    rows: Vec<GrowthRow>,
}

const ALL_SEXES: [Sex; 2] = [Sex::Male, Sex::Female];
const ALL_KINDS: [MeasurementKind; 3] = [
    MeasurementKind::Weight,
    MeasurementKind::Length,
    MeasurementKind::HeadCircumference,
];

/// Immutable set of growth tables, one per (sex, measurement).
///
/// Built once at startup and shared by reference (`Arc` in `CoreState`).
#[derive(Debug, Clone)]
pub struct GrowthReference {
    tables: HashMap<(Sex, MeasurementKind), GrowthTable>,
}

impl GrowthReference {
    /// The tables compiled into the crate.
    pub fn bundled() -> Self {
        let bundled = [
            (Sex::Male, MeasurementKind::Weight, tables::BOYS_WEIGHT),
            (Sex::Female, MeasurementKind::Weight, tables::GIRLS_WEIGHT),
            (Sex::Male, MeasurementKind::Length, tables::BOYS_LENGTH),
            (Sex::Female, MeasurementKind::Length, tables::GIRLS_LENGTH),
            (Sex::Male, MeasurementKind::HeadCircumference, tables::BOYS_HEAD),
            (Sex::Female, MeasurementKind::HeadCircumference, tables::GIRLS_HEAD),
        ];
        let tables = bundled
            .into_iter()
            .map(|(sex, kind, rows)| ((sex, kind), GrowthTable::from_static(rows)))
            .collect();
        Self { tables }
    }

    /// Load tables from a JSON file. Every (sex, measurement) pair must be
    /// present exactly once and pass `GrowthTable::new` validation.
    pub fn load(path: &Path) -> Result<Self, GrowthError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| {
                GrowthError::ReferenceDataLoad(path.display().to_string(), e.to_string())
            })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, GrowthError> {
        let file: ReferenceFile = serde_json::from_str(json)?;

        let mut tables = HashMap::new();
        for entry in file.tables {
            let key = (entry.sex, entry.kind);
            let table = GrowthTable::new(entry.rows).map_err(|e| {
                GrowthError::ReferenceData(format!("{} {}: {e}", entry.sex, entry.kind))
            })?;
            if tables.insert(key, table).is_some() {
                return Err(GrowthError::ReferenceData(format!(
                    "duplicate table for {} {}",
                    entry.sex, entry.kind
                )));
            }
        }

        for sex in ALL_SEXES {
            for kind in ALL_KINDS {
                if !tables.contains_key(&(sex, kind)) {
                    return Err(GrowthError::ReferenceData(format!(
                        "missing table for {sex} {kind}"
                    )));
                }
            }
        }

        tracing::info!(tables = tables.len(), "Growth reference tables loaded");
        Ok(Self { tables })
    }

    /// Serialize back to the file format accepted by `from_json`.
    pub fn to_json(&self) -> Result<String, GrowthError> {
        let mut entries = Vec::new();
        for sex in ALL_SEXES {
            for kind in ALL_KINDS {
                if let Some(table) = self.tables.get(&(sex, kind)) {
                    entries.push(ReferenceFileTable {
                        sex,
                        kind,
                        rows: table.rows.clone(),
                    });
                }
            }
        }
        Ok(serde_json::to_string_pretty(&ReferenceFile { tables: entries })?)
    }

    pub fn table(&self, sex: Sex, kind: MeasurementKind) -> Result<&GrowthTable, GrowthError> {
        self.tables.get(&(sex, kind)).ok_or_else(|| {
            GrowthError::ReferenceData(format!("no table for {sex} {kind}"))
        })
    }
}
