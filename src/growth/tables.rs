//! Bundled infant growth reference tables, 0 to 24 months.
//!
//! Row layout: `[age_months, p3, p10, p25, p50, p75, p90, p97]`.
//! Weight in kg, length and head circumference in cm. Values are rounded from
//! the WHO child growth standards as charted in the practice's health booklets.

pub(crate) const BOYS_WEIGHT: &[[f64; 8]] = &[
    [0.0, 2.5, 2.8, 3.0, 3.3, 3.7, 3.9, 4.3],
    [1.0, 3.4, 3.9, 4.5, 4.9, 5.4, 5.9, 6.5],
    [2.0, 4.4, 4.9, 5.3, 5.6, 6.0, 6.6, 7.1],
    [3.0, 5.1, 5.5, 6.0, 6.4, 6.8, 7.2, 7.7],
    [4.0, 5.6, 6.1, 6.5, 7.0, 7.4, 7.9, 8.4],
    [5.0, 6.1, 6.5, 7.0, 7.5, 8.0, 8.4, 9.0],
    [6.0, 6.4, 6.9, 7.4, 7.9, 8.4, 8.9, 9.5],
    [9.0, 7.1, 7.6, 8.2, 8.9, 9.4, 9.9, 10.5],
    [12.0, 7.7, 8.2, 8.9, 9.6, 10.2, 10.8, 11.5],
    [15.0, 8.2, 8.7, 9.4, 10.3, 10.9, 11.5, 12.3],
    [18.0, 8.6, 9.2, 9.9, 10.9, 11.6, 12.2, 13.1],
    [21.0, 9.1, 9.7, 10.4, 11.5, 12.2, 12.9, 13.8],
    [24.0, 9.7, 10.2, 10.9, 12.2, 12.9, 13.6, 14.6],
];

pub(crate) const GIRLS_WEIGHT: &[[f64; 8]] = &[
    [0.0, 2.4, 2.7, 2.9, 3.2, 3.6, 3.8, 4.2],
    [1.0, 3.2, 3.6, 4.1, 4.5, 4.9, 5.4, 5.9],
    [2.0, 4.0, 4.5, 4.9, 5.2, 5.6, 6.1, 6.6],
    [3.0, 4.6, 5.0, 5.5, 5.8, 6.3, 6.7, 7.3],
    [4.0, 5.1, 5.5, 6.0, 6.4, 6.8, 7.3, 7.9],
    [5.0, 5.5, 5.9, 6.4, 6.9, 7.3, 7.8, 8.4],
    [6.0, 5.8, 6.3, 6.7, 7.3, 7.7, 8.2, 8.8],
    [9.0, 6.6, 7.0, 7.5, 8.2, 8.7, 9.3, 9.9],
    [12.0, 7.1, 7.6, 8.2, 8.9, 9.5, 10.1, 10.9],
    [15.0, 7.6, 8.1, 8.7, 9.6, 10.2, 10.9, 11.7],
    [18.0, 8.1, 8.6, 9.2, 10.2, 10.9, 11.6, 12.5],
    [21.0, 8.6, 9.1, 9.8, 10.9, 11.5, 12.3, 13.2],
    [24.0, 9.0, 9.6, 10.3, 11.5, 12.2, 13.0, 14.0],
];

pub(crate) const BOYS_LENGTH: &[[f64; 8]] = &[
    [0.0, 46.3, 47.5, 48.6, 49.9, 51.1, 52.2, 53.4],
    [1.0, 51.1, 52.2, 53.4, 54.7, 56.0, 57.2, 58.4],
    [2.0, 54.7, 55.9, 57.1, 58.4, 59.7, 60.9, 62.2],
    [3.0, 57.6, 58.8, 60.1, 61.4, 62.7, 64.0, 65.3],
    [4.0, 60.0, 61.2, 62.5, 63.9, 65.2, 66.5, 67.8],
    [5.0, 61.9, 63.2, 64.5, 65.9, 67.3, 68.6, 69.9],
    [6.0, 63.6, 64.9, 66.2, 67.6, 69.0, 70.3, 71.6],
    [9.0, 67.7, 69.1, 70.6, 72.0, 73.5, 74.8, 76.2],
    [12.0, 71.3, 72.8, 74.3, 75.7, 77.2, 78.6, 80.2],
    [15.0, 74.4, 75.9, 77.4, 79.1, 80.7, 82.1, 83.7],
    [18.0, 77.2, 78.7, 80.4, 82.3, 83.9, 85.4, 87.1],
    [21.0, 79.7, 81.3, 83.1, 85.1, 86.9, 88.4, 90.2],
    [24.0, 81.7, 83.5, 85.5, 87.8, 89.6, 91.2, 93.1],
];

pub(crate) const GIRLS_LENGTH: &[[f64; 8]] = &[
    [0.0, 45.6, 46.8, 47.9, 49.1, 50.4, 51.5, 52.7],
    [1.0, 50.0, 51.2, 52.4, 53.7, 55.0, 56.2, 57.4],
    [2.0, 53.2, 54.5, 55.7, 57.1, 58.4, 59.6, 60.9],
    [3.0, 55.8, 57.1, 58.4, 59.8, 61.2, 62.5, 63.8],
    [4.0, 58.0, 59.3, 60.6, 62.1, 63.5, 64.8, 66.2],
    [5.0, 59.9, 61.2, 62.5, 64.0, 65.5, 66.8, 68.2],
    [6.0, 61.5, 62.8, 64.2, 65.7, 67.2, 68.6, 70.0],
    [9.0, 65.6, 67.0, 68.5, 70.1, 71.8, 73.2, 74.7],
    [12.0, 69.2, 70.7, 72.3, 74.0, 75.8, 77.3, 78.9],
    [15.0, 72.4, 74.0, 75.7, 77.5, 79.3, 80.9, 82.7],
    [18.0, 75.2, 76.9, 78.7, 80.7, 82.6, 84.3, 86.2],
    [21.0, 77.9, 79.6, 81.5, 83.7, 85.6, 87.4, 89.4],
    [24.0, 80.3, 82.1, 84.1, 86.4, 88.4, 90.3, 92.4],
];

pub(crate) const BOYS_HEAD: &[[f64; 8]] = &[
    [0.0, 32.1, 32.8, 33.6, 34.5, 35.3, 36.1, 36.9],
    [1.0, 35.1, 35.8, 36.5, 37.3, 38.1, 38.8, 39.5],
    [2.0, 36.9, 37.6, 38.3, 39.1, 39.9, 40.6, 41.3],
    [3.0, 38.3, 39.0, 39.7, 40.5, 41.3, 42.0, 42.7],
    [4.0, 39.4, 40.1, 40.8, 41.6, 42.4, 43.1, 43.9],
    [5.0, 40.3, 41.0, 41.7, 42.6, 43.4, 44.1, 44.8],
    [6.0, 41.0, 41.7, 42.5, 43.3, 44.2, 44.9, 45.6],
    [9.0, 42.6, 43.3, 44.1, 44.9, 45.8, 46.5, 47.2],
    [12.0, 43.6, 44.3, 45.1, 46.1, 46.9, 47.7, 48.4],
    [15.0, 44.3, 45.0, 45.8, 46.8, 47.7, 48.4, 49.2],
    [18.0, 44.8, 45.6, 46.4, 47.4, 48.3, 49.1, 49.9],
    [21.0, 45.3, 46.1, 46.9, 47.8, 48.8, 49.6, 50.4],
    [24.0, 45.7, 46.5, 47.3, 48.3, 49.2, 50.0, 50.8],
];

pub(crate) const GIRLS_HEAD: &[[f64; 8]] = &[
    [0.0, 31.7, 32.4, 33.1, 33.9, 34.7, 35.4, 36.1],
    [1.0, 34.3, 35.0, 35.8, 36.5, 37.3, 38.0, 38.8],
    [2.0, 36.0, 36.7, 37.4, 38.3, 39.1, 39.8, 40.5],
    [3.0, 37.2, 37.9, 38.7, 39.5, 40.4, 41.1, 41.9],
    [4.0, 38.2, 38.9, 39.7, 40.6, 41.4, 42.2, 42.9],
    [5.0, 39.0, 39.7, 40.5, 41.5, 42.3, 43.0, 43.8],
    [6.0, 39.7, 40.4, 41.2, 42.2, 43.0, 43.8, 44.6],
    [9.0, 41.2, 41.9, 42.8, 43.8, 44.6, 45.4, 46.3],
    [12.0, 42.2, 43.0, 43.8, 44.9, 45.7, 46.5, 47.4],
    [15.0, 42.9, 43.7, 44.5, 45.6, 46.5, 47.3, 48.2],
    [18.0, 43.5, 44.3, 45.1, 46.2, 47.1, 47.9, 48.8],
    [21.0, 44.0, 44.8, 45.6, 46.7, 47.6, 48.4, 49.3],
    [24.0, 44.4, 45.2, 46.1, 47.2, 48.0, 48.9, 49.8],
];
