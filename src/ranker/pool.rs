//! Built-in candidate pool of common LOINC lab codes.

use std::path::Path;

use super::PoolEntry;
use crate::table::{TableError, read_table};

/// Common laboratory test codes used as the default ranking pool.
const DEFAULT_POOL: &[(&str, &str)] = &[
    ("718-7", "Hemoglobin [Mass/volume] in Blood"),
    (
        "4544-3",
        "Hematocrit [Volume Fraction] of Blood by Automated count",
    ),
    ("751-8", "Neutrophils [#/volume] in Blood by Automated count"),
    ("731-0", "Lymphocytes [#/volume] in Blood by Automated count"),
    ("785-6", "MCH [Entitic mass] by Automated count"),
    ("786-4", "MCHC [Mass/volume] by Automated count"),
    ("787-2", "MCV [Entitic volume] by Automated count"),
    (
        "788-0",
        "Erythrocyte distribution width [Ratio] by Automated count",
    ),
    ("777-3", "Platelets [#/volume] in Blood by Automated count"),
    ("2345-7", "Glucose [Mass/volume] in Serum or Plasma"),
    ("2160-0", "Creatinine [Mass/volume] in Serum or Plasma"),
    ("3094-0", "BUN [Mass/volume] in Serum or Plasma"),
    ("2093-3", "Cholesterol [Mass/volume] in Serum or Plasma"),
    ("2571-8", "Triglyceride [Mass/volume] in Serum or Plasma"),
    (
        "1920-8",
        "AST [Enzymatic activity/volume] in Serum or Plasma",
    ),
    (
        "1742-6",
        "Alanine aminotransferase [Enzymatic activity/volume] in Serum or Plasma",
    ),
    (
        "6768-6",
        "Alkaline phosphatase [Enzymatic activity/volume] in Serum or Plasma",
    ),
    ("1975-2", "Total Bilirubin [Mass/volume] in Serum or Plasma"),
    ("2085-9", "HDL Cholesterol [Mass/volume] in Serum or Plasma"),
    ("2089-1", "LDL Cholesterol [Mass/volume] in Serum or Plasma"),
];

/// Returns the built-in pool of 20 common lab test codes.
pub fn default_pool() -> Vec<PoolEntry> {
    DEFAULT_POOL
        .iter()
        .map(|(code, display_name)| PoolEntry {
            code: (*code).to_string(),
            display_name: (*display_name).to_string(),
        })
        .collect()
}

/// Loads a candidate pool from a CSV file.
///
/// The first two columns are taken as code and description; the first row is
/// treated as a header.
pub fn pool_from_csv(path: &Path) -> Result<Vec<PoolEntry>, TableError> {
    let table = read_table(path)?;
    Ok(table
        .rows()
        .map(|row| PoolEntry {
            code: row.first().cloned().unwrap_or_default(),
            display_name: row.get(1).cloned().unwrap_or_default(),
        })
        .collect())
}
