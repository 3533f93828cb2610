use std::collections::HashMap;
use lazy_static::lazy_static;
use crate::SchoolType;

/// School identifier column, present in every dataset.
pub const DBN_COLUMN: &str = "DBN";
/// Grouping key for every district aggregate.
pub const DISTRICT_COLUMN: &str = "Geographical_District_code";
pub const ID_COLUMNS: [&str; 2] = [DBN_COLUMN, DISTRICT_COLUMN];

pub const RATING_MARKER: &str = "Rating";
pub const QUALITY_REVIEW_MARKER: &str = "Quality Review";

/// Top of both ordinal vocabularies; used as the fixed legend maximum.
pub const ORDINAL_MAX_SCORE: f64 = 1.0;
/// Legend maximum reported for metrics without a numeric scale.
pub const NO_SCALE_MAX: f64 = 0.0;

pub const DEFAULT_SCHOOL_TYPE: SchoolType = SchoolType::HighSchool;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_GEOJSON_FILE: &str = "school_districts.geojson";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5004;

pub const BATCH_SIZE: usize = 1024;

/// Relative difference (in percent) above which a validated mean is a discrepancy.
pub const VALIDATION_TOLERANCE_PERCENT: f64 = 1e-6;

/// CSV cell values read as missing, matching the markers dataframe readers use.
pub const MISSING_VALUE_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

lazy_static! {
    pub static ref RATING_SCALE: HashMap<&'static str, f64> = HashMap::from([
        ("Not Meeting Target", 0.0),
        ("Approaching Target", 0.3),
        ("Meeting Target", 0.7),
        ("Exceeding Target", 1.0),
    ]);

    pub static ref QUALITY_REVIEW_SCALE: HashMap<&'static str, f64> = HashMap::from([
        ("Under Developed", 0.0),
        ("Developing", 0.3),
        ("Proficient", 0.7),
        ("Well Developed", 1.0),
    ]);
}
