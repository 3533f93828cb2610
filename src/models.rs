use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use arrow::datatypes::DataType;
use crate::{Error, QUALITY_REVIEW_MARKER, QUALITY_REVIEW_SCALE, RATING_MARKER, RATING_SCALE};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum SchoolType {
    HighSchool,
    ElementaryMiddle,
    HighSchoolTransfer,
    District75,
    EarlyChildhood,
}

impl SchoolType {
    pub const ALL: [SchoolType; 5] = [
        SchoolType::HighSchool,
        SchoolType::ElementaryMiddle,
        SchoolType::HighSchoolTransfer,
        SchoolType::District75,
        SchoolType::EarlyChildhood,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SchoolType::HighSchool => "hs",
            SchoolType::ElementaryMiddle => "ems",
            SchoolType::HighSchoolTransfer => "hst",
            SchoolType::District75 => "d75",
            SchoolType::EarlyChildhood => "ec",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|school_type| school_type.key() == key)
    }

    /// File name of the combined dataset shipped for this school type.
    pub fn default_source(&self) -> String {
        format!("final_combined_{}_data.csv", self.key())
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SchoolType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| Error::InvalidSchoolType(s.to_string()))
    }
}

impl From<SchoolType> for String {
    fn from(school_type: SchoolType) -> Self {
        school_type.key().to_string()
    }
}

/// Value domain of a metric column, decided from its name and inferred type.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Numeric,
    RatingScale,
    QualityReview,
    GenericCategorical,
}

impl MetricKind {
    pub fn from_column(name: &str, data_type: &DataType) -> Self {
        if is_numeric_type(data_type) {
            MetricKind::Numeric
        } else if name.contains(RATING_MARKER) {
            MetricKind::RatingScale
        } else if name.contains(QUALITY_REVIEW_MARKER) {
            MetricKind::QualityReview
        } else {
            MetricKind::GenericCategorical
        }
    }

    pub fn vocabulary(&self) -> Option<&'static HashMap<&'static str, f64>> {
        match self {
            MetricKind::RatingScale => Some(&*RATING_SCALE),
            MetricKind::QualityReview => Some(&*QUALITY_REVIEW_SCALE),
            MetricKind::Numeric | MetricKind::GenericCategorical => None,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Numeric => write!(f, "numeric"),
            MetricKind::RatingScale => write!(f, "rating scale"),
            MetricKind::QualityReview => write!(f, "quality review"),
            MetricKind::GenericCategorical => write!(f, "categorical"),
        }
    }
}

// An all-missing column infers as Null; it aggregates like an empty numeric column.
fn is_numeric_type(data_type: &DataType) -> bool {
    data_type.is_numeric() || matches!(data_type, DataType::Boolean | DataType::Null)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDistrict {
    pub average_score: Option<f64>,
    pub frequency: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyDistrict {
    pub frequency: BTreeMap<String, u64>,
}

/// Per-district result, keyed by district code in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DistrictAggregates {
    Numeric(BTreeMap<i64, f64>),
    Scored(BTreeMap<i64, ScoredDistrict>),
    Frequency(BTreeMap<i64, FrequencyDistrict>),
}

impl DistrictAggregates {
    pub fn districts(&self) -> Vec<i64> {
        match self {
            DistrictAggregates::Numeric(map) => map.keys().copied().collect(),
            DistrictAggregates::Scored(map) => map.keys().copied().collect(),
            DistrictAggregates::Frequency(map) => map.keys().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DistrictAggregates::Numeric(map) => map.len(),
            DistrictAggregates::Scored(map) => map.len(),
            DistrictAggregates::Frequency(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
