use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use crate::{
    classify, Dataset, DistrictAggregates, Error, FrequencyDistrict, MetricKind, ScoredDistrict,
    NO_SCALE_MAX, ORDINAL_MAX_SCORE,
};

pub fn aggregate_by_district(dataset: &Dataset, metric: &str) -> Result<DistrictAggregates, Error> {
    let kind = classify(dataset, metric)?;
    debug!("Aggregating {} metric '{}' for {}", kind, metric, dataset.school_type());

    let aggregates = match (kind, kind.vocabulary()) {
        (MetricKind::Numeric, _) => DistrictAggregates::Numeric(district_means(dataset, metric)?),
        (_, Some(vocabulary)) => {
            let scored = labels_by_district(dataset, metric)?
                .into_iter()
                .map(|(district, labels)| {
                    let scores: Vec<f64> = labels
                        .iter()
                        .filter_map(|label| vocabulary.get(label.as_str()).copied())
                        .collect();

                    let average_score = if scores.is_empty() {
                        None
                    } else {
                        Some(scores.iter().sum::<f64>() / scores.len() as f64)
                    };

                    (district, ScoredDistrict { average_score, frequency: frequency(&labels) })
                })
                .collect();
            DistrictAggregates::Scored(scored)
        }
        (_, None) => {
            let counted = labels_by_district(dataset, metric)?
                .into_iter()
                .map(|(district, labels)| (district, FrequencyDistrict { frequency: frequency(&labels) }))
                .collect();
            DistrictAggregates::Frequency(counted)
        }
    };

    Ok(aggregates)
}

/// Legend maximum for a metric. `None` when a numeric column has no values at all.
pub fn max_value(dataset: &Dataset, metric: &str) -> Result<Option<f64>, Error> {
    let max = match classify(dataset, metric)? {
        MetricKind::Numeric => dataset
            .numeric_values(metric)?
            .into_iter()
            .flatten()
            .map(OrderedFloat)
            .max()
            .map(|max| max.into_inner()),
        MetricKind::RatingScale | MetricKind::QualityReview => Some(ORDINAL_MAX_SCORE),
        MetricKind::GenericCategorical => Some(NO_SCALE_MAX),
    };

    Ok(max)
}

/// Mean of the non-missing values per district, ascending by district code.
pub fn district_means(dataset: &Dataset, metric: &str) -> Result<BTreeMap<i64, f64>, Error> {
    Ok(district_sums(dataset, metric)?
        .into_iter()
        .map(|(district, (sum, count))| (district, sum / count as f64))
        .collect())
}

/// Number of non-missing values per district.
pub fn district_counts(dataset: &Dataset, metric: &str) -> Result<BTreeMap<i64, u64>, Error> {
    Ok(district_sums(dataset, metric)?
        .into_iter()
        .map(|(district, (_, count))| (district, count))
        .collect())
}

/// Sum and count of the non-missing values per district.
pub fn district_sums(dataset: &Dataset, metric: &str) -> Result<BTreeMap<i64, (f64, u64)>, Error> {
    let values = dataset.numeric_values(metric)?;
    let districts = dataset.district_codes()?;

    let mut sums: BTreeMap<i64, (f64, u64)> = BTreeMap::new();
    for (district, value) in districts.into_iter().zip(values) {
        let (Some(district), Some(value)) = (valid_district(district), value) else {
            continue;
        };
        let entry = sums.entry(district).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    Ok(sums)
}

// Rows with a missing label or district are dropped before grouping.
fn labels_by_district(dataset: &Dataset, metric: &str) -> Result<BTreeMap<i64, Vec<String>>, Error> {
    let labels = dataset.label_values(metric)?;
    let districts = dataset.district_codes()?;

    let grouped: HashMap<i64, Vec<String>> = districts
        .into_iter()
        .zip(labels)
        .filter_map(|(district, label)| Some((valid_district(district)?, label?)))
        .into_group_map();

    Ok(grouped.into_iter().collect())
}

fn frequency(labels: &[String]) -> BTreeMap<String, u64> {
    labels
        .iter()
        .counts()
        .into_iter()
        .map(|(label, count)| (label.clone(), count as u64))
        .collect()
}

fn valid_district(district: Option<i64>) -> Option<i64> {
    district.filter(|code| *code >= 0)
}
