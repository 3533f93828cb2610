use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use object_store::{memory::InMemory, path::Path, ObjectStore};
use parquet::arrow::ArrowWriter;
use std::sync::Arc;
use crate::{
    aggregate_by_district, classify, max_value, missing_value_regex, parse_csv, Dataset, DatasetCache, DatasetSource,
    DistrictAggregates, Error, MetricAggregator, MetricKind, ObjectStoreSource, SchoolType,
    SchoolTypeRegistry,
};
use super::fixtures::*;

const HS_CSV: &str = "\
DBN,Geographical_District_code,Enrollment,Progress Rating,Borough
01M015,1,100,Meeting Target,Manhattan
01M019,1,,Exceeding Target,Manhattan
02M042,2,300,,Manhattan
";

async fn store_with(files: &[(&str, Bytes)]) -> Arc<dyn ObjectStore> {
    let store = InMemory::new();
    for (location, bytes) in files {
        store.put(&Path::from(*location), bytes.clone().into()).await.unwrap();
    }
    Arc::new(store)
}

fn parquet_bytes(batch: &RecordBatch) -> Bytes {
    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
    }
    Bytes::from(buffer)
}

#[test]
fn test_parse_csv_infers_column_types() {
    let batch = parse_csv(Bytes::from_static(HS_CSV.as_bytes())).unwrap();
    let dataset = Dataset::new(SchoolType::HighSchool, batch).unwrap();

    assert_eq!(dataset.num_rows(), 3);
    assert_eq!(dataset.metric_names(), vec!["Enrollment", "Progress Rating", "Borough"]);
    assert_eq!(dataset.data_type("Enrollment").unwrap(), &DataType::Int64);
    assert_eq!(classify(&dataset, "Enrollment").unwrap(), MetricKind::Numeric);
    assert_eq!(classify(&dataset, "Progress Rating").unwrap(), MetricKind::RatingScale);
    assert_eq!(dataset.district_codes().unwrap(), vec![Some(1), Some(1), Some(2)]);
    assert_eq!(dataset.numeric_values("Enrollment").unwrap(), vec![Some(100.0), None, Some(300.0)]);
}

#[test]
fn test_csv_empty_fields_are_missing() {
    let batch = parse_csv(Bytes::from_static(HS_CSV.as_bytes())).unwrap();
    let dataset = Dataset::new(SchoolType::HighSchool, batch).unwrap();

    match aggregate_by_district(&dataset, "Progress Rating").unwrap() {
        DistrictAggregates::Scored(result) => {
            assert_eq!(result.len(), 1);
            assert_close(result[&1].average_score.unwrap(), 0.85);
        }
        other => panic!("expected scored aggregates, got {:?}", other),
    }

    match aggregate_by_district(&dataset, "Enrollment").unwrap() {
        DistrictAggregates::Numeric(means) => {
            assert_close(means[&1], 100.0);
            assert_close(means[&2], 300.0);
        }
        other => panic!("expected numeric aggregates, got {:?}", other),
    }
}

const MARKED_CSV: &str = "\
DBN,Geographical_District_code,Enrollment,Progress Rating
01M015,1,100,Meeting Target
01M019,1,N/A,N/A
02M042,2,NaN,Exceeding Target
";

#[test]
fn test_missing_value_regex_matches_markers_only() {
    let null_regex = missing_value_regex().unwrap();

    for marker in ["", "N/A", "NA", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>"] {
        assert!(null_regex.is_match(marker), "{:?} should be missing", marker);
    }
    for value in ["Manhattan", "N/A N/A", "NAN", "0", "Not Meeting Target", " NA"] {
        assert!(!null_regex.is_match(value), "{:?} should be a value", value);
    }
}

#[test]
fn test_csv_text_markers_keep_column_numeric() {
    let batch = parse_csv(Bytes::from_static(MARKED_CSV.as_bytes())).unwrap();
    let dataset = Dataset::new(SchoolType::HighSchool, batch).unwrap();

    assert!(dataset.data_type("Enrollment").unwrap().is_numeric());
    assert_eq!(classify(&dataset, "Enrollment").unwrap(), MetricKind::Numeric);
    assert_eq!(dataset.numeric_values("Enrollment").unwrap(), vec![Some(100.0), None, None]);

    match aggregate_by_district(&dataset, "Enrollment").unwrap() {
        DistrictAggregates::Numeric(means) => {
            assert_eq!(means.len(), 1);
            assert_close(means[&1], 100.0);
        }
        other => panic!("expected numeric aggregates, got {:?}", other),
    }
    assert_eq!(max_value(&dataset, "Enrollment").unwrap(), Some(100.0));
}

#[test]
fn test_csv_text_markers_are_not_rating_labels() {
    let batch = parse_csv(Bytes::from_static(MARKED_CSV.as_bytes())).unwrap();
    let dataset = Dataset::new(SchoolType::HighSchool, batch).unwrap();

    assert_eq!(dataset.label_values("Progress Rating").unwrap()[1], None);

    match aggregate_by_district(&dataset, "Progress Rating").unwrap() {
        DistrictAggregates::Scored(result) => {
            assert_eq!(result.len(), 2);
            assert_eq!(
                result[&1].frequency.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Vec<_>>(),
                vec![("Meeting Target", 1)]
            );
            assert_close(result[&1].average_score.unwrap(), 0.7);
            assert_close(result[&2].average_score.unwrap(), 1.0);
        }
        other => panic!("expected scored aggregates, got {:?}", other),
    }
}

#[test]
fn test_dataset_requires_district_column() {
    let batch = parse_csv(Bytes::from_static(b"DBN,Enrollment\n01M015,100\n")).unwrap();

    assert!(matches!(
        Dataset::new(SchoolType::HighSchool, batch),
        Err(Error::Dataset(_))
    ));
}

#[tokio::test]
async fn test_object_store_source_reads_registered_csv() {
    let store = store_with(&[(
        "final_combined_hs_data.csv",
        Bytes::from_static(HS_CSV.as_bytes()),
    )])
    .await;
    let source = ObjectStoreSource::new(store, SchoolTypeRegistry::default());

    let dataset = source.load(SchoolType::HighSchool).await.unwrap();

    assert_eq!(dataset.school_type(), SchoolType::HighSchool);
    assert_eq!(dataset.num_rows(), 3);
}

#[tokio::test]
async fn test_object_store_source_reads_parquet() {
    let dataset = sample_dataset(SchoolType::District75);

    let store = store_with(&[("d75.parquet", parquet_bytes(dataset.batch()))]).await;
    let registry = SchoolTypeRegistry::default().with_source(SchoolType::District75, "d75.parquet");
    let source = ObjectStoreSource::new(store, registry);

    let loaded = source.load(SchoolType::District75).await.unwrap();

    assert_eq!(loaded.metric_names(), dataset.metric_names());
    assert_eq!(
        aggregate_by_district(&loaded, "Borough").unwrap(),
        aggregate_by_district(&dataset, "Borough").unwrap()
    );
}

#[tokio::test]
async fn test_missing_source_is_invalid_school_type() {
    let store = store_with(&[]).await;
    let source = ObjectStoreSource::new(store, SchoolTypeRegistry::default());

    assert!(matches!(
        source.load(SchoolType::EarlyChildhood).await,
        Err(Error::InvalidSchoolType(key)) if key == "ec"
    ));
}

#[tokio::test]
async fn test_source_without_district_column_is_invalid_school_type() {
    let store = store_with(&[(
        "final_combined_ems_data.csv",
        Bytes::from_static(b"DBN,Enrollment\n01M015,100\n"),
    )])
    .await;
    let source = ObjectStoreSource::new(store, SchoolTypeRegistry::default());

    assert!(matches!(
        source.load(SchoolType::ElementaryMiddle).await,
        Err(Error::InvalidSchoolType(_))
    ));
}

#[tokio::test]
async fn test_cache_loads_each_school_type_once() {
    let source = Arc::new(StaticSource::new(vec![
        sample_dataset(SchoolType::HighSchool),
        sample_dataset(SchoolType::ElementaryMiddle),
    ]));
    let cache = Arc::new(DatasetCache::new(source.clone()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let school_type = if i % 2 == 0 {
                SchoolType::HighSchool
            } else {
                SchoolType::ElementaryMiddle
            };
            tokio::spawn(async move { cache.get(school_type).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(source.loads(), 2);
    assert_eq!(
        cache.loaded(),
        vec![SchoolType::HighSchool, SchoolType::ElementaryMiddle]
    );

    let first = cache.get(SchoolType::HighSchool).await.unwrap();
    let second = cache.get(SchoolType::HighSchool).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.loads(), 2);
}

#[tokio::test]
async fn test_cache_retries_failed_loads() {
    let source = Arc::new(StaticSource::new(vec![]));
    let cache = DatasetCache::new(source.clone());

    assert!(cache.get(SchoolType::HighSchoolTransfer).await.is_err());
    assert!(cache.get(SchoolType::HighSchoolTransfer).await.is_err());

    assert_eq!(source.loads(), 2);
    assert!(cache.loaded().is_empty());
}

#[tokio::test]
async fn test_unknown_school_type_never_touches_source() {
    let source = Arc::new(StaticSource::new(vec![sample_dataset(SchoolType::HighSchool)]));
    let aggregator = MetricAggregator::new(source.clone());

    assert!(matches!(
        aggregator.list_metrics("middle").await,
        Err(Error::InvalidSchoolType(key)) if key == "middle"
    ));
    assert!(matches!(
        aggregator.district_aggregates("HS", "Enrollment").await,
        Err(Error::InvalidSchoolType(_))
    ));
    assert_eq!(source.loads(), 0);
}

#[tokio::test]
async fn test_unknown_metric_fails_for_valid_school_type() {
    let source = Arc::new(StaticSource::new(vec![sample_dataset(SchoolType::HighSchool)]));
    let aggregator = MetricAggregator::new(source);

    assert!(matches!(
        aggregator.max_value("hs", "DBN Count").await,
        Err(Error::MetricNotFound(_))
    ));
    assert_eq!(aggregator.max_value("hs", "Progress Rating").await.unwrap(), Some(1.0));
}

#[test]
fn test_school_type_keys_round_trip() {
    for school_type in SchoolType::ALL {
        assert_eq!(school_type.key().parse::<SchoolType>().unwrap(), school_type);
    }
    assert_eq!(SchoolType::District75.default_source(), "final_combined_d75_data.csv");
    assert!("elementary".parse::<SchoolType>().is_err());
}
