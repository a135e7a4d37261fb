//! End-to-end validation of a small car dataset.

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use std::sync::Arc;
use vigilance::config::SchemaConfig;
use vigilance::constraints::{
    predicate_fn, ConditionViolation, Contains, Excludes, Max, Min, Range, Value,
};
use vigilance::core::{
    Bucket, MetaProperty, Schema, Table, TableConstraint, ValidationState, Validator,
};
use vigilance::error::VigilanceError;
use vigilance::formatters::{JsonFormatter, ResultFormatter};
use vigilance::statistics::{outlier_constraint, within_sds};

const MODELS: [&str; 8] = [
    "Mazda RX4",
    "Mazda RX4 Wag",
    "Datsun 710",
    "Hornet 4 Drive",
    "Hornet Sportabout",
    "Valiant",
    "Duster 360",
    "Merc 240D",
];

fn cars(mpg: Vec<f64>, vs: Vec<i64>) -> Table {
    Table::try_from_columns(vec![
        ("model", Arc::new(StringArray::from(MODELS.to_vec())) as ArrayRef),
        ("mpg", Arc::new(Float64Array::from(mpg)) as ArrayRef),
        ("cyl", Arc::new(Int64Array::from(vec![6, 6, 4, 6, 8, 6, 8, 4])) as ArrayRef),
        (
            "hp",
            Arc::new(Float64Array::from(vec![
                110.0, 110.0, 93.0, 110.0, 175.0, 105.0, 245.0, 62.0,
            ])) as ArrayRef,
        ),
        ("vs", Arc::new(Int64Array::from(vs)) as ArrayRef),
    ])
    .unwrap()
    .with_index("model")
    .unwrap()
}

fn clean_cars() -> Table {
    cars(
        vec![21.0, 21.0, 22.8, 21.4, 18.7, 18.1, 14.3, 24.4],
        vec![0, 0, 1, 1, 0, 1, 0, 1],
    )
}

fn dirty_cars() -> Table {
    cars(
        vec![21.0, 21.0, 22.8, 21.4, 18.7, 18.1, 14.3, 999.0],
        vec![0, 0, 1, 1, 0, 2, 0, 1],
    )
}

fn car_schema() -> Schema {
    Schema::new()
        .meta(MetaProperty::RowCount, Range::between(5, 11))
        .meta(MetaProperty::ColumnCount, 4)
        .meta(MetaProperty::Columns, Contains::new(["mpg", "cyl", "hp", "vs"]).only())
        .meta(MetaProperty::Dtypes, vec!["float64", "int64", "float64", "int64"])
        .data("mpg", Range::between(0, 50))
        .data("cyl", Contains::new([4, 6, 8]))
        .data("vs", Contains::new([0, 1]).only())
        .data("hp", within_sds(3.0))
}

#[test]
fn test_clean_table_passes() {
    let mut validator = Validator::with_schema(car_schema());
    assert_eq!(validator.state(), ValidationState::Unvalidated);

    assert!(validator.validate(&clean_cars()).unwrap());
    assert_eq!(validator.is_valid(), Some(true));
    assert_eq!(
        validator.report().unwrap(),
        "Validation Successful: No errors found.\n"
    );
}

#[test]
fn test_dirty_table_collects_every_failure() {
    let mut validator = Validator::with_schema(car_schema());
    assert!(!validator.validate(&dirty_cars()).unwrap());

    let errors = validator.errors().unwrap();
    assert!(errors.bucket(Bucket::Meta).is_empty());
    let data: Vec<_> = errors.data.iter().map(|e| e.as_pair()).collect();
    assert_eq!(
        data,
        vec![
            ("mpg", "value must be at most 50"),
            (
                "vs",
                "sequence must only contain the following: [0, 1]\nAdditional: [2]"
            ),
        ]
    );

    assert_eq!(
        validator.render_report().unwrap(),
        "\nError Report\n------------\ndata:\n    mpg:  value must be at most 50\n    vs:  sequence must only contain the following: [0, 1]\nAdditional: [2]\n"
    );
}

#[test]
fn test_index_labels_come_from_index_column() {
    let mut validator = Validator::with_schema(
        Schema::new().meta(MetaProperty::Index, Excludes::new(["Ford Pantera L"])),
    );
    assert!(validator.validate(&clean_cars()).unwrap());

    let labels: Vec<Value> = MODELS.iter().map(|m| Value::from(*m)).collect();
    let mut validator = Validator::with_schema(Schema::new().meta(MetaProperty::Index, labels));
    assert!(validator.validate(&clean_cars()).unwrap());
}

#[test]
fn test_table_constraints_bucket() {
    let heavy_first = TableConstraint::new("sorted-by-hp", |table: &Table| {
        let hp = table
            .column_values("hp")
            .map_err(|e| ConditionViolation::custom(e.to_string()))?;
        if hp.windows(2).all(|w| w[0] >= w[1]) {
            Ok(())
        } else {
            Err(ConditionViolation::custom("hp must be sorted descending"))
        }
    });

    let mut validator = Validator::with_schema(
        Schema::new()
            .constraint(heavy_first)
            .constraint(outlier_constraint("outliers", 10.0)),
    );
    assert!(!validator.validate(&clean_cars()).unwrap());

    let constraints = &validator.errors().unwrap().constraints;
    assert_eq!(constraints.len(), 1);
    assert_eq!(
        constraints[0].as_pair(),
        ("sorted-by-hp", "hp must be sorted descending")
    );
}

#[test]
fn test_custom_predicate_on_column() {
    let turbo_free = predicate_fn("no-turbo", |v: &Value| {
        if v.items().iter().any(|hp| hp.as_f64().is_some_and(|hp| hp > 200.0)) {
            Err(ConditionViolation::custom("hp over 200"))
        } else {
            Ok(())
        }
    });
    let mut validator = Validator::with_schema(
        Schema::new()
            .data("hp", turbo_free)
            .data("cyl", Max::new(8))
            .data("mpg", Min::new(10)),
    );
    assert!(!validator.validate(&clean_cars()).unwrap());
    assert_eq!(
        validator.errors().unwrap().data[0].as_pair(),
        ("hp", "hp over 200")
    );
}

#[test]
fn test_validator_from_config() {
    let config: SchemaConfig = r#"{
        "meta": {
            "nrows": {"range": {"min": 5, "max": 11}},
            "columns": {"contains": ["mpg", "cyl"]}
        },
        "data": {
            "vs": {"contains": {"items": [0, 1], "only": true}},
            "mpg": {"max": 50}
        }
    }"#
    .parse()
    .unwrap();

    let mut validator = Validator::from_config(&config).unwrap();
    assert!(validator.validate(&clean_cars()).unwrap());
    assert!(!validator.validate(&dirty_cars()).unwrap());

    let properties: Vec<_> = validator
        .errors()
        .unwrap()
        .data
        .iter()
        .map(|e| e.property.as_str())
        .collect();
    assert_eq!(properties, vec!["vs", "mpg"]);
}

#[test]
fn test_json_report() {
    let mut validator = Validator::with_schema(car_schema());
    validator.validate(&dirty_cars()).unwrap();

    let json = JsonFormatter::new()
        .with_pretty(false)
        .format(validator.errors().unwrap())
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["passed"], false);
    assert_eq!(parsed["error_count"], 2);
    assert_eq!(parsed["errors"]["data"][1]["kind"], "contains");
}

#[test]
fn test_record_batch_input() {
    let batch = clean_cars().batch().clone();
    let mut validator = Validator::with_schema(Schema::new().meta(MetaProperty::ColumnCount, 5));
    // a bare batch has no index column, so all five columns count
    assert!(validator.validate_any(&batch).unwrap());

    let err = validator.validate_any(&vec![1, 2, 3]).unwrap_err();
    assert!(matches!(
        err,
        VigilanceError::UnexpectedInput { ref type_name } if type_name.contains("Vec<i32>")
    ));
}
