//! Validates a small car dataset and reports delayed expectations.
//!
//! Run with `RUST_LOG=vigilance=debug` to see per-condition events.

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use std::sync::Arc;
use vigilance::logging::setup::{init_logging, LoggingConfig};
use vigilance::prelude::*;
use vigilance::statistics::{outlier_distance, within_n_absolute_deviations};

fn check_cars(table: &Table) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let distances = outlier_distance(table)?;
    expect!(
        (table.n_rows() > 3, "Num rows must be greater than 3"),
        (
            within_n_absolute_deviations(10.0, &distances),
            "Not all outlier distances within 10 MADs"
        ),
    );
    report_failures(ReportOptions::default().with_clear(true))?;
    println!();
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default())?;

    let table = Table::try_from_columns(vec![
        (
            "model",
            Arc::new(StringArray::from(vec![
                "Mazda RX4",
                "Datsun 710",
                "Valiant",
                "Duster 360",
                "Merc 240D",
            ])) as ArrayRef,
        ),
        ("mpg", Arc::new(Float64Array::from(vec![21.0, 22.8, 18.1, 14.3, 24.4])) as ArrayRef),
        ("cyl", Arc::new(Int64Array::from(vec![6, 4, 6, 8, 4])) as ArrayRef),
        ("vs", Arc::new(Int64Array::from(vec![0, 1, 1, 0, 2])) as ArrayRef),
    ])?
    .with_index("model")?;

    let schema = Schema::from_json_str(
        r#"{
            "meta": {
                "row-count": {"range": {"min": 5, "max": 11}},
                "columns": ["mpg", "cyl", "vs"]
            },
            "data": {"vs": {"contains": {"items": [0, 1], "only": true}}}
        }"#,
    )?;

    let mut validator = Validator::with_schema(schema.data("cyl", Contains::new([4, 6, 8]).only()));
    validator.validate(&table)?;
    validator.report()?;

    check_cars(&table)
}
