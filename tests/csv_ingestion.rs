use dq_transform::ingestion::csv::{
    ingest_csv_from_path, ingest_csv_from_reader, ingest_csv_records_from_path,
};
use dq_transform::types::{record, DataType, Field, Schema, Value};
use pretty_assertions::assert_eq;

fn people_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("name", DataType::Utf8),
        Field::new("score", DataType::Float64),
        Field::new("active", DataType::Bool),
    ])
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let schema = people_schema();
    let ds = ingest_csv_from_path("tests/fixtures/people.csv", &schema).unwrap();

    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.rows[0],
        record([
            ("id", Value::Int64(1)),
            ("name", Value::from("Ada")),
            ("score", Value::Float64(98.5)),
            ("active", Value::Bool(true)),
        ])
    );
}

#[test]
fn ingest_csv_allows_reordered_columns() {
    let schema = people_schema();
    let input = "name,id,active,score\nAda,1,true,98.5\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let ds = ingest_csv_from_reader(&mut rdr, &schema).unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.rows[0]["id"], Value::Int64(1));
    assert_eq!(ds.rows[0]["name"], Value::from("Ada"));
}

#[test]
fn ingest_csv_errors_on_missing_required_column() {
    let schema = people_schema();
    let input = "id,name,score\n1,Ada,98.5\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let err = ingest_csv_from_reader(&mut rdr, &schema).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'active'"));
}

#[test]
fn ingest_csv_errors_on_type_parse() {
    let schema = people_schema();
    let input = "id,name,score,active\nnot_an_int,Ada,98.5,true\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let err = ingest_csv_from_reader(&mut rdr, &schema).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'id'"));
}

#[test]
fn untyped_csv_keeps_every_column_as_text() {
    let ds = ingest_csv_records_from_path("tests/fixtures/invoices.csv").unwrap();

    assert_eq!(ds.row_count(), 5);
    assert_eq!(
        ds.field_names().into_iter().collect::<Vec<_>>(),
        vec!["Amount", "Currency", "CustomerId", "InvoiceId", "Status"]
    );
    assert_eq!(ds.rows[0]["Amount"], Value::from("120.50"));
    assert_eq!(ds.rows[1]["CustomerId"], Value::Null);
    assert_eq!(ds.rows[3]["Amount"], Value::Null);
}
