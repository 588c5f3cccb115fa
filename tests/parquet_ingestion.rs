use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use dq_transform::ingestion::parquet::{ingest_parquet_from_path, ingest_parquet_records_from_path};
use dq_transform::types::{DataType, Field, Schema, Value};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("dq-transform-{name}-{nanos}.parquet"))
}

fn invoice_schema() -> Schema {
    Schema::new(vec![
        Field::new("InvoiceId", DataType::Utf8),
        Field::new("Amount", DataType::Float64),
        Field::new("Quantity", DataType::Int64),
        Field::new("Paid", DataType::Bool),
    ])
}

/// Writes two invoices. `CustomerId` is optional and null on the second row.
fn write_invoices_parquet(path: &PathBuf, include_paid: bool, quantity_as_binary: bool) {
    let quantity = if quantity_as_binary {
        "REQUIRED BINARY Quantity (UTF8);"
    } else {
        "REQUIRED INT64 Quantity;"
    };
    let paid = if include_paid { "REQUIRED BOOLEAN Paid;" } else { "" };
    let schema_str = format!(
        "message schema {{
          REQUIRED BINARY InvoiceId (UTF8);
          REQUIRED DOUBLE Amount;
          {quantity}
          OPTIONAL BINARY CustomerId (UTF8);
          {paid}
        }}"
    );

    let schema = Arc::new(parse_message_type(&schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::ByteArrayColumnWriter(w) => match col_idx {
                0 => {
                    let ids = [ByteArray::from("INV-001"), ByteArray::from("INV-002")];
                    w.write_batch(&ids, None, None).unwrap();
                }
                2 => {
                    let qty = [ByteArray::from("3"), ByteArray::from("1")];
                    w.write_batch(&qty, None, None).unwrap();
                }
                3 => {
                    // Only the first row carries a value.
                    let customers = [ByteArray::from("C-1")];
                    w.write_batch(&customers, Some(&[1, 0]), None).unwrap();
                }
                _ => panic!("unexpected byte array column {col_idx}"),
            },
            ColumnWriter::DoubleColumnWriter(w) => {
                w.write_batch(&[120.5_f64, 75.0_f64], None, None).unwrap();
            }
            ColumnWriter::Int64ColumnWriter(w) => {
                w.write_batch(&[3_i64, 1_i64], None, None).unwrap();
            }
            ColumnWriter::BoolColumnWriter(w) => {
                w.write_batch(&[true, false], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn ingest_parquet_happy_path() {
    let schema = invoice_schema();
    let path = tmp_file("invoices");
    write_invoices_parquet(&path, true, false);

    let ds = ingest_parquet_from_path(&path, &schema).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0]["InvoiceId"], Value::from("INV-001"));
    assert_eq!(ds.rows[0]["Quantity"], Value::Int64(3));
    assert_eq!(ds.rows[1]["Amount"], Value::Float64(75.0));
    assert_eq!(ds.rows[1]["Paid"], Value::Bool(false));
    // Columns outside the schema are not carried over.
    assert!(!ds.rows[0].contains_key("CustomerId"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_errors_on_missing_required_column() {
    let schema = invoice_schema();
    let path = tmp_file("missing");
    write_invoices_parquet(&path, false, false);

    let err = ingest_parquet_from_path(&path, &schema).unwrap_err();
    assert!(err.to_string().contains("missing required column 'Paid'"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_errors_on_type_mismatch() {
    let schema = invoice_schema();
    let path = tmp_file("type-mismatch");
    write_invoices_parquet(&path, true, true);

    let err = ingest_parquet_from_path(&path, &schema).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'Quantity'"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn untyped_parquet_keeps_all_columns_and_nulls() {
    let path = tmp_file("untyped");
    write_invoices_parquet(&path, true, false);

    let ds = ingest_parquet_records_from_path(&path).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0]["CustomerId"], Value::from("C-1"));
    assert_eq!(ds.rows[1]["CustomerId"], Value::Null);
    assert_eq!(ds.rows[0]["Quantity"], Value::Int64(3));
    assert_eq!(ds.rows[0]["Paid"], Value::Bool(true));

    let _ = std::fs::remove_file(&path);
}
