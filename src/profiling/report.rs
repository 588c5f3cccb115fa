//! Human-readable profiling reports and CSV export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::{ProfilingJobResult, ProfilingJobStatus};
use super::snapshot::{
    DistributionSummary, GeneratedFrom, ProfilingFieldStats, Thresholds, ValueFrequency,
};
use crate::error::ReportError;
use crate::types::Value;

/// Column order of [`ProfilingReport::to_rows`].
pub const REPORT_HEADER: [&str; 12] = [
    "field_name",
    "non_null",
    "nulls",
    "distinct",
    "min",
    "max",
    "mean",
    "stddev",
    "frequent_values",
    "distribution",
    "sample_values",
    "thresholds",
];

/// Roll-up of one field's statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub name: String,
    pub non_null: usize,
    pub nulls: usize,
    pub distinct: usize,
    pub sample_values: Vec<Value>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
    pub frequent_values: Vec<ValueFrequency>,
    pub distribution: Option<DistributionSummary>,
    pub thresholds: Thresholds,
}

impl FieldSummary {
    pub fn from_stats(stats: &ProfilingFieldStats) -> Self {
        Self {
            name: stats.field_name.clone(),
            non_null: stats.non_null,
            nulls: stats.nulls,
            distinct: stats.distinct,
            sample_values: stats.sample_values.clone(),
            min_value: stats.min_value,
            max_value: stats.max_value,
            mean: stats.mean,
            stddev: stats.stddev,
            frequent_values: stats.frequent_values.clone(),
            distribution: stats.distribution.clone(),
            thresholds: stats.thresholds.clone(),
        }
    }

    fn to_row(&self) -> Result<Vec<String>, ReportError> {
        let distribution = match &self.distribution {
            Some(d) => serde_json::to_string(d)?,
            None => String::new(),
        };
        let samples = self
            .sample_values
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("|");

        Ok(vec![
            self.name.clone(),
            self.non_null.to_string(),
            self.nulls.to_string(),
            self.distinct.to_string(),
            optional_number(self.min_value),
            optional_number(self.max_value),
            optional_number(self.mean),
            optional_number(self.stddev),
            serde_json::to_string(&self.frequent_values)?,
            distribution,
            samples,
            serde_json::to_string(&self.thresholds)?,
        ])
    }
}

fn optional_number(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

/// Summary of one profiling run, one [`FieldSummary`] per field in field-name order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilingReport {
    pub job_id: String,
    pub profiling_context_id: String,
    pub status: ProfilingJobStatus,
    pub profiled_at: DateTime<Utc>,
    pub record_count: usize,
    pub generated_from: GeneratedFrom,
    #[serde(rename = "fields")]
    pub field_summaries: Vec<FieldSummary>,
    pub warnings: Vec<String>,
}

impl ProfilingReport {
    pub fn from_result(result: &ProfilingJobResult) -> Self {
        let snapshot = &result.snapshot;
        Self {
            job_id: result.job_id.clone(),
            profiling_context_id: result.profiling_context_id.clone(),
            status: result.status,
            profiled_at: result.profiled_at,
            record_count: snapshot.record_count,
            generated_from: snapshot.generated_from,
            field_summaries: snapshot.iter_fields().map(FieldSummary::from_stats).collect(),
            warnings: result.warnings.clone(),
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, ReportError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Header row followed by one row per field. Nested values are JSON-encoded; samples are
    /// joined with `|`.
    pub fn to_rows(&self) -> Result<Vec<Vec<String>>, ReportError> {
        let mut rows = Vec::with_capacity(self.field_summaries.len() + 1);
        rows.push(REPORT_HEADER.iter().map(|h| h.to_string()).collect());
        for field in &self.field_summaries {
            rows.push(field.to_row()?);
        }
        Ok(rows)
    }
}

/// Render `report` as CSV text.
pub fn export_report_to_csv(report: &ProfilingReport) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in report.to_rows()? {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiling::engine::ProfilingEngine;
    use crate::profiling::job::ProfilingJob;
    use crate::types::{record, DataSet};

    fn result() -> ProfilingJobResult {
        let ds = DataSet::new(vec![
            record([("Amount", Value::Int64(10)), ("Status", Value::from("PAID"))]),
            record([("Amount", Value::Int64(20)), ("Status", Value::from("OPEN"))]),
        ]);
        ProfilingEngine::default().profile(&ProfilingJob::new("p1", "t1", "billing"), &ds)
    }

    #[test]
    fn rows_start_with_header_and_cover_every_field() {
        let report = ProfilingReport::from_result(&result());
        let rows = report.to_rows().unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], REPORT_HEADER.map(String::from).to_vec());
        assert_eq!(rows[1][0], "Amount");
        assert_eq!(rows[1][6], "15");
        assert_eq!(rows[1][10], "10|20");
        assert_eq!(rows[2][0], "Status");
        assert_eq!(rows[2][4], "");
        assert!(rows[2][9].contains("\"categorical\""));
    }

    #[test]
    fn csv_export_quotes_json_cells() {
        let csv = export_report_to_csv(&ProfilingReport::from_result(&result())).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("field_name,non_null,nulls,distinct,min,max,mean,stddev,frequent_values,distribution,sample_values,thresholds")
        );
        let amount = lines.next().unwrap();
        assert!(amount.starts_with("Amount,2,0,2,10,20,15,5,\"[{"));
        assert!(amount.ends_with(",10|20,{}"));
    }

    #[test]
    fn json_report_uses_fields_key() {
        let json = ProfilingReport::from_result(&result()).to_json().unwrap();
        assert_eq!(json["fields"].as_array().unwrap().len(), 2);
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["generated_from"], "raw");
    }
}
