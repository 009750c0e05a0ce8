use serde::Serialize;
use tabled::{Table, Tabled};
use violationtracker_lib::{RunLog, StoredViolation};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct ViolationRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Parent")]
    #[serde(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Offense")]
    #[serde(rename = "Offense")]
    offense: String,
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: i32,
    #[tabled(rename = "Agency")]
    #[serde(rename = "Agency")]
    agency: String,
    #[tabled(rename = "Penalty")]
    #[serde(rename = "Penalty")]
    penalty: String,
}

fn build_violation_rows(violations: &[StoredViolation]) -> Vec<ViolationRow> {
    violations
        .iter()
        .map(|v| ViolationRow {
            id: v.id,
            company: v.record.company.clone(),
            parent: v.record.current_parent.clone().unwrap_or_default(),
            offense: v.record.primary_offense_type.clone(),
            year: v.record.year,
            agency: v.record.agency.clone(),
            penalty: format_penalty(v.record.penalty_amount),
        })
        .collect()
}

// -- Table output --

pub fn print_violations_table(violations: &[StoredViolation]) {
    println!("{}", Table::new(build_violation_rows(violations)));
}

pub fn print_run_log(name: &str, log: &RunLog) {
    println!("Latest run log: {}", name);
    println!("  timestamp:         {}", log.timestamp.to_rfc3339());
    println!("  records_processed: {}", log.records_processed);
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Dollar amount with thousands separators and cents, e.g. `$2,500,000.00`.
fn format_penalty(amount: f64) -> String {
    let cents = (amount * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}.{:02}", grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use violationtracker_lib::ViolationRecord;

    fn stored(id: i64, company: &str, parent: Option<&str>, penalty: f64) -> StoredViolation {
        StoredViolation {
            id,
            record: ViolationRecord {
                company: company.to_string(),
                current_parent: parent.map(str::to_string),
                current_parent_industry: None,
                primary_offense_type: "Pollution".to_string(),
                year: 2019,
                agency: "EPA".to_string(),
                penalty_amount: penalty,
            },
            created_at: Some("2025-03-14 09:26:53".to_string()),
        }
    }

    #[test]
    fn test_format_penalty() {
        assert_eq!(format_penalty(0.0), "$0.00");
        assert_eq!(format_penalty(999.5), "$999.50");
        assert_eq!(format_penalty(1250.0), "$1,250.00");
        assert_eq!(format_penalty(2_500_000.0), "$2,500,000.00");
        assert_eq!(format_penalty(123_456.789), "$123,456.79");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Table);
    }

    #[test]
    fn test_violation_rows_blank_parent() {
        let rows = build_violation_rows(&[stored(1, "Acme Co", None, 1250.0)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company, "Acme Co");
        assert_eq!(rows[0].parent, "");
        assert_eq!(rows[0].penalty, "$1,250.00");
    }

    #[test]
    fn test_violation_table_headers() {
        let rows = build_violation_rows(&[
            stored(1, "Acme Co", None, 1250.0),
            stored(2, "Caribe Pharma LLC", Some("Global Health Holdings"), 2_500_000.0),
        ]);
        let rendered = Table::new(rows).to_string();
        for header in ["ID", "Company", "Parent", "Offense", "Year", "Agency", "Penalty"] {
            assert!(rendered.contains(header), "missing header {}", header);
        }
        assert!(rendered.contains("Global Health Holdings"));
        assert!(rendered.contains("$2,500,000.00"));
    }

    #[test]
    fn test_violation_rows_json_keys() {
        let rows = build_violation_rows(&[stored(7, "Acme Co", None, 0.0)]);
        let value = serde_json::to_value(&rows).unwrap();
        let row = &value[0];
        assert_eq!(row["ID"], 7);
        assert_eq!(row["Company"], "Acme Co");
        assert_eq!(row["Penalty"], "$0.00");
    }
}
