use colored::Colorize;
use resxsheet::{ExportReport, ImportReport};
use serde::Serialize;

/// The result of one command invocation, as printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RunReport {
    Export { workbooks: Vec<ExportReport> },
    Import(ImportReport),
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        match self {
            RunReport::Export { workbooks } => workbooks.iter().all(ExportReport::is_success),
            RunReport::Import(_) => true,
        }
    }
}

pub fn to_json(report: &RunReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| format!("Failed to encode report: {}", e))
}

pub fn print_export(report: &ExportReport) {
    let status = if report.is_success() { "✅" } else { "❌" };
    println!(
        "{} {} → {} file(s)",
        status,
        report.input.display().to_string().bold(),
        report.written.len()
    );
    for path in &report.written {
        println!("   {}", path.display());
    }
    for failed in &report.failed {
        println!(
            "   {} {}: {}",
            "failed".red(),
            failed.path.display(),
            failed.error
        );
    }
}

pub fn print_import(report: &ImportReport) {
    let locales = if report.locale_codes.is_empty() {
        "neutral only".to_string()
    } else {
        format!("neutral, {}", report.locale_codes.join(", "))
    };
    println!(
        "✅ {} → {} ({} row(s); {})",
        report.sheet_name.bold(),
        report.output.display(),
        report.rows,
        locales
    );
    if report.replaced_sheet {
        println!("   {}", "replaced existing sheet".yellow());
    }
    for warning in &report.warnings {
        println!("   {} {}", "warning:".yellow(), warning);
    }
}

pub fn print_report(report: &RunReport) {
    match report {
        RunReport::Export { workbooks } => workbooks.iter().for_each(print_export),
        RunReport::Import(report) => print_import(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resxsheet::Warning;
    use resxsheet::export::FailedWrite;
    use std::path::PathBuf;

    #[test]
    fn test_export_success_requires_every_workbook() {
        let ok = ExportReport {
            input: PathBuf::from("a.xlsx"),
            written: vec![PathBuf::from("A.resx")],
            failed: vec![],
        };
        let partial = ExportReport {
            input: PathBuf::from("b.xlsx"),
            written: vec![],
            failed: vec![FailedWrite {
                path: PathBuf::from("B.resx"),
                error: "denied".to_string(),
            }],
        };
        assert!(
            RunReport::Export {
                workbooks: vec![ok.clone()]
            }
            .is_success()
        );
        assert!(
            !RunReport::Export {
                workbooks: vec![ok, partial]
            }
            .is_success()
        );
    }

    #[test]
    fn test_import_report_json() {
        let report = RunReport::Import(ImportReport {
            output: PathBuf::from("out/Strings.xlsx"),
            sheet_name: "Strings".to_string(),
            locale_codes: vec!["fr".to_string()],
            rows: 3,
            replaced_sheet: false,
            warnings: vec![Warning::MissingNeutral {
                key: "C".to_string(),
                locale: "fr".to_string(),
            }],
        });

        let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(json["command"], "import");
        assert_eq!(json["sheet_name"], "Strings");
        assert_eq!(json["rows"], 3);
        assert_eq!(json["warnings"][0]["kind"], "missing_neutral");
        assert_eq!(json["warnings"][0]["key"], "C");
    }
}
