//! Output rendering (JSON and CSV).

use std::fmt::Write;

use clap::ValueEnum;

use pyscope_error::{Error, Result};

use crate::pipeline::FileRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// Render the batch in the requested format.
pub fn render(rows: &[FileRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows).map_err(|e| {
            Error::unexpected("failed to serialize records")
                .with_operation("output::render")
                .set_source(e)
        }),
        OutputFormat::Csv => Ok(render_csv(rows)),
    }
}

const CSV_HEADER: &str = "file,name,role,in_function,in_class,in_lambda,in_comprehension,\
in_match,in_for,in_while,in_if,in_with,in_try,in_except,in_finally,\
scope_depth,indent_depth,line,column";

fn render_csv(rows: &[FileRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{CSV_HEADER}");

    for row in rows {
        let ctx = &row.record.context;
        let role: &'static str = row.record.role.into();
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            csv_field(&row.file),
            csv_field(&row.record.name),
            csv_field(role),
            ctx.in_function,
            ctx.in_class,
            ctx.in_lambda,
            ctx.in_comprehension,
            ctx.in_match,
            ctx.in_for,
            ctx.in_while,
            ctx.in_if,
            ctx.in_with,
            ctx.in_try,
            ctx.in_except,
            ctx.in_finally,
            ctx.scope_depth,
            ctx.indent_depth,
            opt_field(row.record.line),
            opt_field(row.record.column),
        );
    }

    out
}

fn opt_field(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Quote a field when it holds a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscope_core::{IdentifierRecord, RoleTag, TraversalContext};

    fn sample_row() -> FileRecord {
        FileRecord {
            file: "pkg/mod.py".to_string(),
            record: IdentifierRecord {
                name: "handler".to_string(),
                role: RoleTag::FunctionName,
                context: TraversalContext::default(),
                line: Some(1),
                column: Some(0),
            },
        }
    }

    #[test]
    fn test_csv_header_and_row() {
        let csv = render_csv(&[sample_row()]);
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("file,name,role,in_function"));
        assert_eq!(
            lines.next().unwrap(),
            "pkg/mod.py,handler,function name,false,false,false,false,false,false,\
false,false,false,false,false,false,0,0,1,0"
        );
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_json_round_trips_labels() {
        let json = render(&[sample_row()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["file"], "pkg/mod.py");
        assert_eq!(value[0]["role"], "function name");
        assert_eq!(value[0]["in_function"], false);
    }
}
