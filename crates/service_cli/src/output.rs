//! Report rendering as a text table or JSON.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Boxed key/value table
    #[default]
    Table,
    /// Pretty-printed JSON document
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown format: {}. Supported: json, table", other)),
        }
    }
}

/// A command result that can be rendered in either format.
pub trait Report: Serialize {
    /// Table heading
    fn title(&self) -> String;

    /// Table rows as label/value pairs
    fn rows(&self) -> Vec<(String, String)>;
}

/// Writes `report` to `out` in the requested format.
pub fn emit<W: Write, R: Report>(out: &mut W, format: OutputFormat, report: &R) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputFormat::Table => write_table(out, &report.title(), &report.rows())?,
    }
    Ok(())
}

/// Writes a two-column box-drawn table.
pub fn write_table<W: Write>(
    out: &mut W,
    title: &str,
    rows: &[(String, String)],
) -> std::io::Result<()> {
    let key_width = rows
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);
    let value_width = rows
        .iter()
        .map(|(_, v)| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);
    let inner = key_width + value_width + 5;
    let title_width = title.chars().count();
    let inner = inner.max(title_width + 2);
    // Widen the value column if the title is the widest element.
    let value_width = inner - key_width - 5;

    writeln!(out, "┌{}┐", "─".repeat(inner))?;
    writeln!(out, "│ {:<width$} │", title, width = inner - 2)?;
    writeln!(out, "├{}┬{}┤", "─".repeat(key_width + 2), "─".repeat(value_width + 2))?;
    for (key, value) in rows {
        writeln!(
            out,
            "│ {:<kw$} │ {:>vw$} │",
            key,
            value,
            kw = key_width,
            vw = value_width
        )?;
    }
    writeln!(out, "└{}┴{}┘", "─".repeat(key_width + 2), "─".repeat(value_width + 2))?;
    Ok(())
}

/// Formats a price or volatility with a fixed number of decimals.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        price: f64,
    }

    impl Report for Sample {
        fn title(&self) -> String {
            "Sample".to_string()
        }

        fn rows(&self) -> Vec<(String, String)> {
            vec![("Price".to_string(), fixed(self.price, 4))]
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_emit_json() {
        let mut buf = Vec::new();
        emit(&mut buf, OutputFormat::Json, &Sample { price: 16.4359 }).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["price"], 16.4359);
    }

    #[test]
    fn test_emit_table() {
        let mut buf = Vec::new();
        emit(&mut buf, OutputFormat::Table, &Sample { price: 16.43588 }).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Sample"));
        assert!(text.contains("16.4359"));
        assert_eq!(text.lines().count(), 5);

        // Every line of the box has the same display width.
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{:?}", widths);
    }

    #[test]
    fn test_long_title_widens_table() {
        let mut buf = Vec::new();
        let rows = vec![("k".to_string(), "v".to_string())];
        write_table(&mut buf, "A considerably longer heading than the rows", &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{:?}", widths);
    }
}
