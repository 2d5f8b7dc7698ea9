//! Terminal rendering of command reports.

use std::fmt::{self, Display};

use comfy_table::{presets, CellAlignment, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Human-readable text of a command report.
pub trait Render {
    fn render(&self) -> String;
}

/// Writes `report` as pretty JSON under `--json`, otherwise its rendered text.
pub fn emit<T: Serialize + Render>(report: &T, opts: &GlobalOptions) -> anyhow::Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

/// `Label: value` lines, values aligned after the longest label.
#[derive(Default)]
pub struct Fields {
    entries: Vec<(&'static str, String)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, label: &'static str, value: impl Display) -> Self {
        self.entries.push((label, value.to_string()));
        self
    }

    /// Adds the line only when `value` is present.
    pub fn optional<V: Display>(self, label: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(label, value),
            None => self,
        }
    }
}

impl Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|(l, _)| l.len() + 1).max().unwrap_or(0);
        for (label, value) in &self.entries {
            writeln!(f, "{:<width$} {}", format!("{label}:"), value)?;
        }
        Ok(())
    }
}

/// Borderless listing of columns, relations and similar rows.
///
/// Columns whose non-empty values are all integers (lengths, counts) are right-aligned.
pub struct Listing {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    indent: &'static str,
}

impl Listing {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
            indent: "",
        }
    }

    /// Prefixes every rendered line with `prefix`.
    pub fn indent(mut self, prefix: &'static str) -> Self {
        self.indent = prefix;
        self
    }

    pub fn row(&mut self, values: Vec<String>) {
        self.rows.push(values);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn is_numeric(&self, column: usize) -> bool {
        let mut values = self
            .rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|value| !value.is_empty())
            .peekable();
        values.peek().is_some() && values.all(|value| value.parse::<i64>().is_ok())
    }

    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        table.set_header(self.headers.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        let numeric: Vec<bool> = (0..self.headers.len()).map(|i| self.is_numeric(i)).collect();
        for (i, column) in table.column_iter_mut().enumerate() {
            column.set_padding((0, 2));
            if numeric.get(i).copied().unwrap_or(false) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }

        let mut out = String::new();
        for line in table.to_string().lines().filter(|l| !l.trim().is_empty()) {
            out.push_str(self.indent);
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_align_values_and_skip_missing() {
        let text = Fields::new()
            .field("Form", "AppConfig")
            .optional("Type", None::<&str>)
            .optional("Persisted", Some("AppConfig.X.0.I.M.P"))
            .to_string();
        assert_eq!(text, "Form:      AppConfig\nPersisted: AppConfig.X.0.I.M.P\n");
    }

    #[test]
    fn lengths_are_right_aligned() {
        let mut listing = Listing::new(&["Column", "Length"]).indent("  ");
        listing.row(vec!["Id".to_string(), "5".to_string()]);
        listing.row(vec!["Name".to_string(), "40".to_string()]);
        listing.row(vec!["Notes".to_string(), String::new()]);
        let text = listing.render();
        let id = text.lines().find(|l| l.trim_start().starts_with("Id")).unwrap();
        let name = text.lines().find(|l| l.trim_start().starts_with("Name")).unwrap();
        assert!(id.starts_with("  Id"));
        assert!(id.ends_with(" 5"));
        assert_eq!(id.len(), name.len());
        assert!(text.lines().any(|l| l.trim_end() == "  Notes"));
    }

    #[test]
    fn text_columns_stay_left_aligned() {
        let mut listing = Listing::new(&["Relation", "Kind"]);
        assert!(listing.is_empty());
        listing.row(vec!["FK_Orders".to_string(), "Relation".to_string()]);
        listing.row(vec!["FK_Order_Details_Orders".to_string(), "Both".to_string()]);
        assert!(!listing.is_numeric(1));
        let text = listing.render();
        let short = text.lines().find(|l| l.starts_with("FK_Orders ")).unwrap();
        assert!(short.ends_with("Relation"));
        assert!(text.lines().any(|l| l.starts_with("FK_Order_Details_Orders  Both")));
    }
}
