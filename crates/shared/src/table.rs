use serde::Serialize;

/// A single cell of the tabular payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Coerce when the whole cell reads as a finite number; otherwise keep the text.
    pub fn coerce(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Text(raw.to_string());
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl CsvTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `column` in the first row whose leading cell reads as `row_label`.
    pub fn lookup(&self, row_label: &str, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows
            .iter()
            .find(|row| row.first().is_some_and(|c| c.to_string() == row_label))
            .and_then(|row| row.get(col))
    }
}

/// Split delimited text into a header row and raw data rows.
///
/// Lines split on `\n`, cells on `,`, carriage returns are stripped and
/// blank lines dropped. No quoting rules apply.
pub fn split_rows(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut lines = text
        .split('\n')
        .map(|line| line.replace('\r', ""))
        .filter(|line| !line.is_empty());

    let headers = match lines.next() {
        Some(line) => line.split(',').map(str::to_string).collect(),
        None => return (Vec::new(), Vec::new()),
    };
    let rows = lines
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect();
    (headers, rows)
}

pub fn parse_csv(text: &str) -> CsvTable {
    let (headers, raw_rows) = split_rows(text);
    let rows = raw_rows
        .iter()
        .map(|row| row.iter().map(|c| Cell::coerce(c)).collect())
        .collect();
    CsvTable { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_parse_csv_coerces_numeric_cells() {
        let table = parse_csv("a,b\n1,x\n2,3\n");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Cell::Number(1.0), text("x")],
                vec![Cell::Number(2.0), Cell::Number(3.0)],
            ]
        );
    }

    #[test]
    fn test_parse_csv_strips_carriage_returns() {
        let table = parse_csv("name,1990\r\nLancaster,12.5\r\n");
        assert_eq!(table.headers, vec!["name", "1990"]);
        assert_eq!(table.rows, vec![vec![text("Lancaster"), Cell::Number(12.5)]]);
    }

    #[test]
    fn test_parse_csv_keeps_empty_and_non_numeric_cells() {
        let table = parse_csv("a,b,c\n,NaN,Infinity\n");
        assert_eq!(table.rows, vec![vec![text(""), text("NaN"), text("Infinity")]]);
    }

    #[test]
    fn test_parse_csv_empty_input() {
        let table = parse_csv("");
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_parse_csv_header_only() {
        let table = parse_csv("a,b");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_split_rows_keeps_raw_text() {
        let (headers, rows) = split_rows("id,1990\n007,1.50\n");
        assert_eq!(headers, vec!["id", "1990"]);
        assert_eq!(rows, vec![vec!["007".to_string(), "1.50".to_string()]]);
    }

    #[test]
    fn test_lookup_by_row_label_and_column() {
        let table = parse_csv("indicator,1990,2010\nPoverty,12.1,14.3\nEducation,80,85\n");
        assert_eq!(table.lookup("Education", "2010"), Some(&Cell::Number(85.0)));
        assert_eq!(table.lookup("Poverty", "1990").unwrap().to_string(), "12.1");
        assert!(table.lookup("Housing", "1990").is_none());
        assert!(table.lookup("Poverty", "1980").is_none());
    }

    #[test]
    fn test_cell_serializes_untagged() {
        let json = serde_json::to_string(&vec![Cell::Number(1.0), text("x")]).unwrap();
        assert_eq!(json, r#"[1.0,"x"]"#);
    }
}
