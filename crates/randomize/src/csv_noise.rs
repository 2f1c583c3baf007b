use std::fs;
use std::path::Path;

use rand::Rng;
use tract_shared::table::split_rows;

use crate::error::RandomizeError;

pub const DEFAULT_INPUT: &str = "education.csv";
pub const DEFAULT_OUTPUT: &str = "education_noisy.csv";
pub const DEFAULT_NOISE: f64 = 5.0;
pub const DEFAULT_YEAR_COLUMNS: [&str; 7] = ["1980", "1990", "2000", "2010", "2020", "2021", "2022"];

#[derive(Debug, Clone)]
pub struct NoiseOptions {
    pub noise: f64,
    pub columns: Vec<String>,
    pub reverse_columns: bool,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        NoiseOptions {
            noise: DEFAULT_NOISE,
            columns: DEFAULT_YEAR_COLUMNS.iter().map(|c| c.to_string()).collect(),
            reverse_columns: false,
        }
    }
}

/// Positive offset in `[0.5 * noise, 1.5 * noise)`.
pub fn noise_offset<R: Rng + ?Sized>(rng: &mut R, noise: f64) -> f64 {
    (rng.gen::<f64>() + 0.5) * noise
}

fn render_row(cells: &[String], reverse: bool) -> String {
    if reverse {
        let reversed: Vec<&str> = cells.iter().rev().map(String::as_str).collect();
        reversed.join(",")
    } else {
        cells.join(",")
    }
}

/// Add noise to the target columns of every data row and re-render the table.
pub fn add_noise<R: Rng + ?Sized>(text: &str, options: &NoiseOptions, rng: &mut R) -> Result<String, RandomizeError> {
    let (headers, mut rows) = split_rows(text);
    if headers.is_empty() {
        return Err(RandomizeError::EmptyCsv);
    }
    let targets = options
        .columns
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| RandomizeError::MissingColumn(name.clone()))
        })
        .collect::<Result<Vec<usize>, _>>()?;

    for (line, row) in rows.iter_mut().enumerate() {
        for &col in &targets {
            let Some(cell) = row.get_mut(col) else {
                continue;
            };
            match cell.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    *cell = (value + noise_offset(rng, options.noise)).to_string();
                }
                _ => tracing::warn!(row = line + 1, column = %headers[col], cell = %cell, "skipping non-numeric cell"),
            }
        }
    }

    let mut out = String::new();
    out.push_str(&render_row(&headers, options.reverse_columns));
    for row in &rows {
        out.push('\n');
        out.push_str(&render_row(row, options.reverse_columns));
    }
    out.push('\n');
    Ok(out)
}

pub fn process_file<R: Rng + ?Sized>(
    input: &Path,
    output: &Path,
    options: &NoiseOptions,
    rng: &mut R,
) -> Result<usize, RandomizeError> {
    let text = fs::read_to_string(input).map_err(|e| RandomizeError::io(input, e))?;
    let noisy = add_noise(&text, options, rng)?;
    fs::write(output, &noisy).map_err(|e| RandomizeError::io(output, e))?;
    let rows = noisy.lines().count().saturating_sub(1);
    tracing::info!(input = %input.display(), output = %output.display(), rows, "wrote noisy table");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const TABLE: &str = "geoid,name,1990,2010\n1,North,10,20\n2,South,30,40\n";

    fn options(columns: &[&str]) -> NoiseOptions {
        NoiseOptions {
            noise: 5.0,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            reverse_columns: false,
        }
    }

    fn parsed(out: &str) -> Vec<Vec<String>> {
        out.lines().map(|l| l.split(',').map(str::to_string).collect()).collect()
    }

    #[test]
    fn test_noise_offset_range() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..1000 {
            let n = noise_offset(&mut rng, 5.0);
            assert!((2.5..7.5).contains(&n));
        }
    }

    #[test]
    fn test_every_data_row_gets_noise() {
        let mut rng = SmallRng::seed_from_u64(1);
        let out = add_noise(TABLE, &options(&["1990", "2010"]), &mut rng).unwrap();
        let rows = parsed(&out);

        assert_eq!(rows[0], vec!["geoid", "name", "1990", "2010"]);
        assert_eq!(rows.len(), 3);
        for (row, base) in rows[1..].iter().zip([(10.0, 20.0), (30.0, 40.0)]) {
            let a: f64 = row[2].parse().unwrap();
            let b: f64 = row[3].parse().unwrap();
            assert!(a >= base.0 + 2.5 && a < base.0 + 7.5);
            assert!(b >= base.1 + 2.5 && b < base.1 + 7.5);
        }
        assert_eq!(rows[2][1], "South");
    }

    #[test]
    fn test_reverse_columns_flag() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut opts = options(&["1990"]);
        opts.reverse_columns = true;
        let out = add_noise(TABLE, &opts, &mut rng).unwrap();
        let rows = parsed(&out);
        assert_eq!(rows[0], vec!["2010", "1990", "name", "geoid"]);
        assert_eq!(rows[1][0], "20");
    }

    #[test]
    fn test_non_numeric_cells_left_alone() {
        let mut rng = SmallRng::seed_from_u64(1);
        let out = add_noise("id,1990\n1,n/a\n", &options(&["1990"]), &mut rng).unwrap();
        assert_eq!(out, "id,1990\n1,n/a\n");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = add_noise(TABLE, &options(&["1980"]), &mut rng).unwrap_err();
        assert!(matches!(err, RandomizeError::MissingColumn(ref c) if c == "1980"));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            add_noise("\n\n", &options(&["1990"]), &mut rng),
            Err(RandomizeError::EmptyCsv)
        ));
    }

    #[test]
    fn test_process_file_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("education.csv");
        let output = dir.path().join("education_noisy.csv");
        std::fs::write(&input, TABLE).unwrap();

        let mut rng = SmallRng::seed_from_u64(5);
        let rows = process_file(&input, &output, &options(&["2010"]), &mut rng).unwrap();

        assert_eq!(rows, 2);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("geoid,name,1990,2010\n1,North,10,"));
        assert_eq!(std::fs::read_to_string(&input).unwrap(), TABLE);
    }

    #[test]
    fn test_default_options() {
        let opts = NoiseOptions::default();
        assert_eq!(opts.noise, 5.0);
        assert_eq!(opts.columns.len(), 7);
        assert!(!opts.reverse_columns);
    }
}
