use std::error::Error;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, Trim, Writer};
use munkres::{Assignment, Cost, Matrix};
use serde::de::DeserializeOwned;
use serde::Serialize;

// Read a cost matrix in the plain text format: row count, column count, then the costs in
// row-major order, all separated by whitespace
pub fn read_text<C>(path: &Path) -> Result<Matrix<C>, Box<dyn Error>>
where
    C: Cost + FromStr,
    C::Err: Error + 'static,
{
    parse_text(&fs::read_to_string(path)?)
}

pub fn parse_text<C>(input: &str) -> Result<Matrix<C>, Box<dyn Error>>
where
    C: Cost + FromStr,
    C::Err: Error + 'static,
{
    let mut tokens = input.split_whitespace();
    let mut dimension = || -> Result<usize, Box<dyn Error>> {
        Ok(tokens.next().ok_or("missing matrix dimensions")?.parse()?)
    };
    let rows = dimension()?;
    let cols = dimension()?;
    let cells = rows.checked_mul(cols).ok_or("matrix dimensions overflow")?;

    let data = tokens
        .by_ref()
        .take(cells)
        .map(str::parse)
        .collect::<Result<Vec<C>, _>>()?;
    let trailing = tokens.count();
    if trailing > 0 {
        log::warn!("ignoring {trailing} values after the {rows}x{cols} matrix");
    }

    Ok(Matrix::new(rows, cols, data)?)
}

// Read a header-less CSV file with one matrix row per record
pub fn read_csv<C>(path: &Path) -> Result<Matrix<C>, Box<dyn Error>>
where
    C: Cost + DeserializeOwned,
{
    parse_csv(fs::File::open(path)?)
}

pub fn parse_csv<C, R>(reader: R) -> Result<Matrix<C>, Box<dyn Error>>
where
    C: Cost + DeserializeOwned,
    R: Read,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let rows: Vec<Vec<C>> = rdr.deserialize().collect::<Result<_, _>>()?;
    Ok(Matrix::from_rows(&rows)?)
}

// One line per row with its matched column (-1 if unmatched), optionally preceded by the elapsed
// milliseconds
pub fn write_text<C: Cost, W: Write>(
    mut out: W,
    assignment: &Assignment<C>,
    elapsed_ms: Option<u128>,
) -> Result<(), Box<dyn Error>> {
    if let Some(ms) = elapsed_ms {
        writeln!(out, "{ms}")?;
    }
    for col in assignment.row_to_col() {
        match col {
            Some(col) => writeln!(out, "{col}")?,
            None => writeln!(out, "-1")?,
        }
    }
    out.flush()?;
    Ok(())
}

// Function to write the matched cells as `row,col,cost` records
pub fn write_csv<C, W>(
    out: W,
    costs: &Matrix<C>,
    assignment: &Assignment<C>,
) -> Result<(), Box<dyn Error>>
where
    C: Cost + Serialize,
    W: Write,
{
    let mut wtr = Writer::from_writer(out);
    for pairing in assignment.pairings(costs) {
        wtr.serialize(pairing)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use munkres::{solve, Matrix};

    use super::{parse_csv, parse_text, write_csv, write_text};

    #[test]
    fn parses_text_matrix() {
        let costs: Matrix<i64> = parse_text("2 3\n4 1 3\n2 0 5\n").unwrap();
        assert_eq!(costs.rows(), 2);
        assert_eq!(costs.row(1), &[2, 0, 5]);
    }

    #[test]
    fn short_text_matrix_is_rejected() {
        assert!(parse_text::<i64>("2 2\n1 2 3").is_err());
        assert!(parse_text::<i64>("2").is_err());
        assert!(parse_text::<i64>("0 2").is_err());
        assert!(parse_text::<f64>("1 1 NaN").is_err());
    }

    #[test]
    fn parses_csv_matrix() {
        let costs: Matrix<f64> = parse_csv("1.5, 2\n3, 0.25\n".as_bytes()).unwrap();
        assert_eq!(costs.row(0), &[1.5, 2.0]);
        assert!(parse_csv::<f64, _>("1, 2\n3\n".as_bytes()).is_err());
    }

    #[test]
    fn writes_one_column_per_row() {
        let costs: Matrix<i64> = parse_text("3 2  5 2  1 8  9 3").unwrap();
        let assignment = solve(&costs).unwrap();

        let mut out = Vec::new();
        write_text(&mut out, &assignment, Some(7)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "7\n1\n0\n-1\n");

        let mut out = Vec::new();
        write_csv(&mut out, &costs, &assignment).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "row,col,cost\n0,1,2\n1,0,1\n"
        );
    }
}
