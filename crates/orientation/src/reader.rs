//! Read operations for orientation files
//!
//! Files are plain text. The first line is the number of orientations, and
//! each of the following lines holds a fixed number of values for one
//! orientation. Values may be separated by commas or whitespace.

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::{count, values};

// external crates
use log::{debug, warn};

/// Read crystal axis unit vectors, 9 values per orientation
pub fn read_unit_vectors<P: AsRef<Path>>(path: P) -> Result<Vec<[f64; 9]>> {
    read_fixed::<9>(path)
}

/// Read Bunge Euler angles, 3 values per orientation
pub fn read_euler_angles<P: AsRef<Path>>(path: P) -> Result<Vec<[f64; 3]>> {
    read_fixed::<3>(path)
}

/// Read inverse pole figure RGB colours, 3 values per orientation
pub fn read_rgb<P: AsRef<Path>>(path: P) -> Result<Vec<[f64; 3]>> {
    read_fixed::<3>(path)
}

/// Read a file with `N` values on every orientation line
fn read_fixed<const N: usize>(path: impl AsRef<Path>) -> Result<Vec<[f64; N]>> {
    let path = path.as_ref();
    debug!("Reading orientation data from {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    parse_lines::<N>(reader.lines())
}

/// Interpret the count line and the following orientation lines
///
/// A file declaring more orientations than it contains is truncated to the
/// lines present, with a warning.
fn parse_lines<const N: usize>(
    mut lines: impl Iterator<Item = std::io::Result<String>>,
) -> Result<Vec<[f64; N]>> {
    let first = lines.next().transpose()?.unwrap_or_default();
    let (_, n) = count(&first).map_err(|_| Error::MissingCount(first.clone()))?;

    let mut orientations = Vec::with_capacity(n);
    for (i, line) in lines.take(n).enumerate() {
        let line = line?;
        let (_, parsed) = values(&line)?;
        let entry: [f64; N] = parsed.try_into().map_err(|v: Vec<f64>| {
            Error::UnexpectedNumberOfValues {
                line: i + 2,
                expected: N,
                found: v.len(),
            }
        })?;
        orientations.push(entry);
    }

    if orientations.len() < n {
        warn!(
            "Expected {n} orientations but only {} were found",
            orientations.len()
        );
    }

    Ok(orientations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &str) -> impl Iterator<Item = std::io::Result<String>> + '_ {
        s.lines().map(|l| Ok(l.to_string()))
    }

    #[test]
    fn parse_euler_lines() {
        let data = "2\n0.1,0.2,0.3\n1.0 2.0 3.0\n";
        let parsed = parse_lines::<3>(lines(data)).unwrap();
        assert_eq!(parsed, vec![[0.1, 0.2, 0.3], [1.0, 2.0, 3.0]]);
    }

    #[test]
    fn extra_lines_are_ignored() {
        let data = "1\n0.1,0.2,0.3\n9,9,9\n";
        let parsed = parse_lines::<3>(lines(data)).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn short_file_is_truncated() {
        let data = "3\n1,0,0,0,1,0,0,0,1\n";
        let parsed = parse_lines::<9>(lines(data)).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn wrong_number_of_values() {
        let data = "2\n0.1,0.2,0.3\n1.0,2.0\n";
        let result = parse_lines::<3>(lines(data));
        assert!(matches!(
            result,
            Err(Error::UnexpectedNumberOfValues {
                line: 3,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn missing_count() {
        assert!(matches!(
            parse_lines::<3>(lines("0.1,0.2,0.3\n")),
            Err(Error::MissingCount(_))
        ));
        assert!(matches!(
            parse_lines::<3>(lines("")),
            Err(Error::MissingCount(_))
        ));
    }
}
