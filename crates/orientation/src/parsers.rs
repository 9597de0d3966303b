//! Library of parser functions for orientation files

// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{self, char, space0, space1};
use nom::combinator::{all_consuming, value};
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::tuple;
use nom::IResult;

/// Separator between values, a comma with optional padding or plain spaces
fn separator(i: &str) -> IResult<&str, ()> {
    alt((value((), tuple((space0, char(','), space0))), value((), space1)))(i)
}

/// Number of orientations on the first line of a file
pub(crate) fn count(i: &str) -> IResult<&str, usize> {
    let (i, n) = all_consuming(complete::u64)(i.trim())?;
    Ok((i, n as usize))
}

/// Every value on a line as a vector of f64 values
pub(crate) fn values(i: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(separated_list1(separator, double))(i.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated() {
        assert_eq!(values("1.0,0.5,-0.25"), Ok(("", vec![1.0, 0.5, -0.25])));
        assert_eq!(values(" 1.0 , 2.0,3 "), Ok(("", vec![1.0, 2.0, 3.0])));
    }

    #[test]
    fn space_separated() {
        assert_eq!(values("1e-3 2.5\t4"), Ok(("", vec![1e-3, 2.5, 4.0])));
    }

    #[test]
    fn trailing_junk_fails() {
        assert!(values("1.0,2.0,abc").is_err());
        assert!(values("").is_err());
    }

    #[test]
    fn count_line() {
        assert_eq!(count("10000\n"), Ok(("", 10000)));
        assert!(count("ten").is_err());
        assert!(count("12 13").is_err());
    }
}
