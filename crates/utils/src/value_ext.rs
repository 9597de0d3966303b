use crate::f;

/// Extends primitives with the number formats used in reports
pub trait ValueExt {
    /// Scientific notation with a signed, zero-padded exponent
    ///
    /// Used for summary tables where values span many orders of magnitude,
    /// such as grain volumes in cubic microns.
    ///
    /// ```rust
    /// # use grainkit_utils::ValueExt;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1500.0).sci(3, 2), "1.500e+03".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Fixed-point notation with exactly `precision` decimals
    ///
    /// Orientation listings consumed by texture tools expect six decimals.
    ///
    /// ```rust
    /// # use grainkit_utils::ValueExt;
    /// assert_eq!((12.0).fixed(6), "12.000000".to_string());
    /// assert_eq!((0.1234567).fixed(6), "0.123457".to_string());
    /// ```
    fn fixed(&self, precision: usize) -> String;

    /// Shortest of fixed or scientific notation to `significant` figures
    ///
    /// Follows the C `%g` conversion, so trailing zeros are dropped and the
    /// exponent has at least two digits.
    ///
    /// ```rust
    /// # use grainkit_utils::ValueExt;
    /// assert_eq!((1e-6).general(6), "1e-06".to_string());
    /// assert_eq!((1500.0).general(6), "1500".to_string());
    /// assert_eq!((0.25).general(6), "0.25".to_string());
    /// ```
    fn general(&self, significant: usize) -> String;
}

impl<T: std::fmt::LowerExp + std::fmt::Display> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let num = f!("{:.precision$e}", &self, precision = precision);
        let Some((mantissa, exp)) = num.split_once('e') else {
            return num;
        };
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix('-') {
            Some(exp) => ('-', exp),
            None => ('+', exp),
        };
        f!("{mantissa}e{sign}{exp:0>exp_pad$}")
    }

    fn fixed(&self, precision: usize) -> String {
        f!("{:.precision$}", &self, precision = precision)
    }

    fn general(&self, significant: usize) -> String {
        let significant = significant.max(1);
        let num = f!("{:.precision$e}", &self, precision = significant - 1);
        let Some((mantissa, exp)) = num.split_once('e') else {
            return num;
        };
        let Ok(exp) = exp.parse::<i32>() else {
            return num;
        };

        if exp < -4 || exp >= significant as i32 {
            let sign = if exp < 0 { '-' } else { '+' };
            f!("{}e{sign}{:02}", trim_zeros(mantissa), exp.unsigned_abs())
        } else {
            let precision = (significant as i32 - 1 - exp) as usize;
            trim_zeros(&f!("{:.precision$}", &self, precision = precision)).to_string()
        }
    }
}

/// Drop trailing zeros after a decimal point, and the point if left bare
fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
