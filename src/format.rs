//! Fixed-width numeric and text fields for the report tables.
//!
//! Rust's `{:e}` prints `1.5e3`; the report tables use the conventional
//! `1.5000000E+03` layout with a signed, two-digit exponent and the `%g`
//! style shortest representation, so both are built here.

/// Scientific notation with `precision` mantissa decimals, right-aligned in `width`.
///
/// ```
/// use equilib::format::sci;
///
/// assert_eq!(sci(1500.0, 14, 7), " 1.5000000E+03");
/// assert_eq!(sci(-2.5e-12, 10, 2), " -2.50E-12");
/// ```
pub fn sci(value: f64, width: usize, precision: usize) -> String {
    format!("{:>width$}", sci_bare(value, precision, 'E'), width = width)
}

/// Like [`sci`] with a lowercase exponent marker.
pub fn sci_lower(value: f64, width: usize, precision: usize) -> String {
    format!("{:>width$}", sci_bare(value, precision, 'e'), width = width)
}

/// Shortest of fixed or scientific notation with `precision` significant digits,
/// right-aligned in `width`.
///
/// ```
/// use equilib::format::general;
///
/// assert_eq!(general(298.15, 0, 6), "298.15");
/// assert_eq!(general(1500.0, 15, 2), "        1.5e+03");
/// assert_eq!(general(0.000012, 0, 3), "1.2e-05");
/// ```
pub fn general(value: f64, width: usize, precision: usize) -> String {
    format!("{:>width$}", general_bare(value, precision), width = width)
}

/// Fixed-point with `precision` decimals, right-aligned in `width`.
pub fn fixed(value: f64, width: usize, precision: usize) -> String {
    format!("{:>width$.precision$}", value, width = width, precision = precision)
}

/// Left-aligned text, truncated to `width` characters.
pub fn left(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

/// Right-aligned text, truncated to `width` characters.
pub fn right(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:>width$}", truncated, width = width)
}

/// A horizontal rule of `n` copies of `ch`.
pub fn rule(ch: char, n: usize) -> String {
    std::iter::repeat(ch).take(n).collect()
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value > 0.0 {
        "INF".to_string()
    } else {
        "-INF".to_string()
    }
}

/// Splits Rust's `{:.Ne}` output into mantissa and exponent.
fn split_exp(value: f64, decimals: usize) -> (String, i32) {
    let s = format!("{:.*e}", decimals, value);
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn with_exponent(mantissa: &str, exp: i32, marker: char) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}{}{}{:02}", mantissa, marker, sign, exp.abs())
}

fn sci_bare(value: f64, precision: usize, marker: char) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let (mantissa, exp) = split_exp(value, precision);
    with_exponent(&mantissa, exp, marker)
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn general_bare(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value).to_lowercase();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let p = precision.max(1);
    let (mantissa, exp) = split_exp(value, p - 1);
    if exp < -4 || exp >= p as i32 {
        with_exponent(trim_fraction(&mantissa), exp, 'e')
    } else {
        let decimals = (p as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sci() {
        assert_eq!(sci(0.0, 14, 7), " 0.0000000E+00");
        assert_eq!(sci(-1.0, 14, 7), "-1.0000000E+00");
        assert_eq!(sci(123456.0, 12, 4), "  1.2346E+05");
        assert_eq!(sci(1.0e-32, 0, 1), "1.0E-32");
        assert_eq!(sci(6.02e123, 0, 2), "6.02E+123");
        assert_eq!(sci(f64::NAN, 5, 2), "  NAN");
        assert_eq!(sci_lower(2.5, 10, 3), " 2.500e+00");
    }

    #[test]
    fn test_general() {
        assert_eq!(general(1.0, 0, 3), "1");
        assert_eq!(general(0.5, 10, 3), "       0.5");
        assert_eq!(general(-0.25, 0, 3), "-0.25");
        assert_eq!(general(1234.5678, 0, 3), "1.23e+03");
        assert_eq!(general(100.0, 0, 3), "100");
        assert_eq!(general(0.0001, 0, 3), "0.0001");
        assert_eq!(general(0.0, 0, 6), "0");
        assert_eq!(general(101325.0, 0, 6), "101325");
    }

    #[test]
    fn test_general_rounding_crosses_decade() {
        // 9.996 rounds to 10.0 at 3 digits
        assert_eq!(general(9.996, 0, 3), "10");
        assert_eq!(general(999.6, 0, 3), "1e+03");
    }

    #[test]
    fn test_fixed_and_text() {
        assert_eq!(fixed(-1.0, 6, 2), " -1.00");
        assert_eq!(left("Carbon-Monoxide", 12), "Carbon-Monox");
        assert_eq!(left("CO", 5), "CO   ");
        assert_eq!(right("O2", 5), "   O2");
        assert_eq!(rule('-', 3), "---");
    }
}
