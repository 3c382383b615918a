//! contains small utility functions that have nowhere else to go

use crate::parser::{Pair, Pairs};

macro_rules! bug {
    ($msg:literal $(, $args:tt)*) => {
       panic!(concat!("A vivid bug occured:\n\n", $msg) $(, $args)*)
    };
}

/// returns the only pair of a successful parse
pub fn single_pair(mut pairs: Pairs) -> Pair {
    let Some(pair) = pairs.next() else {
        bug!("a successful parse produced no pairs");
    };
    pair
}

/// formats a number the way a browser would turn it into a string
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.into()
    } else if n == 0.0 {
        // covers -0
        "0".into()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // exponent notation, with an explicit sign on positive exponents
        let s = format!("{:e}", n);
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => s,
        }
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-10), "1.5e-10");
    }
}
