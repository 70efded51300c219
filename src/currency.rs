//! Currency formatting shared by the view engine and the HTML templates.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format a signed amount as Brazilian-real currency text, e.g. `R$1,234.50`
/// or `-R$30.00`.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("R$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-R$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "R$0.00".to_owned();
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

#[cfg(test)]
mod tests {
    use super::format_currency;

    #[test]
    fn formats_positive_amounts() {
        assert_eq!(format_currency(70.0), "R$70.00");
        assert_eq!(format_currency(1234.5), "R$1,234.50");
    }

    #[test]
    fn formats_negative_amounts_with_leading_sign() {
        assert_eq!(format_currency(-30.0), "-R$30.00");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "R$0.00");
    }

    #[test]
    fn restores_omitted_trailing_zero() {
        assert_eq!(format_currency(12.3), "R$12.30");
    }
}
