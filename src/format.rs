//! Display and input helpers using the shop's fixed conventions (R$, two decimals).

/// Format a money amount as `R$ 1234.56`. Rounding happens only here.
pub fn format_money(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}

/// Parse a decimal typed by the user. Accepts `,` as the decimal separator.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `(11) 3456-7890` for landlines, `(11) 93456-7890` for mobiles.
/// Anything that is not 10 or 11 digits is returned as the bare digits.
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        _ => digits,
    }
}

/// CNPJ as `12.345.678/0001-90`. Other lengths are returned as the bare digits.
pub fn format_cnpj(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 14 {
        return digits;
    }
    format!(
        "{}.{}.{}/{}-{}",
        &digits[..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(format_money(25.2), "R$ 25.20");
        assert_eq!(format_money(0.0), "R$ 0.00");
        assert_eq!(format_money(24.000000000000004), "R$ 24.00");
    }

    #[test]
    fn decimals_accept_comma() {
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal(" 3 "), Some(3.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn phones() {
        assert_eq!(format_phone("1134567890"), "(11) 3456-7890");
        assert_eq!(format_phone("11 93456-7890"), "(11) 93456-7890");
        assert_eq!(format_phone("12345"), "12345");
    }

    #[test]
    fn cnpj() {
        assert_eq!(format_cnpj("12345678000190"), "12.345.678/0001-90");
        assert_eq!(format_cnpj("12.345.678/0001-90"), "12.345.678/0001-90");
        assert_eq!(format_cnpj("123"), "123");
    }
}
