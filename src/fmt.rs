/// Format an amount with thousands separators: 1,234.56. Amounts are
/// currency-agnostic, so no symbol is attached.
pub fn amount(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// First 8 characters of a UUID-style id, for display.
pub fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0d2ca1a5-55f8-4bbf-8f48-2b7911bd9541"), "0d2ca1a5");
        assert_eq!(short_id("r1"), "r1");
    }

    #[test]
    fn test_amount_formatting() {
        assert_eq!(amount(1234.56), "1,234.56");
        assert_eq!(amount(-500.00), "-500.00");
        assert_eq!(amount(0.0), "0.00");
        assert_eq!(amount(1000000.99), "1,000,000.99");
        assert_eq!(amount(42.10), "42.10");
    }
}
