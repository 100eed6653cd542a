//! Verilog numeric literal parsing

/// Width of unsized literals and of parameters
pub const DEFAULT_WIDTH: u32 = 32;

/// A literal folded to an integer, with its declared bit width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantValue {
    pub value: u64,
    pub width: u32,
}

/// Parse `255`, `8'hFF`, `4'b1010`, `'o17` or `8'b1010_0011`.
///
/// Returns `None` for malformed text and for literals holding `x`, `z` or
/// `?` digits, which have no single integer value. A value that does not
/// fit its declared width is still returned; width checks happen later.
pub fn parse_number(text: &str) -> Option<ConstantValue> {
    if text.is_empty() {
        return None;
    }

    let (width, radix, digits) = match text.split_once('\'') {
        None => (DEFAULT_WIDTH, 10, text),
        Some((size, rest)) => {
            let width = if size.is_empty() {
                DEFAULT_WIDTH
            } else {
                size.replace('_', "").parse().unwrap_or(DEFAULT_WIDTH)
            };
            let mut chars = rest.chars();
            let radix = match chars.next()? {
                'h' | 'H' => 16,
                'b' | 'B' => 2,
                'o' | 'O' => 8,
                _ => 10,
            };
            (width, radix, chars.as_str())
        }
    };

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    let value = if radix == 2 {
        parse_binary(&digits)?
    } else {
        u64::from_str_radix(&digits, radix).ok()?
    };

    Some(ConstantValue { value, width })
}

/// Shift-accumulate binary digits; any digit other than 0/1 fails the parse
fn parse_binary(digits: &str) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0u64, |acc, c| match c {
        '0' => Some(acc << 1),
        '1' => Some((acc << 1) | 1),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str) -> Option<(u64, u32)> {
        parse_number(text).map(|c| (c.value, c.width))
    }

    #[test]
    fn test_sized_literals() {
        assert_eq!(parsed("8'hFF"), Some((255, 8)));
        assert_eq!(parsed("4'b1010"), Some((10, 4)));
        assert_eq!(parsed("16'd255"), Some((255, 16)));
        assert_eq!(parsed("6'o17"), Some((15, 6)));
        assert_eq!(parsed("8'HfF"), Some((255, 8)));
    }

    #[test]
    fn test_underscores_are_separators() {
        assert_eq!(parsed("8'b1010_0011"), Some((163, 8)));
        assert_eq!(parsed("1_000"), Some((1000, 32)));
    }

    #[test]
    fn test_unsized_literals_default_to_32_bits() {
        assert_eq!(parsed("255"), Some((255, 32)));
        assert_eq!(parsed("'hA"), Some((10, 32)));
    }

    #[test]
    fn test_dont_care_and_high_impedance_digits_fail() {
        assert_eq!(parsed("4'b10x0"), None);
        assert_eq!(parsed("4'bzzzz"), None);
        assert_eq!(parsed("8'hx"), None);
        assert_eq!(parsed("4'b1?01"), None);
    }

    #[test]
    fn test_malformed_literals_fail() {
        assert_eq!(parsed(""), None);
        assert_eq!(parsed("8'"), None);
        assert_eq!(parsed("8'h"), None);
        assert_eq!(parsed("8'b"), None);
        assert_eq!(parsed("12ab"), None);
    }

    #[test]
    fn test_value_wider_than_declared_width_is_kept() {
        assert_eq!(parsed("4'hFF"), Some((255, 4)));
    }
}
