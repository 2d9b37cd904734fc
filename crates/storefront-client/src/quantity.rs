//! Quantity stepper model

/// Bounded purchase quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(u32);

impl Quantity {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 1000;

    /// Read the initial value from display text
    ///
    /// Takes the leading integer like `parseInt`; unparsable or
    /// non-positive text gives 1, and values above the ceiling clamp to it.
    pub fn parse(text: &str) -> Self {
        let value = leading_integer(text)
            .filter(|n| *n >= i64::from(Self::MIN))
            .map(|n| n.min(i64::from(Self::MAX)) as u32)
            .unwrap_or(Self::MIN);
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Step up unless at the ceiling; returns whether the value changed
    pub fn increment(&mut self) -> bool {
        if self.0 < Self::MAX {
            self.0 += 1;
            true
        } else {
            false
        }
    }

    /// Step down unless at the floor; returns whether the value changed
    pub fn decrement(&mut self) -> bool {
        if self.0 > Self::MIN {
            self.0 -= 1;
            true
        } else {
            false
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

/// Optional sign and digits after leading whitespace
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Anything too long to fit saturates, which only matters for clamping
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(Quantity::parse("3").value(), 3);
        assert_eq!(Quantity::parse("  12 ").value(), 12);
    }

    #[test]
    fn test_parse_integer_prefix() {
        assert_eq!(Quantity::parse("4 items").value(), 4);
        assert_eq!(Quantity::parse("7.9").value(), 7);
    }

    #[test]
    fn test_parse_defaults_to_one() {
        assert_eq!(Quantity::parse("").value(), 1);
        assert_eq!(Quantity::parse("abc").value(), 1);
        assert_eq!(Quantity::parse("0").value(), 1);
        assert_eq!(Quantity::parse("-5").value(), 1);
    }

    #[test]
    fn test_parse_clamps_to_ceiling() {
        assert_eq!(Quantity::parse("5000").value(), 1000);
        assert_eq!(Quantity::parse("99999999999999999999999").value(), 1000);
    }

    #[test]
    fn test_five_increments_from_one() {
        let mut quantity = Quantity::parse("1");
        for _ in 0..5 {
            assert!(quantity.increment());
        }
        assert_eq!(quantity.value(), 6);
    }

    #[test]
    fn test_floor_holds() {
        let mut quantity = Quantity::default();
        assert!(!quantity.decrement());
        assert_eq!(quantity.value(), 1);
    }

    #[test]
    fn test_ceiling_holds() {
        let mut quantity = Quantity::parse("999");
        assert!(quantity.increment());
        assert!(!quantity.increment());
        assert_eq!(quantity.value(), 1000);
        assert!(quantity.decrement());
        assert_eq!(quantity.value(), 999);
    }
}
