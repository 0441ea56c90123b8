use crate::error::CoreError;

/// Turns a 1-based sequence number into a frame locator.
///
/// The pattern holds exactly one placeholder: `{}` for the bare number or
/// `{:0N}` for a number zero-padded to `N` digits, e.g. `male{:04}.png`
/// → `male0001.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePattern {
    prefix: String,
    suffix: String,
    width: usize,
}

impl FramePattern {
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let invalid = |reason: &str| CoreError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let open = pattern
            .find('{')
            .ok_or_else(|| invalid("missing `{}` placeholder"))?;
        let close = pattern[open..]
            .find('}')
            .map(|i| open + i)
            .ok_or_else(|| invalid("unterminated placeholder"))?;
        let suffix = &pattern[close + 1..];
        if suffix.contains('{') || suffix.contains('}') {
            return Err(invalid("more than one placeholder"));
        }

        let placeholder = &pattern[open + 1..close];
        let width = if placeholder.is_empty() {
            0
        } else {
            let digits = placeholder
                .strip_prefix(":0")
                .ok_or_else(|| invalid("placeholder must be `{}` or `{:0N}`"))?;
            digits
                .parse::<usize>()
                .map_err(|_| invalid("padding width is not a number"))?
        };

        Ok(Self {
            prefix: pattern[..open].to_string(),
            suffix: suffix.to_string(),
            width,
        })
    }

    /// Locator for a 1-based sequence number.
    pub fn locator(&self, sequence: usize) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            sequence,
            self.suffix,
            width = self.width
        )
    }

    /// Locators for sequence numbers `1..=count`, in display order.
    pub fn locators(&self, count: usize) -> Vec<String> {
        (1..=count).map(|seq| self.locator(seq)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_padded_locator() {
        let p = FramePattern::parse("/male{:04}.png").unwrap();
        assert_eq!(p.locator(1), "/male0001.png");
        assert_eq!(p.locator(300), "/male0300.png");
        assert_eq!(p.locator(12345), "/male12345.png");
    }

    #[test]
    fn bare_placeholder() {
        let p = FramePattern::parse("frame_{}.jpg").unwrap();
        assert_eq!(p.locator(7), "frame_7.jpg");
    }

    #[test]
    fn locators_are_contiguous_and_ordered() {
        let p = FramePattern::parse("{:03}").unwrap();
        assert_eq!(p.locators(3), vec!["001", "002", "003"]);
        assert!(p.locators(0).is_empty());
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(FramePattern::parse("frame.png").is_err());
        assert!(FramePattern::parse("frame{.png").is_err());
        assert!(FramePattern::parse("{}_{}.png").is_err());
        assert!(FramePattern::parse("{:4}.png").is_err());
        assert!(FramePattern::parse("{:0x}.png").is_err());
    }
}
