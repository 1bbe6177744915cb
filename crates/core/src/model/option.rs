use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

//
// ─── OPTION LETTER ────────────────────────────────────────────────────────────
//

/// One of the five answer options printed on every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
    E,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Position of the option within a question, `A` = 0.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
            Self::E => 4,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
        }
    }

    /// Normalizes user input into a single uppercase letter.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidOption` unless the trimmed input is exactly
    /// one of `A`..=`E` in either case.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let mut chars = raw.trim().chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(ValidationError::InvalidOption(raw.to_owned()));
        };
        match c.to_ascii_uppercase() {
            'A' => Ok(Self::A),
            'B' => Ok(Self::B),
            'C' => Ok(Self::C),
            'D' => Ok(Self::D),
            'E' => Ok(Self::E),
            _ => Err(ValidationError::InvalidOption(raw.to_owned())),
        }
    }
}

impl FromStr for OptionLetter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

//
// ─── CATEGORY ─────────────────────────────────────────────────────────────────
//

/// Question section. `Twk` and `Tiu` are right/wrong, `Tkp` is weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// National insight test (objective).
    Twk,
    /// General intelligence test (objective).
    Tiu,
    /// Personal characteristics test (behavioral).
    Tkp,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Twk, Self::Tiu, Self::Tkp];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Twk => "TWK",
            Self::Tiu => "TIU",
            Self::Tkp => "TKP",
        }
    }

    #[must_use]
    pub fn is_behavioral(self) -> bool {
        matches!(self, Self::Tkp)
    }

    /// Parses a stored or user supplied category label, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidCategory` for unknown labels.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TWK" => Ok(Self::Twk),
            "TIU" => Ok(Self::Tiu),
            "TKP" => Ok(Self::Tkp),
            _ => Err(ValidationError::InvalidCategory(raw.to_owned())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_parse_normalizes_case_and_whitespace() {
        assert_eq!(OptionLetter::parse("a").unwrap(), OptionLetter::A);
        assert_eq!(OptionLetter::parse("  e\n").unwrap(), OptionLetter::E);
        assert_eq!("C".parse::<OptionLetter>().unwrap(), OptionLetter::C);
    }

    #[test]
    fn option_parse_rejects_malformed_input() {
        for raw in ["", "F", "AB", "1", " ", "é"] {
            let err = OptionLetter::parse(raw).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidOption(_)), "{raw:?}");
        }
    }

    #[test]
    fn option_index_follows_letter_order() {
        let indices: Vec<_> = OptionLetter::ALL.iter().map(|o| o.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn category_round_trips_through_label() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()).unwrap(), category);
        }
        assert_eq!(Category::parse("tkp").unwrap(), Category::Tkp);
        assert!(Category::parse("SKB").is_err());
        assert!(Category::Tkp.is_behavioral());
        assert!(!Category::Twk.is_behavioral());
    }
}
