//! Symbol version classification for the byte-mode character count field

use crate::error::{Result, ScanError};

/// Size class of a QR symbol (Model 2, versions 1-40)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// Versions 1-9
    Small,
    /// Versions 10-26
    Medium,
    /// Versions 27-40
    Large,
}

impl SymbolClass {
    /// Classify a reported symbol version
    pub fn from_version(version: i32) -> Result<Self> {
        match version {
            1..=9 => Ok(SymbolClass::Small),
            10..=26 => Ok(SymbolClass::Medium),
            27..=40 => Ok(SymbolClass::Large),
            _ => Err(ScanError::UnsupportedSymbolVersion { version }),
        }
    }

    /// Width in bits of the byte-mode character count field
    pub fn count_width(&self) -> usize {
        match self {
            SymbolClass::Small => 8,
            SymbolClass::Medium | SymbolClass::Large => 16,
        }
    }
}

/// Maps symbol versions to byte-mode length field widths
pub struct SymbolClassifier;

impl SymbolClassifier {
    /// Bit width of the length field for `version`
    pub fn width_for(version: i32) -> Result<usize> {
        SymbolClass::from_version(version).map(|class| class.count_width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_boundaries() {
        assert_eq!(SymbolClassifier::width_for(1).unwrap(), 8);
        assert_eq!(SymbolClassifier::width_for(9).unwrap(), 8);
        assert_eq!(SymbolClassifier::width_for(10).unwrap(), 16);
        assert_eq!(SymbolClassifier::width_for(26).unwrap(), 16);
        assert_eq!(SymbolClassifier::width_for(27).unwrap(), 16);
        assert_eq!(SymbolClassifier::width_for(40).unwrap(), 16);
    }

    #[test]
    fn test_out_of_range_versions() {
        for version in [0, -1, 41, 45, i32::MAX] {
            assert_eq!(
                SymbolClassifier::width_for(version),
                Err(ScanError::UnsupportedSymbolVersion { version })
            );
        }
    }

    #[test]
    fn test_symbol_class() {
        assert_eq!(SymbolClass::from_version(5), Ok(SymbolClass::Small));
        assert_eq!(SymbolClass::from_version(20), Ok(SymbolClass::Medium));
        assert_eq!(SymbolClass::from_version(33), Ok(SymbolClass::Large));
    }
}
