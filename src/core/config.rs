//! Matching configuration
//!
//! `MatchConfig` is an immutable snapshot built once per reconciliation run
//! and threaded by reference into every stage. Stages never mutate it.

use crate::types::ReconError;
use rust_decimal::Decimal;

/// Options recognized by the matching stages
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Maximum absolute difference for two amounts to count as equal
    pub match_tolerance: Decimal,
    /// Largest day gap accepted by the fuzzy matcher
    pub fuzzy_date_range: u32,
    /// Maximum absolute difference accepted as a rounding error
    pub rounding_tolerance: Decimal,
    /// Largest day gap accepted by the rounding matcher
    pub rounding_date_range: u32,
    /// Largest day gap between a split source and its parts
    pub split_match_date_range: u32,
    pub enable_exact_match: bool,
    pub enable_fuzzy_match: bool,
    pub enable_split_match: bool,
    pub enable_rounding_match: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_tolerance: Decimal::new(1, 2),
            fuzzy_date_range: 7,
            rounding_tolerance: Decimal::new(5, 1),
            rounding_date_range: 2,
            split_match_date_range: 3,
            enable_exact_match: true,
            enable_fuzzy_match: true,
            enable_split_match: true,
            enable_rounding_match: true,
        }
    }
}

impl MatchConfig {
    /// Check that every tolerance is strictly positive
    ///
    /// Amount equality is a strict `<` comparison, so a zero tolerance would
    /// silently disable every amount-based stage.
    pub fn validate(&self) -> Result<(), ReconError> {
        if self.match_tolerance <= Decimal::ZERO {
            return Err(ReconError::invalid_config(
                "match_tolerance",
                format!("must be positive, got {}", self.match_tolerance),
            ));
        }
        if self.rounding_tolerance <= Decimal::ZERO {
            return Err(ReconError::invalid_config(
                "rounding_tolerance",
                format!("must be positive, got {}", self.rounding_tolerance),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();

        assert_eq!(config.match_tolerance, Decimal::new(1, 2));
        assert_eq!(config.fuzzy_date_range, 7);
        assert_eq!(config.rounding_tolerance, Decimal::new(5, 1));
        assert_eq!(config.rounding_date_range, 2);
        assert_eq!(config.split_match_date_range, 3);
        assert!(config.enable_exact_match);
        assert!(config.enable_fuzzy_match);
        assert!(config.enable_split_match);
        assert!(config.enable_rounding_match);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::zero_match_tolerance(Decimal::ZERO, Decimal::new(5, 1), "match_tolerance")]
    #[case::negative_match_tolerance(Decimal::new(-1, 2), Decimal::new(5, 1), "match_tolerance")]
    #[case::zero_rounding_tolerance(Decimal::new(1, 2), Decimal::ZERO, "rounding_tolerance")]
    fn test_validate_rejects_non_positive_tolerance(
        #[case] match_tolerance: Decimal,
        #[case] rounding_tolerance: Decimal,
        #[case] option: &str,
    ) {
        let config = MatchConfig {
            match_tolerance,
            rounding_tolerance,
            ..MatchConfig::default()
        };

        match config.validate() {
            Err(ReconError::InvalidConfig { option: actual, .. }) => assert_eq!(actual, option),
            other => panic!("Expected InvalidConfig for {}, got {:?}", option, other),
        }
    }
}
