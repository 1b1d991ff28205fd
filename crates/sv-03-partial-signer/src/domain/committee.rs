//! Committee position lookup.

use shared_types::ValidatorIndex;

/// Ordinal position of `validator_index` within `committee`.
pub fn committee_position(
    committee: &[ValidatorIndex],
    validator_index: ValidatorIndex,
) -> Option<usize> {
    committee.iter().position(|member| *member == validator_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_found() {
        assert_eq!(committee_position(&[7, 3, 9, 1], 3), Some(1));
        assert_eq!(committee_position(&[7, 3, 9, 1], 1), Some(3));
    }

    #[test]
    fn test_absent_validator() {
        assert_eq!(committee_position(&[7, 3, 9, 1], 4), None);
        assert_eq!(committee_position(&[], 0), None);
    }
}
