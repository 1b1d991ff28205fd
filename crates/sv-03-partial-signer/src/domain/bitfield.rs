//! Aggregation bitfield of a partial attestation.
//!
//! One bit per committee member in committee order. A partial attestation
//! sets exactly one bit: the signer's own position. The coordinator ORs the
//! participants' bitfields into the aggregate.
//!
//! On the wire the bitfield is an SSZ bitlist: bits packed least-significant
//! first, followed by a single delimiter bit marking the length.

use crate::error::{Result, SignerError};
use bitvec::prelude::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationBits {
    bits: BitVec<u8, Lsb0>,
}

impl AggregationBits {
    /// Bitfield sized to a committee of `len` with only `position` set.
    pub fn with_single_bit(len: usize, position: usize) -> Result<Self> {
        if position >= len {
            return Err(SignerError::Bitfield(format!(
                "position {position} out of range for committee of {len}"
            )));
        }
        let mut bits = bitvec![u8, Lsb0; 0; len];
        bits.set(position, true);
        Ok(Self { bits })
    }

    /// Decode an SSZ bitlist. `None` when the delimiter bit is missing.
    pub fn from_ssz_bytes(bytes: &[u8]) -> Option<Self> {
        let last = *bytes.last()?;
        if last == 0 {
            return None;
        }
        let delimiter = (bytes.len() - 1) * 8 + (7 - last.leading_zeros() as usize);
        let mut bits = BitVec::<u8, Lsb0>::from_slice(bytes);
        bits.truncate(delimiter);
        Some(Self { bits })
    }

    /// Encode as an SSZ bitlist.
    pub fn to_ssz_bytes(&self) -> Vec<u8> {
        let mut bits = self.bits.clone();
        bits.push(true);
        bits.set_uninitialized(false);
        bits.into_vec()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index).map(|bit| *bit).unwrap_or(false)
    }

    /// Indices of set bits, ascending.
    pub fn set_positions(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for AggregationBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::committee_position;
    use proptest::prelude::*;

    #[test]
    fn test_committee_example_renders_0100() {
        let committee = [7, 3, 9, 1];
        let position = committee_position(&committee, 3).unwrap();
        let bits = AggregationBits::with_single_bit(committee.len(), position).unwrap();

        assert_eq!(bits.to_string(), "0100");
        assert_eq!(bits.len(), 4);
        assert_eq!(bits.count_ones(), 1);
        assert!(bits.get(1));
    }

    #[test]
    fn test_ssz_bitlist_has_delimiter() {
        let bits = AggregationBits::with_single_bit(4, 1).unwrap();
        assert_eq!(bits.to_ssz_bytes(), vec![0b0001_0010]);

        // Delimiter spills into a new byte on byte-aligned lengths.
        let bits = AggregationBits::with_single_bit(8, 7).unwrap();
        assert_eq!(bits.to_ssz_bytes(), vec![0b1000_0000, 0b0000_0001]);
    }

    #[test]
    fn test_ssz_decode_restores_length() {
        let bits = AggregationBits::with_single_bit(11, 9).unwrap();
        let decoded = AggregationBits::from_ssz_bytes(&bits.to_ssz_bytes()).unwrap();
        assert_eq!(decoded, bits);
        assert_eq!(decoded.set_positions(), vec![9]);

        assert!(AggregationBits::from_ssz_bytes(&[]).is_none());
        assert!(AggregationBits::from_ssz_bytes(&[0x01, 0x00]).is_none());
    }

    #[test]
    fn test_out_of_range_position_rejected() {
        assert!(matches!(
            AggregationBits::with_single_bit(4, 4),
            Err(SignerError::Bitfield(_))
        ));
        assert!(AggregationBits::with_single_bit(0, 0).is_err());
    }

    proptest! {
        #[test]
        fn prop_single_bit_at_own_position(
            members in proptest::collection::hash_set(0u64..10_000, 1..128),
            pick in any::<proptest::sample::Index>(),
        ) {
            let committee: Vec<u64> = members.into_iter().collect();
            let position = pick.index(committee.len());
            let me = committee[position];

            let found = committee_position(&committee, me).unwrap();
            let bits = AggregationBits::with_single_bit(committee.len(), found).unwrap();

            prop_assert_eq!(found, position);
            prop_assert_eq!(bits.len(), committee.len());
            prop_assert_eq!(bits.count_ones(), 1);
            prop_assert_eq!(bits.set_positions(), vec![position]);
        }
    }
}
