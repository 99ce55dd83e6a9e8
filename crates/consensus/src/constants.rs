//! Consensus-wide constants shared by params and versionbits.

/// Top three version bits a block sets to take part in versionbits signalling.
pub const VERSIONBITS_TOP_BITS: u32 = 0x2000_0000;
/// Mask selecting the top three version bits.
pub const VERSIONBITS_TOP_MASK: u32 = 0xe000_0000;
/// Number of bits available for deployments below the top bits.
pub const VERSIONBITS_NUM_BITS: u8 = 29;
/// Highest bit a deployment may signal on.
pub const MAX_DEPLOYMENT_BIT: u8 = VERSIONBITS_NUM_BITS - 1;

/// Timestamp sentinel meaning "never" for deployment start and timeout.
pub const TIMESTAMP_NEVER: u32 = 0xffff_ffff;

/// Number of ancestors used for median-time-past.
pub const MEDIAN_TIME_SPAN: usize = 11;

/// Whether `version` carries the versionbits top bits and sets `bit`.
pub fn signals_bit(version: u32, bit: u8) -> bool {
    (version & VERSIONBITS_TOP_MASK) == VERSIONBITS_TOP_BITS && (version >> bit) & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signalling_requires_top_bits() {
        assert!(signals_bit(VERSIONBITS_TOP_BITS | 1, 0));
        assert!(!signals_bit(VERSIONBITS_TOP_BITS | 1, 1));
        assert!(!signals_bit(1, 0));
        assert!(!signals_bit(0x6000_0001, 0));
        assert!(signals_bit(VERSIONBITS_TOP_BITS | (1 << 28), MAX_DEPLOYMENT_BIT));
    }
}
