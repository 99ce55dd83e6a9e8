use std::fmt;

/// BIP9 deployment state for a block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ThresholdState {
    Defined,
    Started,
    LockedIn,
    Active,
    Failed,
}

impl ThresholdState {
    pub const ALL: [ThresholdState; 5] = [
        ThresholdState::Defined,
        ThresholdState::Started,
        ThresholdState::LockedIn,
        ThresholdState::Active,
        ThresholdState::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Defined => "defined",
            Self::Started => "started",
            Self::LockedIn => "locked_in",
            Self::Active => "active",
            Self::Failed => "failed",
        }
    }

    /// Progress rank along a chain. `LockedIn` and `Failed` share a rank.
    pub fn rank(self) -> u8 {
        match self {
            Self::Defined => 0,
            Self::Started => 1,
            Self::LockedIn | Self::Failed => 2,
            Self::Active => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Active | Self::Failed)
    }

    /// Whether miners should set the deployment bit.
    pub fn is_signalling(self) -> bool {
        matches!(self, Self::Started | Self::LockedIn)
    }
}

impl fmt::Display for ThresholdState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_progress() {
        let ranks: Vec<u8> = ThresholdState::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, [0, 1, 2, 3, 2]);
        assert!(ThresholdState::Failed.is_terminal());
        assert!(!ThresholdState::LockedIn.is_terminal());
        assert!(ThresholdState::LockedIn.is_signalling());
        assert!(!ThresholdState::Active.is_signalling());
    }
}
