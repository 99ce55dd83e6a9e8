//! Versionbits deployment descriptors and their load-time resolution.

use crate::constants::{MAX_DEPLOYMENT_BIT, TIMESTAMP_NEVER};
use crate::params::ParamsError;

/// A deployment as transcribed; `None` threshold/window defer to the network default.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeploymentSpec {
    pub name: &'static str,
    pub bit: u8,
    pub start_time: u32,
    pub timeout: u32,
    pub threshold: Option<u32>,
    pub window: Option<u32>,
    pub required: bool,
    pub force: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartTime {
    At(u32),
    Never,
}

impl StartTime {
    pub fn from_raw(raw: u32) -> Self {
        if raw == TIMESTAMP_NEVER {
            Self::Never
        } else {
            Self::At(raw)
        }
    }

    pub fn as_raw(self) -> u32 {
        match self {
            Self::At(time) => time,
            Self::Never => TIMESTAMP_NEVER,
        }
    }

    pub fn reached(self, median_time: i64) -> bool {
        match self {
            Self::At(time) => median_time >= i64::from(time),
            Self::Never => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Timeout {
    At(u32),
    Never,
}

impl Timeout {
    pub fn from_raw(raw: u32) -> Self {
        if raw == TIMESTAMP_NEVER {
            Self::Never
        } else {
            Self::At(raw)
        }
    }

    pub fn as_raw(self) -> u32 {
        match self {
            Self::At(time) => time,
            Self::Never => TIMESTAMP_NEVER,
        }
    }

    pub fn reached(self, median_time: i64) -> bool {
        match self {
            Self::At(time) => median_time >= i64::from(time),
            Self::Never => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Deployment {
    pub name: &'static str,
    pub bit: u8,
    pub start_time: StartTime,
    pub timeout: Timeout,
    pub threshold: u32,
    pub window: u32,
    /// Blocks must signal the bit while the deployment is locked in.
    pub required: bool,
    /// The bit stays reserved until the deployment is active or failed.
    pub force: bool,
}

impl Deployment {
    pub fn resolve(
        spec: &DeploymentSpec,
        default_threshold: Option<u32>,
        default_window: Option<u32>,
    ) -> Result<Self, ParamsError> {
        if spec.bit > MAX_DEPLOYMENT_BIT {
            return Err(ParamsError::InvalidBit {
                deployment: spec.name,
                bit: spec.bit,
            });
        }
        let threshold = spec.threshold.or(default_threshold).ok_or(
            ParamsError::UnresolvedDefault {
                deployment: spec.name,
                field: "threshold",
            },
        )?;
        let window = spec
            .window
            .or(default_window)
            .ok_or(ParamsError::UnresolvedDefault {
                deployment: spec.name,
                field: "window",
            })?;
        if window == 0 || threshold == 0 || threshold > window {
            return Err(ParamsError::InvalidThreshold {
                deployment: spec.name,
                threshold,
                window,
            });
        }

        Ok(Self {
            name: spec.name,
            bit: spec.bit,
            start_time: StartTime::from_raw(spec.start_time),
            timeout: Timeout::from_raw(spec.timeout),
            threshold,
            window,
            required: spec.required,
            force: spec.force,
        })
    }

    pub fn mask(&self) -> u32 {
        1u32 << self.bit
    }

    /// A zero timeout marks a deployment whose schedule has not been set yet.
    pub fn is_configured(&self) -> bool {
        self.timeout != Timeout::At(0)
    }

    /// Whether the deployment can ever leave `Defined`.
    pub fn can_start(&self) -> bool {
        self.is_configured() && self.start_time != StartTime::Never
    }

    /// Half-open `[start, timeout)` interval during which the bit may be signalled.
    pub fn live_range(&self) -> Option<(u64, u64)> {
        if !self.can_start() {
            return None;
        }
        let start = u64::from(self.start_time.as_raw());
        let end = match self.timeout {
            Timeout::At(time) => u64::from(time),
            Timeout::Never => u64::MAX,
        };
        (start < end).then_some((start, end))
    }

    /// Two deployments conflict only when they share a bit and their live ranges overlap.
    pub fn conflicts_with(&self, other: &Deployment) -> bool {
        if self.bit != other.bit {
            return false;
        }
        match (self.live_range(), other.live_range()) {
            (Some((a_start, a_end)), Some((b_start, b_end))) => {
                a_start < b_end && b_start < a_end
            }
            _ => false,
        }
    }
}
