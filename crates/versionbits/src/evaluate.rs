//! Versionbits state evaluation over a header chain.

use std::sync::Arc;

use iop_consensus::constants::{
    signals_bit, MEDIAN_TIME_SPAN, VERSIONBITS_NUM_BITS, VERSIONBITS_TOP_BITS,
};
use iop_consensus::{Deployment, Hash256, NetworkParams};
use iop_log::{log_debug, log_trace, log_warn};

use crate::cache::{StateCache, DEFAULT_STATE_CACHE_ENTRIES};
use crate::error::VersionBitsError;
use crate::headers::{HeaderInfo, HeaderLookup};
use crate::state::ThresholdState;

/// Signalling progress of the window a new block would extend.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BitStatistics {
    pub period: u32,
    pub threshold: u32,
    /// Blocks of the current window already on the chain.
    pub elapsed: u32,
    /// Signalling blocks among `elapsed`.
    pub count: u32,
    /// Whether the threshold can still be met in this window.
    pub possible: bool,
}

struct WindowScan {
    signalled: u32,
    previous_boundary: Option<HeaderInfo>,
}

struct PendingWindow {
    boundary: HeaderInfo,
    median_time: i64,
    signalled: u32,
}

pub struct VersionBits<H> {
    params: Arc<NetworkParams>,
    headers: H,
    cache: StateCache,
}

impl<H: HeaderLookup> VersionBits<H> {
    pub fn new(params: Arc<NetworkParams>, headers: H) -> Self {
        Self::with_cache_capacity(params, headers, DEFAULT_STATE_CACHE_ENTRIES)
    }

    pub fn with_cache_capacity(params: Arc<NetworkParams>, headers: H, capacity: usize) -> Self {
        Self {
            params,
            headers,
            cache: StateCache::new(capacity),
        }
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    pub fn headers(&self) -> &H {
        &self.headers
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    /// State of `name` for a block built on top of `hash`.
    pub fn state(&self, name: &str, hash: &Hash256) -> Result<ThresholdState, VersionBitsError> {
        let (index, deployment) = self.find_deployment(name)?;
        let prev = self.require_header(hash)?;
        self.state_after(index, deployment, &prev)
    }

    /// Every deployment's state for a child of `hash`, in table order.
    pub fn deployment_states(
        &self,
        hash: &Hash256,
    ) -> Result<Vec<(&'static str, ThresholdState)>, VersionBitsError> {
        let prev = self.require_header(hash)?;
        self.params
            .deployments
            .iter()
            .enumerate()
            .map(|(index, deployment)| {
                self.state_after(index, deployment, &prev)
                    .map(|state| (deployment.name, state))
            })
            .collect()
    }

    /// Version a miner should use for a block on top of `prev_hash`.
    ///
    /// Deployments are scanned in table order. The first deployment that is
    /// live, or forced and not yet terminal, claims its bit; later ones on the
    /// same bit are skipped.
    pub fn compute_block_version(&self, prev_hash: &Hash256) -> Result<u32, VersionBitsError> {
        let prev = self.require_header(prev_hash)?;
        let mut version = VERSIONBITS_TOP_BITS;
        let mut claimed: [Option<&'static str>; VERSIONBITS_NUM_BITS as usize] =
            [None; VERSIONBITS_NUM_BITS as usize];

        for (index, deployment) in self.params.deployments.iter().enumerate() {
            let state = self.state_after(index, deployment, &prev)?;
            let live = state.is_signalling();
            let reserved = deployment.force && !state.is_terminal();
            if !live && !reserved {
                continue;
            }
            let Some(slot) = claimed.get_mut(usize::from(deployment.bit)) else {
                continue;
            };
            if let Some(owner) = *slot {
                if live {
                    log_warn!(
                        "deployment {} is {} but bit {} is claimed by {}",
                        deployment.name,
                        state,
                        deployment.bit,
                        owner
                    );
                }
                continue;
            }
            *slot = Some(deployment.name);
            if live {
                version |= deployment.mask();
            }
        }
        Ok(version)
    }

    /// Rejects `version` when a required deployment is locked in and the bit is not set.
    pub fn check_required_signals(
        &self,
        prev_hash: &Hash256,
        version: u32,
    ) -> Result<(), VersionBitsError> {
        let prev = self.require_header(prev_hash)?;
        for (index, deployment) in self.params.deployments.iter().enumerate() {
            if !deployment.required {
                continue;
            }
            let state = self.state_after(index, deployment, &prev)?;
            if state == ThresholdState::LockedIn && !signals_bit(version, deployment.bit) {
                return Err(VersionBitsError::MissingRequiredSignal {
                    name: deployment.name,
                    bit: deployment.bit,
                });
            }
        }
        Ok(())
    }

    /// Signalling counts for the window in progress after `hash`.
    pub fn statistics(&self, name: &str, hash: &Hash256) -> Result<BitStatistics, VersionBitsError> {
        let (_, deployment) = self.find_deployment(name)?;
        let tip = self.require_header(hash)?;
        let elapsed = (tip.height + 1) % deployment.window;

        let mut count = 0u32;
        let mut header = tip;
        for step in 0..elapsed {
            if signals_bit(header.version, deployment.bit) {
                count += 1;
            }
            if step + 1 < elapsed {
                header = self.require_parent(&header)?;
            }
        }

        Ok(BitStatistics {
            period: deployment.window,
            threshold: deployment.threshold,
            elapsed,
            count,
            possible: count + (deployment.window - elapsed) >= deployment.threshold,
        })
    }

    /// Forgets cached states recorded for a block leaving the active chain.
    pub fn disconnect_block(&self, hash: &Hash256) -> usize {
        let removed = self.cache.remove_block(hash);
        if removed > 0 {
            log_trace!("dropped {removed} cached deployment states on disconnect");
        }
        removed
    }

    fn find_deployment(&self, name: &str) -> Result<(usize, &Deployment), VersionBitsError> {
        self.params
            .deployments
            .iter()
            .enumerate()
            .find(|(_, deployment)| deployment.name == name)
            .ok_or_else(|| VersionBitsError::UnknownDeployment(name.to_string()))
    }

    fn state_after(
        &self,
        index: usize,
        deployment: &Deployment,
        prev: &HeaderInfo,
    ) -> Result<ThresholdState, VersionBitsError> {
        if !deployment.can_start() {
            return Ok(ThresholdState::Defined);
        }

        let mut pending: Vec<PendingWindow> = Vec::new();
        let mut state = ThresholdState::Defined;
        let mut cursor = self.boundary_at_or_below(prev, deployment.window)?;
        while let Some(boundary) = cursor {
            if let Some(cached) = self.cache.get(index, &boundary.hash) {
                state = cached;
                break;
            }
            // Walk to genesis or a cached state: median time past may decrease.
            let median_time = self.median_time_past(&boundary)?;
            let scan = self.scan_window(&boundary, deployment)?;
            pending.push(PendingWindow {
                boundary,
                median_time,
                signalled: scan.signalled,
            });
            cursor = scan.previous_boundary;
        }

        while let Some(window) = pending.pop() {
            let next = transition(state, deployment, window.median_time, window.signalled);
            if next != state {
                log_debug!(
                    "deployment {} {} -> {} at height {} ({}/{} signalled)",
                    deployment.name,
                    state,
                    next,
                    window.boundary.height,
                    window.signalled,
                    deployment.threshold
                );
            }
            state = self.cache.insert(index, window.boundary.hash, next);
        }
        Ok(state)
    }

    /// Last window boundary at or below `header`, or `None` before the first one.
    fn boundary_at_or_below(
        &self,
        header: &HeaderInfo,
        window: u32,
    ) -> Result<Option<HeaderInfo>, VersionBitsError> {
        let steps = (header.height + 1) % window;
        if steps > header.height {
            return Ok(None);
        }
        let mut boundary = *header;
        for _ in 0..steps {
            boundary = self.require_parent(&boundary)?;
        }
        Ok(Some(boundary))
    }

    fn scan_window(
        &self,
        boundary: &HeaderInfo,
        deployment: &Deployment,
    ) -> Result<WindowScan, VersionBitsError> {
        let mut signalled = 0u32;
        let mut cursor = Some(*boundary);
        for _ in 0..deployment.window {
            let Some(header) = cursor else {
                break;
            };
            if signals_bit(header.version, deployment.bit) {
                signalled += 1;
            }
            cursor = self.parent(&header)?;
        }
        Ok(WindowScan {
            signalled,
            previous_boundary: cursor,
        })
    }

    fn median_time_past(&self, header: &HeaderInfo) -> Result<i64, VersionBitsError> {
        let mut times: Vec<i64> = Vec::with_capacity(MEDIAN_TIME_SPAN);
        let mut cursor = Some(*header);
        while let Some(current) = cursor {
            times.push(i64::from(current.time));
            if times.len() == MEDIAN_TIME_SPAN {
                break;
            }
            cursor = self.parent(&current)?;
        }
        times.sort_unstable();
        Ok(times[times.len() / 2])
    }

    fn require_header(&self, hash: &Hash256) -> Result<HeaderInfo, VersionBitsError> {
        self.headers
            .header(hash)?
            .ok_or(VersionBitsError::MissingHeader(*hash))
    }

    fn parent(&self, header: &HeaderInfo) -> Result<Option<HeaderInfo>, VersionBitsError> {
        if header.height == 0 {
            return Ok(None);
        }
        self.require_header(&header.prev_hash).map(Some)
    }

    fn require_parent(&self, header: &HeaderInfo) -> Result<HeaderInfo, VersionBitsError> {
        self.parent(header)?
            .ok_or(VersionBitsError::MissingHeader(header.prev_hash))
    }
}

fn transition(
    prior: ThresholdState,
    deployment: &Deployment,
    median_time: i64,
    signalled: u32,
) -> ThresholdState {
    match prior {
        ThresholdState::Defined if deployment.start_time.reached(median_time) => {
            evaluate_started(deployment, median_time, signalled)
        }
        ThresholdState::Defined => ThresholdState::Defined,
        ThresholdState::Started => evaluate_started(deployment, median_time, signalled),
        ThresholdState::LockedIn => ThresholdState::Active,
        ThresholdState::Active | ThresholdState::Failed => prior,
    }
}

fn evaluate_started(deployment: &Deployment, median_time: i64, signalled: u32) -> ThresholdState {
    if signalled >= deployment.threshold {
        ThresholdState::LockedIn
    } else if deployment.timeout.reached(median_time) {
        ThresholdState::Failed
    } else {
        ThresholdState::Started
    }
}
