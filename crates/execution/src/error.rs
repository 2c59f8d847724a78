//! Error taxonomy of the vault engine.

use crate::host::HostError;
use clmm_vault_domain::error::MathError;
use clmm_vault_domain::tick_range::TickRange;
use clmm_vault_domain::token::Address;
use clmm_vault_domain::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a failure, for callers deciding whether to retry,
/// adjust parameters or wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A restricted action was invoked by the wrong caller.
    Authorization,
    /// Zero amounts, unsupported tokens, malformed configuration.
    InvalidArgument,
    /// The observed tick is too far from the live tick.
    Staleness,
    /// Interval not elapsed, or nothing to do when action was asserted.
    PreconditionNotMet,
    /// The pool minted nothing for a non-zero request.
    ExecutionShortfall,
    /// Checked fixed-point arithmetic failed.
    Arithmetic,
    /// A collaborator failed.
    External,
}

/// Errors returned by vault operations. Every error aborts the whole operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("unauthorized: {action} may only be invoked by {expected}, got {caller}")]
    Unauthorized {
        caller: Address,
        expected: Address,
        action: &'static str,
    },

    #[error("no pending mint obligation matches the callback")]
    UnexpectedCallback,

    #[error("insufficient allowance: {owner} approved {allowed} shares to {spender}, {required} required")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        allowed: U256,
        required: U256,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported token {0}")]
    UnsupportedToken(Address),

    #[error("insufficient shares: {owner} holds {available}, {required} required")]
    InsufficientShares {
        owner: Address,
        available: U256,
        required: U256,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("stale trigger: observed tick {observed}, live tick {live}, tolerance {max_deviation}")]
    StaleTick {
        observed: i32,
        live: i32,
        max_deviation: u32,
    },

    #[error("rebalance interval not elapsed: now {now}, next allowed after {not_before}")]
    IntervalNotElapsed { now: u64, not_before: u64 },

    #[error("tick {tick} is inside the active range {range}")]
    TickInRange { tick: i32, range: TickRange },

    #[error("a reposition is already in progress")]
    RepositionInProgress,

    #[error("pool minted zero liquidity for a request of {requested}")]
    ZeroLiquidityMinted { requested: u128 },

    #[error("math error: {0}")]
    Math(#[from] MathError),

    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl VaultError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. }
            | Self::UnexpectedCallback
            | Self::InsufficientAllowance { .. } => ErrorKind::Authorization,
            Self::InvalidArgument(_)
            | Self::UnsupportedToken(_)
            | Self::InsufficientShares { .. }
            | Self::InvalidConfig(_) => ErrorKind::InvalidArgument,
            Self::StaleTick { .. } => ErrorKind::Staleness,
            Self::IntervalNotElapsed { .. }
            | Self::TickInRange { .. }
            | Self::RepositionInProgress => ErrorKind::PreconditionNotMet,
            Self::ZeroLiquidityMinted { .. } => ErrorKind::ExecutionShortfall,
            Self::Math(_) => ErrorKind::Arithmetic,
            Self::Host(_) => ErrorKind::External,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let stale = VaultError::StaleTick {
            observed: 0,
            live: 100,
            max_deviation: 60,
        };
        assert_eq!(stale.kind(), ErrorKind::Staleness);
        assert_eq!(
            VaultError::ZeroLiquidityMinted { requested: 1 }.kind(),
            ErrorKind::ExecutionShortfall
        );
        assert_eq!(
            VaultError::from(MathError::Overflow).kind(),
            ErrorKind::Arithmetic
        );
        assert_eq!(
            VaultError::from(HostError::Rejected("boom".into())).kind(),
            ErrorKind::External
        );
        assert_eq!(
            VaultError::UnsupportedToken("0xdead".into()).kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_display_carries_context() {
        let err = VaultError::IntervalNotElapsed {
            now: 10,
            not_before: 3600,
        };
        assert!(err.to_string().contains("3600"));
    }
}
