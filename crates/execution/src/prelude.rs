//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_vault_execution::prelude::*;
//! ```

// Configuration and errors
pub use crate::config::VaultConfig;
pub use crate::error::{ErrorKind, VaultError};

// Collaborators
pub use crate::host::{
    Checkpoint, Clock, ExactInputSingleParams, Host, HostError, Pool, Quoter, SwapVenue,
    TokenLedger,
};

// Lifecycle
pub use crate::lifecycle::{
    DepositData, EventData, EventLog, EventSummary, ProtocolFeeData, RebalanceData,
    RebalanceReason, VaultEvent, VaultEventType, WithdrawData,
};

// State
pub use crate::shares::ShareBalances;
pub use crate::state::{RebalancePhase, VaultState};

// Strategy
pub use crate::protocol_fee::skim;
pub use crate::strategy::{RebalanceOutcome, RebalancePreview, RepositionReport, SwapExecution};

// Vault
pub use crate::vault::{
    PoolCallbackSink, ShareLedger, TriggerSource, UpkeepCheck, Vault, decode_perform_data,
    encode_perform_data,
};
