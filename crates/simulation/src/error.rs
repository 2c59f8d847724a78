use clmm_vault_domain::error::MathError;
use clmm_vault_execution::error::VaultError;
use clmm_vault_execution::host::HostError;
use thiserror::Error;

/// Errors raised while setting up or running a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Math(#[from] MathError),
}
