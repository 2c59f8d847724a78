//! Lifecycle events emitted by the vault.

use chrono::{DateTime, Utc};
use clmm_vault_domain::U256;
use clmm_vault_domain::fees::TokenPairAmounts;
use clmm_vault_domain::tick_range::TickRange;
use clmm_vault_domain::token::Address;
use serde::{Deserialize, Serialize};

/// Type of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VaultEventType {
    /// Shares were issued against new liquidity.
    Deposited,
    /// Shares were burned and proceeds paid out.
    Withdrawn,
    /// The position moved to a new band.
    Rebalanced,
    /// A rebalance found the band unchanged.
    RebalanceSkipped,
    /// Protocol fees were swept.
    ProtocolFeesCollected,
}

/// A lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultEvent {
    /// Event ID.
    pub id: String,
    /// Event type.
    pub event_type: VaultEventType,
    /// Host clock time of the operation.
    pub timestamp: DateTime<Utc>,
    /// Event-specific data.
    pub data: EventData,
}

impl VaultEvent {
    /// Creates a new event stamped with the host clock (seconds).
    pub fn new(now: u64, data: EventData) -> Self {
        let timestamp = i64::try_from(now)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .unwrap_or_default();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type: data.event_type(),
            timestamp,
            data,
        }
    }
}

/// Event-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventData {
    Deposit(DepositData),
    Withdraw(WithdrawData),
    Rebalance(RebalanceData),
    RebalanceSkipped {
        range: TickRange,
        tick: i32,
        reason: RebalanceReason,
    },
    ProtocolFees(ProtocolFeeData),
}

impl EventData {
    pub fn event_type(&self) -> VaultEventType {
        match self {
            Self::Deposit(_) => VaultEventType::Deposited,
            Self::Withdraw(_) => VaultEventType::Withdrawn,
            Self::Rebalance(_) => VaultEventType::Rebalanced,
            Self::RebalanceSkipped { .. } => VaultEventType::RebalanceSkipped,
            Self::ProtocolFees(_) => VaultEventType::ProtocolFeesCollected,
        }
    }
}

/// Data for a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositData {
    pub caller: Address,
    pub receiver: Address,
    /// Liquidity added to the position.
    pub liquidity: u128,
    pub shares: U256,
    /// Token amounts paid into the pool.
    pub amounts: TokenPairAmounts,
}

/// Data for a withdrawal or redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawData {
    pub caller: Address,
    pub receiver: Address,
    pub owner: Address,
    /// Liquidity removed from the position.
    pub liquidity: u128,
    pub shares: U256,
    /// Amounts paid to the receiver.
    pub paid: TokenPairAmounts,
    /// Amounts retained for the protocol.
    pub protocol_cut: TokenPairAmounts,
}

/// Data for an effective reposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceData {
    pub old_range: TickRange,
    pub new_range: TickRange,
    /// Tick the new band was centered on.
    pub tick: i32,
    pub old_liquidity: u128,
    pub new_liquidity: u128,
    /// Amounts paid into the new position.
    pub amounts: TokenPairAmounts,
    /// Input of the ratio swap, zero when none was needed.
    pub swapped_in: U256,
    /// Whether token0 was sold.
    pub zero_for_one: bool,
    pub reason: RebalanceReason,
}

/// Why a reposition ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RebalanceReason {
    /// Triggered through upkeep because the price left the range.
    RangeExit,
    /// Refresh before a deposit.
    Deposit,
    /// Refresh after a withdrawal.
    Withdrawal,
}

/// Data for a protocol fee collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFeeData {
    pub recipient: Address,
    pub amounts: TokenPairAmounts,
    /// Whether the unclaimed position was torn down first.
    pub position_closed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let range = TickRange::new(-60, 60).unwrap();
        let event = VaultEvent::new(
            3600,
            EventData::RebalanceSkipped {
                range,
                tick: 0,
                reason: RebalanceReason::Deposit,
            },
        );

        assert!(!event.id.is_empty());
        assert_eq!(event.event_type, VaultEventType::RebalanceSkipped);
        assert_eq!(event.timestamp.timestamp(), 3600);
    }

    #[test]
    fn test_event_serializes() {
        let event = VaultEvent::new(
            0,
            EventData::ProtocolFees(ProtocolFeeData {
                recipient: Address::new("protocol"),
                amounts: TokenPairAmounts::zero(),
                position_closed: false,
            }),
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ProtocolFeesCollected"));
    }
}
