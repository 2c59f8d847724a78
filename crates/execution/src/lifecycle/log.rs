//! Append-only event log owned by the vault next to its state.

use super::{EventData, VaultEvent, VaultEventType};
use serde::{Deserialize, Serialize};

/// Events of committed operations, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<VaultEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: VaultEvent) {
        self.events.push(event);
    }

    /// Drops every event after the first `len`. Used to discard the events of
    /// a rolled-back operation.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&VaultEvent> {
        self.events.last()
    }

    pub fn of_type(&self, event_type: VaultEventType) -> impl Iterator<Item = &VaultEvent> {
        self.events
            .iter()
            .filter(move |e| e.event_type == event_type)
    }

    /// Aggregate counts over the log.
    pub fn summary(&self) -> EventSummary {
        let mut summary = EventSummary::default();
        for event in &self.events {
            match &event.data {
                EventData::Deposit(_) => summary.deposits += 1,
                EventData::Withdraw(_) => summary.withdrawals += 1,
                EventData::Rebalance(data) => {
                    summary.rebalances += 1;
                    if data.swapped_in > clmm_vault_domain::U256::zero() {
                        summary.swaps += 1;
                    }
                }
                EventData::RebalanceSkipped { .. } => summary.skipped_rebalances += 1,
                EventData::ProtocolFees(_) => summary.protocol_collections += 1,
            }
        }
        summary
    }
}

/// Aggregate statistics across the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub deposits: u32,
    pub withdrawals: u32,
    /// Effective repositions.
    pub rebalances: u32,
    /// Repositions that swapped before minting.
    pub swaps: u32,
    pub skipped_rebalances: u32,
    pub protocol_collections: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::RebalanceReason;
    use clmm_vault_domain::tick_range::TickRange;

    #[test]
    fn test_summary_counts() {
        let range = TickRange::new(-60, 60).unwrap();
        let mut log = EventLog::new();
        assert!(log.is_empty());

        for _ in 0..3 {
            log.record(VaultEvent::new(
                1,
                EventData::RebalanceSkipped {
                    range,
                    tick: 0,
                    reason: RebalanceReason::Withdrawal,
                },
            ));
        }

        let summary = log.summary();
        assert_eq!(summary.skipped_rebalances, 3);
        assert_eq!(summary.rebalances, 0);
        assert_eq!(log.len(), 3);
        assert_eq!(log.of_type(VaultEventType::RebalanceSkipped).count(), 3);
        assert_eq!(log.of_type(VaultEventType::Deposited).count(), 0);
    }

    #[test]
    fn test_truncate_drops_newer_events() {
        let range = TickRange::new(-60, 60).unwrap();
        let mut log = EventLog::new();
        for time in 1..=4 {
            log.record(VaultEvent::new(
                time,
                EventData::RebalanceSkipped {
                    range,
                    tick: 0,
                    reason: RebalanceReason::Deposit,
                },
            ));
        }

        log.truncate(2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().timestamp.timestamp(), 2);

        // truncating past the end is a no-op
        log.truncate(10);
        assert_eq!(log.len(), 2);
    }
}
