use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ChargeCategory, ChargeId, LoanId, LoanStatus};

/// how a reprocess pass merged its results into the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReprocessMode {
    /// accumulators replaced from the full charge set
    Bulk,
    /// one charge added onto the existing accumulators
    Single,
}

/// all events that can be emitted by a loan during charge processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ChargesReprocessed {
        loan_id: LoanId,
        mode: ReprocessMode,
        installments: usize,
        charges: usize,
        timestamp: DateTime<Utc>,
    },
    ChargeApplied {
        loan_id: LoanId,
        charge_id: ChargeId,
        category: ChargeCategory,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    ChargeWaived {
        loan_id: LoanId,
        charge_id: ChargeId,
        amount_waived: Money,
        timestamp: DateTime<Utc>,
    },
    ChargeWrittenOff {
        loan_id: LoanId,
        charge_id: ChargeId,
        amount_written_off: Money,
        timestamp: DateTime<Utc>,
    },
    ChargeRemoved {
        loan_id: LoanId,
        charge_id: ChargeId,
        timestamp: DateTime<Utc>,
    },
    SummaryUpdated {
        loan_id: LoanId,
        total_outstanding: Money,
        repaid_in_full: bool,
        timestamp: DateTime<Utc>,
    },
    SummaryZeroed {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
