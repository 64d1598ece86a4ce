use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a loan charge
pub type ChargeId = Uuid;

/// persisted transaction identifier
pub type TransactionId = u64;

/// loan status, as far as charge processing cares about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Approved,
    /// disbursed and performing
    Active,
}

/// charge category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeCategory {
    Fee,
    Penalty,
}

/// when a charge falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeTimeType {
    /// collected with the disbursement
    Disbursement,
    /// collected with each tranche of a multi-disbursement loan
    TrancheDisbursement,
    SpecifiedDueDate,
    /// raised against an installment that went overdue
    OverdueInstallment,
    /// prorated over every installment
    InstalmentFee,
}

impl ChargeTimeType {
    pub fn is_due_at_disbursement(self) -> bool {
        matches!(self, ChargeTimeType::Disbursement | ChargeTimeType::TrancheDisbursement)
    }
}

/// how a charge amount is calculated
///
/// Percentages are expressed as a percent value (`5` for 5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeCalculation {
    Flat,
    PercentOfAmount { percentage: Decimal },
    PercentOfInterest { percentage: Decimal },
    PercentOfAmountAndInterest { percentage: Decimal },
}

impl ChargeCalculation {
    pub fn is_percentage_based(&self) -> bool {
        !matches!(self, ChargeCalculation::Flat)
    }

    pub fn percentage(&self) -> Option<Decimal> {
        match *self {
            ChargeCalculation::Flat => None,
            ChargeCalculation::PercentOfAmount { percentage }
            | ChargeCalculation::PercentOfInterest { percentage }
            | ChargeCalculation::PercentOfAmountAndInterest { percentage } => Some(percentage),
        }
    }
}
