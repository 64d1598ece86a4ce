pub mod kind;
pub mod ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::TransactionId;

pub use kind::LoanTransactionType;

/// a money movement on a loan
///
/// Type predicates only hold for transactions that are not reversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTransaction {
    /// `None` until persisted
    pub id: Option<TransactionId>,
    pub transaction_type: LoanTransactionType,
    pub transaction_date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub amount: Money,
    pub reversed: bool,
}

impl LoanTransaction {
    pub fn new(transaction_type: LoanTransactionType, transaction_date: NaiveDate, amount: Money) -> Self {
        Self {
            id: None,
            transaction_type,
            transaction_date,
            created_at: None,
            amount,
            reversed: false,
        }
    }

    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    fn is_active(&self, kind: LoanTransactionType) -> bool {
        !self.reversed && self.transaction_type == kind
    }

    pub fn is_disbursement(&self) -> bool {
        self.is_active(LoanTransactionType::Disbursement)
    }

    pub fn is_repayment(&self) -> bool {
        self.is_active(LoanTransactionType::Repayment)
    }

    pub fn is_repayment_at_disbursement(&self) -> bool {
        self.is_active(LoanTransactionType::RepaymentAtDisbursement)
    }

    pub fn is_income_posting(&self) -> bool {
        self.is_active(LoanTransactionType::IncomePosting)
    }

    pub fn is_accrual(&self) -> bool {
        self.is_active(LoanTransactionType::Accrual)
    }

    pub fn is_charge_payment(&self) -> bool {
        self.is_active(LoanTransactionType::ChargePayment)
    }

    pub fn is_write_off(&self) -> bool {
        self.is_active(LoanTransactionType::WriteOff)
    }

    /// interest or charges waiver
    pub fn is_waiver(&self) -> bool {
        !self.reversed && self.transaction_type.is_waiver()
    }

    pub fn is_repayment_like(&self) -> bool {
        !self.reversed && self.transaction_type.is_repayment_like()
    }

    pub fn is_non_monetary(&self) -> bool {
        !self.reversed && self.transaction_type.is_non_monetary()
    }

    /// anything that actually pays into the loan
    pub fn is_payment_transaction(&self) -> bool {
        !self.reversed
            && !(self.is_disbursement()
                || self.is_accrual()
                || self.is_repayment_at_disbursement()
                || self.is_non_monetary()
                || self.is_income_posting())
    }
}
