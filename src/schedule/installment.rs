use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

use crate::decimal::Money;

/// charge amounts attributed to one installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChargePortion {
    pub fee_due: Money,
    pub fee_waived: Money,
    pub fee_written_off: Money,
    pub penalty_due: Money,
    pub penalty_waived: Money,
    pub penalty_written_off: Money,
}

impl ChargePortion {
    pub const ZERO: ChargePortion = ChargePortion {
        fee_due: Money::ZERO,
        fee_waived: Money::ZERO,
        fee_written_off: Money::ZERO,
        penalty_due: Money::ZERO,
        penalty_waived: Money::ZERO,
        penalty_written_off: Money::ZERO,
    };

    pub fn is_zero(&self) -> bool {
        *self == ChargePortion::ZERO
    }

    /// fees and penalties due
    pub fn total_due(&self) -> Money {
        self.fee_due + self.penalty_due
    }
}

impl Add for ChargePortion {
    type Output = ChargePortion;

    fn add(self, other: ChargePortion) -> ChargePortion {
        ChargePortion {
            fee_due: self.fee_due + other.fee_due,
            fee_waived: self.fee_waived + other.fee_waived,
            fee_written_off: self.fee_written_off + other.fee_written_off,
            penalty_due: self.penalty_due + other.penalty_due,
            penalty_waived: self.penalty_waived + other.penalty_waived,
            penalty_written_off: self.penalty_written_off + other.penalty_written_off,
        }
    }
}

impl AddAssign for ChargePortion {
    fn add_assign(&mut self, other: ChargePortion) {
        *self = *self + other;
    }
}

impl Sub for ChargePortion {
    type Output = ChargePortion;

    fn sub(self, other: ChargePortion) -> ChargePortion {
        ChargePortion {
            fee_due: self.fee_due - other.fee_due,
            fee_waived: self.fee_waived - other.fee_waived,
            fee_written_off: self.fee_written_off - other.fee_written_off,
            penalty_due: self.penalty_due - other.penalty_due,
            penalty_waived: self.penalty_waived - other.penalty_waived,
            penalty_written_off: self.penalty_written_off - other.penalty_written_off,
        }
    }
}

/// one scheduled repayment period
///
/// Principal and interest come from the schedule generator. The charge
/// portion is owned by the reprocessing engines, the repayment fields by
/// whatever applies transactions to the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub installment_number: u32,
    pub from_date: NaiveDate,
    pub due_date: NaiveDate,
    pub principal: Money,
    pub interest_charged: Money,
    pub is_down_payment: bool,
    pub is_recalculated_interest_component: bool,

    pub charge_portion: ChargePortion,

    // repayment tracking
    pub principal_completed: Money,
    pub principal_written_off: Money,
    pub credited_principal: Money,
    pub interest_paid: Money,
    pub interest_waived: Money,
    pub interest_written_off: Money,
    pub fee_charges_paid: Money,
    pub penalty_charges_paid: Money,
}

impl Installment {
    pub fn new(
        installment_number: u32,
        from_date: NaiveDate,
        due_date: NaiveDate,
        principal: Money,
        interest_charged: Money,
    ) -> Self {
        Self {
            installment_number,
            from_date,
            due_date,
            principal,
            interest_charged,
            is_down_payment: false,
            is_recalculated_interest_component: false,
            charge_portion: ChargePortion::ZERO,
            principal_completed: Money::ZERO,
            principal_written_off: Money::ZERO,
            credited_principal: Money::ZERO,
            interest_paid: Money::ZERO,
            interest_waived: Money::ZERO,
            interest_written_off: Money::ZERO,
            fee_charges_paid: Money::ZERO,
            penalty_charges_paid: Money::ZERO,
        }
    }

    /// create a down-payment installment
    pub fn down_payment(
        installment_number: u32,
        date: NaiveDate,
        principal: Money,
    ) -> Self {
        let mut installment = Self::new(installment_number, date, date, principal, Money::ZERO);
        installment.is_down_payment = true;
        installment
    }

    /// mark as an interest-recalculation component (no instalment fees)
    pub fn recalculated_interest_component(mut self) -> Self {
        self.is_recalculated_interest_component = true;
        self
    }

    /// overwrite the charge accumulators
    pub fn replace_charge_portion(&mut self, portion: ChargePortion) {
        self.charge_portion = portion;
    }

    /// add onto the charge accumulators
    pub fn add_charge_portion(&mut self, portion: ChargePortion) {
        self.charge_portion += portion;
    }

    pub fn principal_outstanding(&self) -> Money {
        self.principal - self.principal_completed - self.principal_written_off
    }

    pub fn interest_outstanding(&self) -> Money {
        self.interest_charged - self.interest_paid - self.interest_waived - self.interest_written_off
    }

    pub fn fee_charges_outstanding(&self) -> Money {
        let portion = &self.charge_portion;
        portion.fee_due - self.fee_charges_paid - portion.fee_waived - portion.fee_written_off
    }

    pub fn penalty_charges_outstanding(&self) -> Money {
        let portion = &self.charge_portion;
        portion.penalty_due - self.penalty_charges_paid - portion.penalty_waived - portion.penalty_written_off
    }

    pub fn total_outstanding(&self) -> Money {
        self.principal_outstanding()
            + self.interest_outstanding()
            + self.fee_charges_outstanding()
            + self.penalty_charges_outstanding()
    }

    pub fn is_obligations_met(&self) -> bool {
        self.total_outstanding().is_zero()
    }
}
