use crate::charges::LoanCharge;
use crate::config::Currency;
use crate::decimal::Money;
use crate::schedule::Installment;

/// totals over a schedule and its charges, scoped to a currency
#[derive(Debug, Clone, Copy)]
pub struct SummaryCalculator<'a> {
    currency: &'a Currency,
}

impl<'a> SummaryCalculator<'a> {
    pub fn new(currency: &'a Currency) -> Self {
        Self { currency }
    }

    fn total<F>(&self, installments: &[Installment], field: F) -> Money
    where
        F: Fn(&Installment) -> Money,
    {
        installments.iter().map(field).fold(self.currency.zero(), |acc, x| acc + x)
    }

    pub fn total_principal_adjusted(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.credited_principal)
    }

    pub fn total_principal_repaid(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.principal_completed)
    }

    pub fn total_principal_written_off(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.principal_written_off)
    }

    pub fn total_interest_charged(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.interest_charged)
    }

    pub fn total_interest_repaid(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.interest_paid)
    }

    pub fn total_interest_waived(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.interest_waived)
    }

    pub fn total_interest_written_off(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.interest_written_off)
    }

    pub fn total_fee_charges_charged(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.charge_portion.fee_due)
    }

    pub fn total_fee_charges_repaid(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.fee_charges_paid)
    }

    pub fn total_fee_charges_written_off(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.charge_portion.fee_written_off)
    }

    pub fn total_penalty_charges_charged(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.charge_portion.penalty_due)
    }

    pub fn total_penalty_charges_repaid(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.penalty_charges_paid)
    }

    pub fn total_penalty_charges_waived(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.charge_portion.penalty_waived)
    }

    pub fn total_penalty_charges_written_off(&self, installments: &[Installment]) -> Money {
        self.total(installments, |i| i.charge_portion.penalty_written_off)
    }

    /// fee charges settled with the disbursement
    pub fn total_charges_repaid_at_disbursement(&self, charges: &[LoanCharge]) -> Money {
        charges
            .iter()
            .filter(|c| c.active && c.is_fee() && c.is_due_at_disbursement())
            .map(|c| c.amount_paid)
            .fold(self.currency.zero(), |acc, x| acc + x)
    }

    /// charge-level waived amounts of the active fee charges
    pub fn total_fee_charges_waived(&self, charges: &[LoanCharge]) -> Money {
        charges
            .iter()
            .filter(|c| c.active && c.is_fee())
            .map(|c| c.amount_waived)
            .fold(self.currency.zero(), |acc, x| acc + x)
    }
}
