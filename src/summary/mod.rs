pub mod calculator;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::charges::LoanCharge;
use crate::config::Currency;
use crate::decimal::Money;
use crate::schedule::Installment;

pub use calculator::SummaryCalculator;

/// loan-level totals derived from the schedule and charges
///
/// Every field except `total_fee_charges_due_at_disbursement` is recomputed
/// by [`LoanSummary::update_summary`]. That one is seeded when the loan is
/// created and survives both recomputation and [`LoanSummary::zero_fields`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoanSummary {
    // principal
    pub total_principal_disbursed: Money,
    pub total_principal_adjustments: Money,
    pub total_principal_repaid: Money,
    pub total_principal_written_off: Money,
    pub total_principal_outstanding: Money,

    // interest
    pub total_interest_charged: Money,
    pub total_interest_repaid: Money,
    pub total_interest_waived: Money,
    pub total_interest_written_off: Money,
    pub total_interest_outstanding: Money,

    // fees
    pub total_fee_charges_charged: Money,
    pub total_fee_charges_due_at_disbursement: Money,
    pub total_fee_charges_repaid: Money,
    pub total_fee_charges_waived: Money,
    pub total_fee_charges_written_off: Money,
    pub total_fee_charges_outstanding: Money,

    // penalties
    pub total_penalty_charges_charged: Money,
    pub total_penalty_charges_repaid: Money,
    pub total_penalty_charges_waived: Money,
    pub total_penalty_charges_written_off: Money,
    pub total_penalty_charges_outstanding: Money,

    // rollups
    pub total_expected_repayment: Money,
    pub total_repayment: Money,
    pub total_expected_cost_of_loan: Money,
    pub total_cost_of_loan: Money,
    pub total_waived: Money,
    pub total_written_off: Money,
    pub total_outstanding: Money,
}

impl LoanSummary {
    /// create an empty summary seeded with the fees due at disbursement
    pub fn new(total_fee_charges_due_at_disbursement: Money) -> Self {
        Self {
            total_fee_charges_due_at_disbursement,
            ..Self::default()
        }
    }

    /// recompute every derived total
    ///
    /// With `charges == None` the fee waived total is zero instead of the
    /// sum over the charges, while the penalty waived total still comes
    /// from the installments. Callers rely on that asymmetry.
    pub fn update_summary(
        &mut self,
        currency: &Currency,
        principal: Money,
        installments: &[Installment],
        calculator: &SummaryCalculator<'_>,
        charges: Option<&[LoanCharge]>,
    ) {
        self.total_principal_disbursed = principal;
        self.total_principal_adjustments = calculator.total_principal_adjusted(installments);
        self.total_principal_repaid = calculator.total_principal_repaid(installments);
        self.total_principal_written_off = calculator.total_principal_written_off(installments);
        self.total_principal_outstanding = self.total_principal_disbursed
            + self.total_principal_adjustments
            - self.total_principal_repaid
            - self.total_principal_written_off;

        self.total_interest_charged = calculator.total_interest_charged(installments);
        self.total_interest_repaid = calculator.total_interest_repaid(installments);
        self.total_interest_waived = calculator.total_interest_waived(installments);
        self.total_interest_written_off = calculator.total_interest_written_off(installments);
        self.total_interest_outstanding = self.total_interest_charged
            - self.total_interest_repaid
            - self.total_interest_waived
            - self.total_interest_written_off;

        self.total_fee_charges_charged =
            calculator.total_fee_charges_charged(installments) + self.total_fee_charges_due_at_disbursement;
        let repaid_at_disbursement = charges
            .map(|charges| calculator.total_charges_repaid_at_disbursement(charges))
            .unwrap_or_else(|| currency.zero());
        self.total_fee_charges_repaid = calculator.total_fee_charges_repaid(installments) + repaid_at_disbursement;
        self.total_fee_charges_waived = match charges {
            Some(charges) => calculator.total_fee_charges_waived(charges),
            None => currency.zero(),
        };
        self.total_fee_charges_written_off = calculator.total_fee_charges_written_off(installments);
        self.total_fee_charges_outstanding = self.total_fee_charges_charged
            - self.total_fee_charges_repaid
            - self.total_fee_charges_waived
            - self.total_fee_charges_written_off;

        self.total_penalty_charges_charged = calculator.total_penalty_charges_charged(installments);
        self.total_penalty_charges_repaid = calculator.total_penalty_charges_repaid(installments);
        self.total_penalty_charges_waived = calculator.total_penalty_charges_waived(installments);
        self.total_penalty_charges_written_off = calculator.total_penalty_charges_written_off(installments);
        self.total_penalty_charges_outstanding = self.total_penalty_charges_charged
            - self.total_penalty_charges_repaid
            - self.total_penalty_charges_waived
            - self.total_penalty_charges_written_off;

        self.total_expected_repayment = self.total_principal_disbursed
            + self.total_principal_adjustments
            + self.total_interest_charged
            + self.total_fee_charges_charged
            + self.total_penalty_charges_charged;
        self.total_repayment = self.total_principal_repaid
            + self.total_interest_repaid
            + self.total_fee_charges_repaid
            + self.total_penalty_charges_repaid;
        self.total_expected_cost_of_loan =
            self.total_interest_charged + self.total_fee_charges_charged + self.total_penalty_charges_charged;
        self.total_cost_of_loan =
            self.total_interest_repaid + self.total_fee_charges_repaid + self.total_penalty_charges_repaid;
        self.total_waived =
            self.total_interest_waived + self.total_fee_charges_waived + self.total_penalty_charges_waived;
        self.total_written_off = self.total_principal_written_off
            + self.total_interest_written_off
            + self.total_fee_charges_written_off
            + self.total_penalty_charges_written_off;
        self.total_outstanding = self.total_principal_outstanding
            + self.total_interest_outstanding
            + self.total_fee_charges_outstanding
            + self.total_penalty_charges_outstanding;

        info!(
            currency = %currency.code,
            total_outstanding = %self.total_outstanding,
            "loan summary updated"
        );
    }

    /// reset every derived total, keeping the fees due at disbursement
    pub fn zero_fields(&mut self) {
        *self = Self::new(self.total_fee_charges_due_at_disbursement);
    }

    pub fn is_repaid_in_full(&self) -> bool {
        self.total_outstanding.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChargeCalculation, ChargeCategory, ChargeTimeType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule() -> Vec<Installment> {
        let mut first = Installment::new(1, date(2024, 1, 1), date(2024, 2, 1), Money::from_major(500), Money::from_major(50));
        first.charge_portion.fee_due = Money::from_major(10);
        first.charge_portion.fee_written_off = Money::from_major(2);
        first.principal_completed = Money::from_major(500);
        first.interest_paid = Money::from_major(50);
        first.fee_charges_paid = Money::from_major(8);

        let mut second = Installment::new(2, date(2024, 2, 1), date(2024, 3, 1), Money::from_major(500), Money::from_major(50));
        second.charge_portion.penalty_due = Money::from_major(20);
        second.charge_portion.penalty_waived = Money::from_major(5);
        second.interest_waived = Money::from_major(10);
        vec![first, second]
    }

    fn disbursement_fee() -> LoanCharge {
        let mut charge = LoanCharge::new(
            "origination",
            ChargeCategory::Fee,
            ChargeTimeType::Disbursement,
            ChargeCalculation::Flat,
            dec!(30),
            Some(date(2024, 1, 1)),
        )
        .unwrap();
        charge.amount_paid = Money::from_major(30);
        charge.amount_outstanding = Money::ZERO;
        charge
    }

    #[test]
    fn test_update_summary_totals() {
        let currency = Currency::usd();
        let calculator = SummaryCalculator::new(&currency);
        let mut summary = LoanSummary::new(Money::from_major(30));
        let charges = vec![disbursement_fee()];

        summary.update_summary(&currency, Money::from_major(1_000), &schedule(), &calculator, Some(&charges));

        assert_eq!(summary.total_principal_outstanding, Money::from_major(500));
        assert_eq!(summary.total_interest_outstanding, Money::from_major(40));
        assert_eq!(summary.total_fee_charges_charged, Money::from_major(40));
        assert_eq!(summary.total_fee_charges_repaid, Money::from_major(38));
        assert_eq!(summary.total_fee_charges_outstanding, Money::ZERO);
        assert_eq!(summary.total_penalty_charges_outstanding, Money::from_major(15));
        assert_eq!(summary.total_outstanding, Money::from_major(555));
        assert_eq!(summary.total_expected_repayment, Money::from_major(1_160));
        assert_eq!(summary.total_expected_cost_of_loan, Money::from_major(160));
        assert_eq!(summary.total_waived, Money::from_major(15));
        assert_eq!(summary.total_written_off, Money::from_major(2));
        assert!(!summary.is_repaid_in_full());
    }

    #[test]
    fn test_missing_charge_set_zeroes_fee_waived_only() {
        let currency = Currency::usd();
        let calculator = SummaryCalculator::new(&currency);
        let mut waived_fee = LoanCharge::flat_fee("fee", dec!(10), date(2024, 1, 15)).unwrap();
        waived_fee.amount_waived = Money::from_major(4);
        let charges = vec![waived_fee];

        let mut with_charges = LoanSummary::default();
        with_charges.update_summary(&currency, Money::from_major(1_000), &schedule(), &calculator, Some(&charges));
        assert_eq!(with_charges.total_fee_charges_waived, Money::from_major(4));

        let mut without_charges = LoanSummary::default();
        without_charges.update_summary(&currency, Money::from_major(1_000), &schedule(), &calculator, None);
        assert_eq!(without_charges.total_fee_charges_waived, Money::ZERO);
        assert_eq!(without_charges.total_penalty_charges_waived, Money::from_major(5));
    }

    #[test]
    fn test_zero_fields_keeps_disbursement_fees() {
        let currency = Currency::usd();
        let calculator = SummaryCalculator::new(&currency);
        let mut summary = LoanSummary::new(Money::from_major(30));
        summary.update_summary(&currency, Money::from_major(1_000), &schedule(), &calculator, None);

        summary.zero_fields();

        assert_eq!(summary, LoanSummary::new(Money::from_major(30)));
        assert!(summary.is_repaid_in_full());
    }
}
