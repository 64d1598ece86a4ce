use crate::config::Currency;
use crate::decimal::Money;
use crate::schedule::{ChargePortion, DueWindow, Installment};
use crate::types::{ChargeCalculation, ChargeCategory};

use super::{DisbursementTranche, LoanCharge};

/// disbursement details consulted for percent-of-principal charges
#[derive(Debug, Clone, Copy, Default)]
pub struct TrancheContext<'a> {
    pub multi_disbursement: bool,
    pub tranches: &'a [DisbursementTranche],
}

impl<'a> TrancheContext<'a> {
    pub fn single_disbursement() -> Self {
        Self {
            multi_disbursement: false,
            tranches: &[],
        }
    }

    pub fn multi_disbursement(tranches: &'a [DisbursementTranche]) -> Self {
        Self {
            multi_disbursement: true,
            tranches,
        }
    }

    /// principal expected to be disbursed on or before `date`
    fn principal_disbursed_by(&self, date: chrono::NaiveDate) -> Money {
        self.tranches
            .iter()
            .filter(|tranche| !tranche.reversed && tranche.expected_disbursement_date <= date)
            .map(|tranche| tranche.principal)
            .sum()
    }
}

/// distributes charges over schedule periods
///
/// Holds the schedule-wide inputs of one reprocess pass: the currency the
/// amounts are produced in and principal/interest totals across every
/// installment.
#[derive(Debug, Clone, Copy)]
pub struct ChargeDistributor<'a> {
    currency: &'a Currency,
    total_principal: Money,
    total_interest: Money,
    tranches: TrancheContext<'a>,
}

impl<'a> ChargeDistributor<'a> {
    pub fn new(
        currency: &'a Currency,
        total_principal: Money,
        total_interest: Money,
        tranches: TrancheContext<'a>,
    ) -> Self {
        Self {
            currency,
            total_principal,
            total_interest,
            tranches,
        }
    }

    /// build from a schedule, summing principal and interest once
    pub fn for_schedule(
        currency: &'a Currency,
        installments: &[Installment],
        tranches: TrancheContext<'a>,
    ) -> Self {
        let total_principal = installments.iter().map(|i| i.principal).sum();
        let total_interest = installments.iter().map(|i| i.interest_charged).sum();
        Self::new(currency, total_principal, total_interest, tranches)
    }

    pub fn total_principal(&self) -> Money {
        self.total_principal
    }

    pub fn total_interest(&self) -> Money {
        self.total_interest
    }

    /// amount of `charge` due in `installment`, whose window is `window`
    pub fn due(
        &self,
        window: DueWindow,
        installment: &Installment,
        charge: &LoanCharge,
        installment_fee_applicable: bool,
    ) -> Money {
        let is_due = window.contains_due_date(charge.due_date);

        if charge.is_instalment_fee() && installment_fee_applicable {
            installment_fee_amount(charge, installment, self.currency)
        } else if charge.is_overdue_installment_charge() && is_due && charge.calculation.is_percentage_based() {
            charge.charge_amount()
        } else if is_due {
            match charge.calculation.percentage() {
                Some(percentage) => self.currency.percentage_of(self.percentage_base(charge), percentage),
                None => self.currency.money(charge.amount.as_decimal()),
            }
        } else {
            Money::ZERO
        }
    }

    /// waived amount of `charge` attributed to `installment`
    pub fn waived(&self, window: DueWindow, installment: &Installment, charge: &LoanCharge) -> Money {
        if charge.is_instalment_fee() {
            charge
                .installment_charge(installment.due_date)
                .map(|sub| sub.amount_waived)
                .unwrap_or(Money::ZERO)
        } else if window.contains_due_date(charge.due_date) {
            charge.amount_waived
        } else {
            Money::ZERO
        }
    }

    /// written-off amount of `charge` attributed to `installment`
    pub fn written_off(&self, window: DueWindow, installment: &Installment, charge: &LoanCharge) -> Money {
        if charge.is_instalment_fee() {
            charge
                .installment_charge(installment.due_date)
                .map(|sub| sub.amount_written_off)
                .unwrap_or(Money::ZERO)
        } else if window.contains_due_date(charge.due_date) {
            charge.amount_written_off
        } else {
            Money::ZERO
        }
    }

    /// due, waived and written-off amounts of `charges` for one installment
    pub fn portion<'c, I>(&self, window: DueWindow, installment: &Installment, charges: I) -> ChargePortion
    where
        I: IntoIterator<Item = &'c LoanCharge>,
    {
        let installment_fee_applicable = !installment.is_recalculated_interest_component;
        let mut portion = ChargePortion::ZERO;

        for charge in charges {
            if charge.counts_toward(ChargeCategory::Fee) {
                portion.fee_due += self.due(window, installment, charge, installment_fee_applicable);
                portion.fee_waived += self.waived(window, installment, charge);
                portion.fee_written_off += self.written_off(window, installment, charge);
            } else if charge.counts_toward(ChargeCategory::Penalty) {
                portion.penalty_due += self.due(window, installment, charge, installment_fee_applicable);
                portion.penalty_waived += self.waived(window, installment, charge);
                portion.penalty_written_off += self.written_off(window, installment, charge);
            }
        }

        portion
    }

    /// amount a percentage-based due-date charge is taken of; zero for flat
    /// charges
    pub fn percentage_base(&self, charge: &LoanCharge) -> Money {
        match charge.calculation {
            ChargeCalculation::Flat => Money::ZERO,
            ChargeCalculation::PercentOfAmount { .. } => self.principal_base(charge),
            ChargeCalculation::PercentOfInterest { .. } => self.total_interest,
            ChargeCalculation::PercentOfAmountAndInterest { .. } => self.total_principal + self.total_interest,
        }
    }

    /// principal a percent-of-amount charge applies to
    fn principal_base(&self, charge: &LoanCharge) -> Money {
        match charge.due_date {
            Some(due_date) if charge.is_specified_due_date() && self.tranches.multi_disbursement => {
                self.tranches.principal_disbursed_by(due_date)
            }
            _ => self.total_principal,
        }
    }
}

/// an instalment fee's amount for one installment
///
/// Percentage fees apply to the installment's own principal and/or
/// interest; flat fees charge their stored amount on every installment.
pub fn installment_fee_amount(charge: &LoanCharge, installment: &Installment, currency: &Currency) -> Money {
    match charge.calculation {
        ChargeCalculation::Flat => currency.money(charge.amount_or_percentage),
        ChargeCalculation::PercentOfAmount { percentage } => {
            currency.percentage_of(installment.principal, percentage)
        }
        ChargeCalculation::PercentOfInterest { percentage } => {
            currency.percentage_of(installment.interest_charged, percentage)
        }
        ChargeCalculation::PercentOfAmountAndInterest { percentage } => {
            currency.percentage_of(installment.principal + installment.interest_charged, percentage)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChargeTimeType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn installment() -> Installment {
        Installment::new(1, date(2024, 1, 1), date(2024, 2, 1), Money::from_major(500), Money::from_major(50))
    }

    fn first_window() -> DueWindow {
        DueWindow::for_period(date(2024, 1, 1), date(2024, 2, 1), true)
    }

    fn percentage_charge(
        category: ChargeCategory,
        time_type: ChargeTimeType,
        calculation: ChargeCalculation,
        due_date: Option<NaiveDate>,
    ) -> LoanCharge {
        let percentage = calculation.percentage().unwrap_or(Decimal::ZERO);
        LoanCharge::new("charge", category, time_type, calculation, percentage, due_date).unwrap()
    }

    #[test]
    fn test_flat_charge_due_in_window() {
        let currency = Currency::usd();
        let distributor = ChargeDistributor::new(
            &currency,
            Money::from_major(1_000),
            Money::from_major(200),
            TrancheContext::single_disbursement(),
        );
        let charge = LoanCharge::flat_fee("fee", dec!(15), date(2024, 1, 20)).unwrap();
        let outside = LoanCharge::flat_fee("fee", dec!(15), date(2024, 2, 20)).unwrap();

        assert_eq!(distributor.due(first_window(), &installment(), &charge, true), Money::from_major(15));
        assert_eq!(distributor.due(first_window(), &installment(), &outside, true), Money::ZERO);
    }

    #[test]
    fn test_percentage_bases() {
        let currency = Currency::usd();
        let distributor = ChargeDistributor::new(
            &currency,
            Money::from_major(1_000),
            Money::from_major(200),
            TrancheContext::single_disbursement(),
        );
        let due = Some(date(2024, 1, 15));
        let cases = [
            (ChargeCalculation::PercentOfAmountAndInterest { percentage: dec!(2) }, Money::from_major(24)),
            (ChargeCalculation::PercentOfInterest { percentage: dec!(2) }, Money::from_major(4)),
            (ChargeCalculation::PercentOfAmount { percentage: dec!(2) }, Money::from_major(20)),
        ];

        for (calculation, expected) in cases {
            let charge = percentage_charge(ChargeCategory::Penalty, ChargeTimeType::SpecifiedDueDate, calculation, due);
            assert_eq!(distributor.due(first_window(), &installment(), &charge, true), expected);
        }
    }

    #[test]
    fn test_percentage_rounded_to_currency() {
        let currency = Currency::usd();
        let distributor = ChargeDistributor::new(
            &currency,
            Money::from_major(1_000),
            Money::from_decimal(dec!(33.33)),
            TrancheContext::single_disbursement(),
        );
        let charge = percentage_charge(
            ChargeCategory::Fee,
            ChargeTimeType::SpecifiedDueDate,
            ChargeCalculation::PercentOfInterest { percentage: dec!(1.5) },
            Some(date(2024, 1, 15)),
        );
        // 33.33 * 1.5 / 100 = 0.49995
        assert_eq!(
            distributor.due(first_window(), &installment(), &charge, true),
            Money::from_decimal(dec!(0.50))
        );
    }

    #[test]
    fn test_multi_tranche_principal_base() {
        let currency = Currency::usd();
        let mut reversed = DisbursementTranche::new(date(2024, 1, 5), Money::from_major(300));
        reversed.reversed = true;
        let tranches = vec![
            DisbursementTranche::new(date(2024, 1, 1), Money::from_major(600)),
            DisbursementTranche::new(date(2024, 1, 15), Money::from_major(400)),
            DisbursementTranche::new(date(2024, 1, 20), Money::from_major(500)),
            reversed,
        ];
        let distributor = ChargeDistributor::new(
            &currency,
            Money::from_major(1_500),
            Money::from_major(200),
            TrancheContext::multi_disbursement(&tranches),
        );
        let charge = percentage_charge(
            ChargeCategory::Fee,
            ChargeTimeType::SpecifiedDueDate,
            ChargeCalculation::PercentOfAmount { percentage: dec!(1) },
            Some(date(2024, 1, 15)),
        );

        // 600 + 400 disbursed on or before the due date
        assert_eq!(distributor.due(first_window(), &installment(), &charge, true), Money::from_major(10));
    }

    #[test]
    fn test_overdue_percentage_uses_resolved_amount() {
        let currency = Currency::usd();
        let distributor = ChargeDistributor::new(
            &currency,
            Money::from_major(1_000),
            Money::from_major(200),
            TrancheContext::single_disbursement(),
        );
        let mut charge = percentage_charge(
            ChargeCategory::Penalty,
            ChargeTimeType::OverdueInstallment,
            ChargeCalculation::PercentOfAmount { percentage: dec!(2) },
            Some(date(2024, 1, 25)),
        );
        charge.resolve_amount(Money::from_major(550), &currency);

        assert_eq!(distributor.due(first_window(), &installment(), &charge, true), Money::from_major(11));
    }

    #[test]
    fn test_instalment_fee_applicability() {
        let currency = Currency::usd();
        let distributor = ChargeDistributor::new(
            &currency,
            Money::from_major(1_000),
            Money::from_major(200),
            TrancheContext::single_disbursement(),
        );
        let charge = percentage_charge(
            ChargeCategory::Fee,
            ChargeTimeType::InstalmentFee,
            ChargeCalculation::PercentOfAmountAndInterest { percentage: dec!(1) },
            None,
        );

        assert_eq!(
            distributor.due(first_window(), &installment(), &charge, true),
            Money::from_decimal(dec!(5.50))
        );
        assert_eq!(distributor.due(first_window(), &installment(), &charge, false), Money::ZERO);
    }

    #[test]
    fn test_waived_and_written_off() {
        let currency = Currency::usd();
        let distributor = ChargeDistributor::new(
            &currency,
            Money::from_major(1_000),
            Money::from_major(200),
            TrancheContext::single_disbursement(),
        );
        let mut charge = LoanCharge::flat_penalty("late", dec!(20), date(2024, 1, 20)).unwrap();
        charge.amount_waived = Money::from_major(5);
        charge.amount_written_off = Money::from_major(3);

        let portion = distributor.portion(first_window(), &installment(), [&charge]);
        assert_eq!(portion.penalty_due, Money::from_major(20));
        assert_eq!(portion.penalty_waived, Money::from_major(5));
        assert_eq!(portion.penalty_written_off, Money::from_major(3));
        assert_eq!(portion.fee_due, Money::ZERO);

        let later = DueWindow::for_period(date(2024, 2, 1), date(2024, 3, 1), false);
        assert!(distributor.portion(later, &installment(), [&charge]).is_zero());
    }

    #[test]
    fn test_instalment_fee_waiver_keyed_by_due_date() {
        let currency = Currency::usd();
        let schedule = vec![
            installment(),
            Installment::new(2, date(2024, 2, 1), date(2024, 3, 1), Money::from_major(500), Money::from_major(25)),
        ];
        let distributor = ChargeDistributor::for_schedule(&currency, &schedule, TrancheContext::single_disbursement());
        let mut charge = LoanCharge::new(
            "service",
            ChargeCategory::Fee,
            ChargeTimeType::InstalmentFee,
            ChargeCalculation::Flat,
            dec!(4),
            None,
        )
        .unwrap();
        charge.generate_installment_charges(&schedule, &currency);
        if let Some(sub) = charge.installment_charges.get_mut(&date(2024, 3, 1)) {
            sub.waive();
        }

        let first = distributor.portion(first_window(), &schedule[0], [&charge]);
        let second = distributor.portion(
            DueWindow::for_period(date(2024, 2, 1), date(2024, 3, 1), false),
            &schedule[1],
            [&charge],
        );
        assert_eq!(first.fee_due, Money::from_major(4));
        assert_eq!(first.fee_waived, Money::ZERO);
        assert_eq!(second.fee_due, Money::from_major(4));
        assert_eq!(second.fee_waived, Money::from_major(4));
        assert_eq!(distributor.total_interest(), Money::from_major(75));
    }

    #[test]
    fn test_disbursement_fee_contributes_nothing() {
        let currency = Currency::usd();
        let distributor = ChargeDistributor::new(
            &currency,
            Money::from_major(1_000),
            Money::from_major(200),
            TrancheContext::single_disbursement(),
        );
        let charge = LoanCharge::new(
            "origination",
            ChargeCategory::Fee,
            ChargeTimeType::Disbursement,
            ChargeCalculation::Flat,
            dec!(30),
            Some(date(2024, 1, 1)),
        )
        .unwrap();

        assert!(distributor.portion(first_window(), &installment(), [&charge]).is_zero());
    }
}
