pub mod distribution;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::Currency;
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::schedule::Installment;
use crate::types::{ChargeCalculation, ChargeCategory, ChargeId, ChargeTimeType};

pub use distribution::{installment_fee_amount, ChargeDistributor, TrancheContext};

/// an instalment fee's share for one installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentCharge {
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub amount_paid: Money,
    pub amount_waived: Money,
    pub amount_written_off: Money,
    pub amount_outstanding: Money,
}

impl InstallmentCharge {
    pub fn new(installment_number: u32, due_date: NaiveDate, amount: Money) -> Self {
        Self {
            installment_number,
            due_date,
            amount,
            amount_paid: Money::ZERO,
            amount_waived: Money::ZERO,
            amount_written_off: Money::ZERO,
            amount_outstanding: amount,
        }
    }

    /// waive whatever is still outstanding, returning the waived amount
    pub fn waive(&mut self) -> Money {
        let waived = self.amount_outstanding;
        self.amount_waived += waived;
        self.amount_outstanding = Money::ZERO;
        waived
    }

    /// write off whatever is still outstanding, returning the written-off amount
    pub fn write_off(&mut self) -> Money {
        let written_off = self.amount_outstanding;
        self.amount_written_off += written_off;
        self.amount_outstanding = Money::ZERO;
        written_off
    }
}

/// one disbursement of a multi-disbursement loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisbursementTranche {
    pub expected_disbursement_date: NaiveDate,
    pub principal: Money,
    pub reversed: bool,
}

impl DisbursementTranche {
    pub fn new(expected_disbursement_date: NaiveDate, principal: Money) -> Self {
        Self {
            expected_disbursement_date,
            principal,
            reversed: false,
        }
    }
}

/// a fee or penalty attached to a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCharge {
    pub id: ChargeId,
    pub name: String,
    pub category: ChargeCategory,
    pub time_type: ChargeTimeType,
    pub calculation: ChargeCalculation,
    /// `None` for instalment fees, which are due with every installment
    pub due_date: Option<NaiveDate>,
    /// flat amount per application, or the percentage
    pub amount_or_percentage: Decimal,
    /// resolved charge amount
    pub amount: Money,
    pub amount_paid: Money,
    pub amount_waived: Money,
    pub amount_written_off: Money,
    pub amount_outstanding: Money,
    pub active: bool,
    pub installment_charges: BTreeMap<NaiveDate, InstallmentCharge>,
}

impl LoanCharge {
    /// create a charge
    ///
    /// `amount_or_percentage` is the flat amount for flat charges and the
    /// percent value for percentage-based ones, where it must match the
    /// percentage carried by `calculation`.
    pub fn new(
        name: impl Into<String>,
        category: ChargeCategory,
        time_type: ChargeTimeType,
        calculation: ChargeCalculation,
        amount_or_percentage: Decimal,
        due_date: Option<NaiveDate>,
    ) -> Result<Self> {
        if amount_or_percentage < Decimal::ZERO {
            return Err(ScheduleError::InvalidCharge {
                message: format!("negative charge amount or percentage: {}", amount_or_percentage),
            });
        }
        if let Some(percentage) = calculation.percentage() {
            if percentage != amount_or_percentage {
                return Err(ScheduleError::InvalidCharge {
                    message: format!(
                        "percentage {} does not match amount or percentage {}",
                        percentage, amount_or_percentage
                    ),
                });
            }
        }
        let due_date = match time_type {
            ChargeTimeType::InstalmentFee => None,
            ChargeTimeType::SpecifiedDueDate | ChargeTimeType::OverdueInstallment if due_date.is_none() => {
                return Err(ScheduleError::InvalidCharge {
                    message: format!("{:?} charge requires a due date", time_type),
                });
            }
            _ => due_date,
        };
        let amount = if calculation.is_percentage_based() {
            Money::ZERO
        } else {
            Money::from_decimal(amount_or_percentage)
        };

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            time_type,
            calculation,
            due_date,
            amount_or_percentage,
            amount,
            amount_paid: Money::ZERO,
            amount_waived: Money::ZERO,
            amount_written_off: Money::ZERO,
            amount_outstanding: amount,
            active: true,
            installment_charges: BTreeMap::new(),
        })
    }

    /// flat fee due on a specific date
    pub fn flat_fee(name: impl Into<String>, amount: Decimal, due_date: NaiveDate) -> Result<Self> {
        Self::new(
            name,
            ChargeCategory::Fee,
            ChargeTimeType::SpecifiedDueDate,
            ChargeCalculation::Flat,
            amount,
            Some(due_date),
        )
    }

    /// flat penalty due on a specific date
    pub fn flat_penalty(name: impl Into<String>, amount: Decimal, due_date: NaiveDate) -> Result<Self> {
        Self::new(
            name,
            ChargeCategory::Penalty,
            ChargeTimeType::SpecifiedDueDate,
            ChargeCalculation::Flat,
            amount,
            Some(due_date),
        )
    }

    pub fn is_fee(&self) -> bool {
        self.category == ChargeCategory::Fee
    }

    pub fn is_penalty(&self) -> bool {
        self.category == ChargeCategory::Penalty
    }

    pub fn is_due_at_disbursement(&self) -> bool {
        self.time_type.is_due_at_disbursement()
    }

    pub fn is_instalment_fee(&self) -> bool {
        self.time_type == ChargeTimeType::InstalmentFee
    }

    pub fn is_overdue_installment_charge(&self) -> bool {
        self.time_type == ChargeTimeType::OverdueInstallment
    }

    pub fn is_specified_due_date(&self) -> bool {
        self.time_type == ChargeTimeType::SpecifiedDueDate
    }

    /// whether the charge is distributed into the given category's
    /// accumulators; disbursement fees are settled up front and never are
    pub fn counts_toward(&self, category: ChargeCategory) -> bool {
        match category {
            ChargeCategory::Fee => self.is_fee() && !self.is_due_at_disbursement(),
            ChargeCategory::Penalty => self.is_penalty(),
        }
    }

    /// full amount of the charge: outstanding plus everything settled
    pub fn charge_amount(&self) -> Money {
        self.amount_outstanding + self.amount_paid + self.amount_waived + self.amount_written_off
    }

    /// fix the charge amount in the currency's scale
    ///
    /// Percentage charges are taken of `base`; flat charges ignore it and
    /// round their stored amount.
    pub fn resolve_amount(&mut self, base: Money, currency: &Currency) {
        self.amount = match self.calculation.percentage() {
            Some(percentage) => currency.percentage_of(base, percentage),
            None => currency.money(self.amount_or_percentage),
        };
        self.amount_outstanding = self.amount - self.amount_paid - self.amount_waived - self.amount_written_off;
    }

    /// sub-charge of an instalment fee for the installment due on `due_date`
    pub fn installment_charge(&self, due_date: NaiveDate) -> Option<&InstallmentCharge> {
        self.installment_charges.get(&due_date)
    }

    /// spread an instalment fee over every eligible installment
    ///
    /// Down payments and interest-recalculation components get no share.
    /// The charge amount becomes the sum of the shares.
    pub fn generate_installment_charges(&mut self, installments: &[Installment], currency: &Currency) {
        if !self.is_instalment_fee() {
            return;
        }
        self.installment_charges = installments
            .iter()
            .filter(|installment| !installment.is_down_payment && !installment.is_recalculated_interest_component)
            .map(|installment| {
                let share = installment_fee_amount(self, installment, currency);
                (
                    installment.due_date,
                    InstallmentCharge::new(installment.installment_number, installment.due_date, share),
                )
            })
            .collect();
        self.amount = self.installment_charges.values().map(|c| c.amount).sum();
        self.amount_outstanding = self.installment_charges.values().map(|c| c.amount_outstanding).sum();
    }

    /// waive everything still outstanding, returning the waived amount
    pub fn waive(&mut self) -> Money {
        let waived = if self.is_instalment_fee() {
            self.installment_charges.values_mut().map(InstallmentCharge::waive).sum::<Money>()
        } else {
            self.amount_outstanding
        };
        self.amount_waived += waived;
        self.amount_outstanding = Money::ZERO;
        waived
    }

    /// write off everything still outstanding, returning the written-off amount
    pub fn write_off(&mut self) -> Money {
        let written_off = if self.is_instalment_fee() {
            self.installment_charges
                .values_mut()
                .map(InstallmentCharge::write_off)
                .sum::<Money>()
        } else {
            self.amount_outstanding
        };
        self.amount_written_off += written_off;
        self.amount_outstanding = Money::ZERO;
        written_off
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_flat_charge_amounts() {
        let charge = LoanCharge::flat_fee("processing", dec!(25), date(2024, 2, 10)).unwrap();
        assert_eq!(charge.amount, Money::from_major(25));
        assert_eq!(charge.amount_outstanding, Money::from_major(25));
        assert_eq!(charge.charge_amount(), Money::from_major(25));
        assert!(charge.counts_toward(ChargeCategory::Fee));
        assert!(!charge.counts_toward(ChargeCategory::Penalty));
    }

    #[test]
    fn test_disbursement_fee_is_not_distributed() {
        let charge = LoanCharge::new(
            "origination",
            ChargeCategory::Fee,
            ChargeTimeType::Disbursement,
            ChargeCalculation::Flat,
            dec!(50),
            Some(date(2024, 1, 1)),
        )
        .unwrap();
        assert!(charge.is_due_at_disbursement());
        assert!(!charge.counts_toward(ChargeCategory::Fee));
    }

    #[test]
    fn test_invalid_charges_rejected() {
        assert!(LoanCharge::flat_fee("negative", dec!(-1), date(2024, 1, 1)).is_err());

        let mismatched = LoanCharge::new(
            "late",
            ChargeCategory::Penalty,
            ChargeTimeType::SpecifiedDueDate,
            ChargeCalculation::PercentOfAmount { percentage: dec!(2) },
            dec!(3),
            Some(date(2024, 1, 1)),
        );
        assert!(mismatched.is_err());

        let undated = LoanCharge::new(
            "late",
            ChargeCategory::Penalty,
            ChargeTimeType::SpecifiedDueDate,
            ChargeCalculation::Flat,
            dec!(3),
            None,
        );
        assert!(undated.is_err());
    }

    #[test]
    fn test_resolve_percentage_amount() {
        let mut charge = LoanCharge::new(
            "overdue",
            ChargeCategory::Penalty,
            ChargeTimeType::OverdueInstallment,
            ChargeCalculation::PercentOfAmount { percentage: dec!(2) },
            dec!(2),
            Some(date(2024, 2, 5)),
        )
        .unwrap();
        assert_eq!(charge.charge_amount(), Money::ZERO);

        charge.resolve_amount(Money::from_major(550), &Currency::usd());
        assert_eq!(charge.charge_amount(), Money::from_major(11));
    }

    #[test]
    fn test_flat_amount_resolved_to_currency_scale() {
        let mut charge = LoanCharge::flat_fee("processing", dec!(10.005), date(2024, 1, 20)).unwrap();
        charge.resolve_amount(Money::ZERO, &Currency::usd());
        assert_eq!(charge.amount, Money::from_decimal(dec!(10.01)));
        assert_eq!(charge.amount_outstanding, Money::from_decimal(dec!(10.01)));

        assert_eq!(charge.write_off(), Money::from_decimal(dec!(10.01)));
        assert_eq!(charge.amount_written_off, Money::from_decimal(dec!(10.01)));
        assert_eq!(charge.amount_outstanding, Money::ZERO);
        assert_eq!(charge.charge_amount(), charge.amount);
    }

    #[test]
    fn test_instalment_fee_generation_and_waiver() {
        let installments = vec![
            Installment::down_payment(1, date(2024, 1, 1), Money::from_major(100)),
            Installment::new(2, date(2024, 1, 1), date(2024, 2, 1), Money::from_major(450), Money::from_major(40)),
            Installment::new(3, date(2024, 2, 1), date(2024, 3, 1), Money::from_major(450), Money::from_major(20)),
        ];
        let mut charge = LoanCharge::new(
            "service",
            ChargeCategory::Fee,
            ChargeTimeType::InstalmentFee,
            ChargeCalculation::Flat,
            dec!(7.5),
            Some(date(2024, 5, 1)),
        )
        .unwrap();
        assert_eq!(charge.due_date, None);

        charge.generate_installment_charges(&installments, &Currency::usd());
        assert_eq!(charge.installment_charges.len(), 2);
        assert!(charge.installment_charge(date(2024, 1, 1)).is_none());
        assert_eq!(charge.amount, Money::from_major(15));

        let waived = charge.waive();
        assert_eq!(waived, Money::from_major(15));
        assert_eq!(charge.amount_waived, Money::from_major(15));
        assert_eq!(
            charge.installment_charge(date(2024, 3, 1)).map(|c| c.amount_waived),
            Some(Money::from_decimal(dec!(7.5)))
        );
        assert_eq!(charge.charge_amount(), Money::from_major(15));
    }
}
