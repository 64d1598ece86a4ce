/// serialization support for loans
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::loan::Loan;
use crate::summary::LoanSummary;
use crate::types::{ChargeCategory, ChargeId, ChargeTimeType, LoanId, LoanStatus};

/// serializable view of a loan's schedule and summary
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub status: LoanStatus,
    pub currency: String,
    pub principal: Money,
    pub disbursement_date: NaiveDate,
    pub schedule: Vec<InstallmentView>,
    pub charges: Vec<ChargeView>,
    pub summary: LoanSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentView {
    pub installment_number: u32,
    pub from_date: NaiveDate,
    pub due_date: NaiveDate,
    pub down_payment: bool,
    pub principal: Money,
    pub interest: Money,
    pub fee_charges: Money,
    pub fee_charges_waived: Money,
    pub penalty_charges: Money,
    pub penalty_charges_waived: Money,
    pub total_outstanding: Money,
    pub obligations_met: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChargeView {
    pub id: ChargeId,
    pub name: String,
    pub category: ChargeCategory,
    pub time_type: ChargeTimeType,
    pub due_date: Option<NaiveDate>,
    pub amount: Money,
    pub amount_outstanding: Money,
    pub active: bool,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        let mut installments: Vec<_> = loan.installments.iter().collect();
        installments.sort_by_key(|i| i.installment_number);

        LoanView {
            id: loan.id,
            status: loan.status,
            currency: loan.currency.code.clone(),
            principal: loan.principal,
            disbursement_date: loan.disbursement_date,
            schedule: installments
                .into_iter()
                .map(|installment| InstallmentView {
                    installment_number: installment.installment_number,
                    from_date: installment.from_date,
                    due_date: installment.due_date,
                    down_payment: installment.is_down_payment,
                    principal: installment.principal,
                    interest: installment.interest_charged,
                    fee_charges: installment.charge_portion.fee_due,
                    fee_charges_waived: installment.charge_portion.fee_waived,
                    penalty_charges: installment.charge_portion.penalty_due,
                    penalty_charges_waived: installment.charge_portion.penalty_waived,
                    total_outstanding: installment.total_outstanding(),
                    obligations_met: installment.is_obligations_met(),
                })
                .collect(),
            charges: loan
                .charges
                .iter()
                .map(|charge| ChargeView {
                    id: charge.id,
                    name: charge.name.clone(),
                    category: charge.category,
                    time_type: charge.time_type,
                    due_date: charge.due_date,
                    amount: charge.amount,
                    amount_outstanding: charge.amount_outstanding,
                    active: charge.active,
                })
                .collect(),
            summary: loan.summary.clone(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charges::LoanCharge;
    use crate::schedule::Installment;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_loan_view_json() {
        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()));
        let mut loan = Loan::builder()
            .principal(Money::from_major(1_000))
            .disbursement_date(date(2024, 1, 1))
            .installment(Installment::new(2, date(2024, 2, 1), date(2024, 3, 1), Money::from_major(500), Money::from_major(50)))
            .installment(Installment::new(1, date(2024, 1, 1), date(2024, 2, 1), Money::from_major(500), Money::from_major(50)))
            .build()
            .unwrap();
        loan.add_charge(LoanCharge::flat_penalty("late", dec!(20), date(2024, 2, 15)).unwrap(), &time)
            .unwrap();

        let view = LoanView::from_loan(&loan);
        assert_eq!(view.schedule[0].installment_number, 1);
        assert_eq!(view.schedule[1].penalty_charges, Money::from_major(20));
        assert_eq!(view.schedule[1].total_outstanding, Money::from_major(570));

        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"currency\": \"USD\""));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let penalty: Money = serde_json::from_value(parsed["schedule"][1]["penalty_charges"].clone()).unwrap();
        assert_eq!(penalty, Money::from_major(20));
        assert_eq!(parsed["charges"].as_array().map(|c| c.len()), Some(1));
    }
}
