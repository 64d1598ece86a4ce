/// quick start - minimal example to get started
use chrono::{NaiveDate, TimeZone, Utc};
use loan_charge_schedule::{
    Installment, Loan, LoanCharge, LoanView, Money, SafeTimeProvider, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap()
    ));
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("invalid date");

    // a $1,000 loan repaid in two installments
    let mut loan = Loan::builder()
        .principal(Money::from_major(1_000))
        .disbursement_date(date(2024, 1, 1)?)
        .installment(Installment::new(1, date(2024, 1, 1)?, date(2024, 2, 1)?, Money::from_major(500), Money::from_major(50)))
        .installment(Installment::new(2, date(2024, 2, 1)?, date(2024, 3, 1)?, Money::from_major(500), Money::from_major(50)))
        .build()?;

    // a late payment penalty lands in the second installment
    loan.add_charge(LoanCharge::flat_penalty("late payment", dec!(20), date(2024, 2, 15)?)?, &time)?;

    // recompute every installment from the charge set
    loan.reprocess_charges(&time)?;

    println!("total outstanding: {}", loan.summary.total_outstanding);
    println!("{}", LoanView::from_loan(&loan).to_json_pretty()?);

    Ok(())
}
