pub mod installment;
pub mod window;

use chrono::NaiveDate;

use crate::errors::{Result, ScheduleError};

pub use installment::{ChargePortion, Installment};
pub use window::DueWindow;

/// number of the first installment that is not a down payment
///
/// A schedule without any normal installment breaks the schedule invariant
/// and is reported as [`ScheduleError::NoNormalInstallment`].
pub fn fetch_first_normal_installment_number(installments: &[Installment]) -> Result<u32> {
    installments
        .iter()
        .filter(|installment| !installment.is_down_payment)
        .map(|installment| installment.installment_number)
        .min()
        .ok_or(ScheduleError::NoNormalInstallment)
}

/// whether `transaction_date` belongs to `target`, using the same window
/// rule the charge engines use
pub fn is_in_period(
    transaction_date: NaiveDate,
    target: &Installment,
    installments: &[Installment],
) -> Result<bool> {
    let first_normal = fetch_first_normal_installment_number(installments)?;
    let window = DueWindow::for_period(
        target.from_date,
        target.due_date,
        target.installment_number == first_normal,
    );
    Ok(window.contains(transaction_date))
}
