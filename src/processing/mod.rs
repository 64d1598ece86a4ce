use chrono::NaiveDate;
use std::iter;
use tracing::debug;

use crate::charges::{ChargeDistributor, LoanCharge, TrancheContext};
use crate::config::Currency;
use crate::errors::Result;
use crate::schedule::{fetch_first_normal_installment_number, ChargePortion, DueWindow, Installment};

/// charge portion computed for one installment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodPortion {
    pub installment_number: u32,
    pub window: DueWindow,
    pub portion: ChargePortion,
}

/// reprocesses how loan charges are spread over an existing schedule
///
/// Two merge modes are offered. [`ChargeReprocessor::reprocess`] replaces
/// every installment's charge portion from the full charge set and is
/// idempotent. [`ChargeReprocessor::reprocess_charge`] adds one charge's
/// contribution onto whatever is already there, so a charge that was
/// already counted has to be subtracted first.
#[derive(Debug, Clone, Copy)]
pub struct ChargeReprocessor<'a> {
    currency: &'a Currency,
    tranches: TrancheContext<'a>,
}

impl<'a> ChargeReprocessor<'a> {
    pub fn new(currency: &'a Currency, tranches: TrancheContext<'a>) -> Self {
        Self { currency, tranches }
    }

    /// compute portions without touching the schedule
    ///
    /// Installments are walked in installment-number order with the window
    /// start sliding from the disbursement date to each due date. Down
    /// payments get no entry and do not move the window.
    pub fn compute<'c, I>(
        &self,
        disbursement_date: NaiveDate,
        installments: &[Installment],
        charges: I,
    ) -> Result<Vec<PeriodPortion>>
    where
        I: IntoIterator<Item = &'c LoanCharge> + Clone,
    {
        let first_normal = fetch_first_normal_installment_number(installments)?;
        let distributor = ChargeDistributor::for_schedule(self.currency, installments, self.tranches);

        let mut ordered: Vec<&Installment> = installments.iter().collect();
        ordered.sort_by_key(|installment| installment.installment_number);

        let mut period_start = disbursement_date;
        let mut portions = Vec::with_capacity(ordered.len());
        for installment in ordered.into_iter().filter(|i| !i.is_down_payment) {
            let window = DueWindow::for_period(
                period_start,
                installment.due_date,
                installment.installment_number == first_normal,
            );
            portions.push(PeriodPortion {
                installment_number: installment.installment_number,
                window,
                portion: distributor.portion(window, installment, charges.clone()),
            });
            period_start = installment.due_date;
        }

        Ok(portions)
    }

    /// bulk reprocess: replace every installment's charge portion
    pub fn reprocess<'c, I>(
        &self,
        disbursement_date: NaiveDate,
        installments: &mut [Installment],
        charges: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = &'c LoanCharge> + Clone,
    {
        let portions = self.compute(disbursement_date, installments, charges.clone())?;
        debug!(
            installments = installments.len(),
            charges = charges.into_iter().count(),
            "replacing charge portions"
        );
        merge(installments, &portions, Installment::replace_charge_portion);
        Ok(())
    }

    /// single-charge reprocess: add one charge's portion onto each installment
    pub fn reprocess_charge(
        &self,
        disbursement_date: NaiveDate,
        installments: &mut [Installment],
        charge: &LoanCharge,
    ) -> Result<()> {
        let portions = self.compute(disbursement_date, installments, iter::once(charge))?;
        debug!(
            installments = installments.len(),
            charge_id = %charge.id,
            "adding charge portion"
        );
        merge(installments, &portions, Installment::add_charge_portion);
        Ok(())
    }

    /// take one charge's portion back out of each installment
    pub fn retract_charge(
        &self,
        disbursement_date: NaiveDate,
        installments: &mut [Installment],
        charge: &LoanCharge,
    ) -> Result<()> {
        let portions = self.compute(disbursement_date, installments, iter::once(charge))?;
        debug!(
            installments = installments.len(),
            charge_id = %charge.id,
            "retracting charge portion"
        );
        merge(installments, &portions, |installment, portion| {
            installment.replace_charge_portion(installment.charge_portion - portion)
        });
        Ok(())
    }
}

fn merge<F>(installments: &mut [Installment], portions: &[PeriodPortion], mut apply: F)
where
    F: FnMut(&mut Installment, ChargePortion),
{
    for period in portions {
        if let Some(installment) = installments
            .iter_mut()
            .find(|i| i.installment_number == period.installment_number)
        {
            apply(installment, period.portion);
        }
    }
}
