use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};
use uuid::Uuid;

use crate::charges::{ChargeDistributor, DisbursementTranche, LoanCharge, TrancheContext};
use crate::config::Currency;
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::events::{Event, EventStore, ReprocessMode};
use crate::processing::ChargeReprocessor;
use crate::schedule::{fetch_first_normal_installment_number, is_in_period, Installment};
use crate::summary::{LoanSummary, SummaryCalculator};
use crate::transactions::{ordering, LoanTransaction};
use crate::types::{ChargeCategory, ChargeId, LoanId, LoanStatus};

/// loan aggregate: schedule, charges and summary of one loan
///
/// Holds exclusive ownership of the schedule while a reprocess runs; the
/// engines themselves are not meant to be shared across threads.
#[derive(Debug)]
pub struct Loan {
    pub id: LoanId,
    pub currency: Currency,
    pub principal: Money,
    pub disbursement_date: NaiveDate,
    pub status: LoanStatus,
    pub installments: Vec<Installment>,
    pub charges: Vec<LoanCharge>,
    pub tranches: Vec<DisbursementTranche>,
    pub multi_disbursement: bool,
    pub transactions: Vec<LoanTransaction>,
    pub summary: LoanSummary,
    pub events: EventStore,
}

impl Loan {
    /// builder for creating loans
    pub fn builder() -> LoanBuilder {
        LoanBuilder::new()
    }

    fn tranche_context(&self) -> TrancheContext<'_> {
        TrancheContext {
            multi_disbursement: self.multi_disbursement,
            tranches: &self.tranches,
        }
    }

    pub fn charge(&self, id: ChargeId) -> Option<&LoanCharge> {
        self.charges.iter().find(|c| c.id == id)
    }

    fn charge_index(&self, id: ChargeId) -> Result<usize> {
        self.charges
            .iter()
            .position(|c| c.id == id)
            .ok_or(ScheduleError::ChargeNotFound { id })
    }

    /// recompute every installment's charge portion from the active charges,
    /// then refresh the summary
    pub fn reprocess_charges(&mut self, time_provider: &SafeTimeProvider) -> Result<()> {
        let reprocessor = ChargeReprocessor::new(
            &self.currency,
            TrancheContext {
                multi_disbursement: self.multi_disbursement,
                tranches: &self.tranches,
            },
        );
        let active = self.charges.iter().filter(|c| c.active);
        reprocessor.reprocess(self.disbursement_date, &mut self.installments, active.clone())?;

        self.events.emit(Event::ChargesReprocessed {
            loan_id: self.id,
            mode: ReprocessMode::Bulk,
            installments: self.installments.len(),
            charges: active.count(),
            timestamp: time_provider.now(),
        });

        self.update_summary(time_provider);
        Ok(())
    }

    /// refresh the loan summary from the schedule and charges
    pub fn update_summary(&mut self, time_provider: &SafeTimeProvider) {
        let calculator = SummaryCalculator::new(&self.currency);
        self.summary.update_summary(
            &self.currency,
            self.principal,
            &self.installments,
            &calculator,
            Some(&self.charges),
        );

        self.events.emit(Event::SummaryUpdated {
            loan_id: self.id,
            total_outstanding: self.summary.total_outstanding,
            repaid_in_full: self.summary.is_repaid_in_full(),
            timestamp: time_provider.now(),
        });
    }

    /// attach a new charge and add its contribution to the schedule
    pub fn add_charge(&mut self, mut charge: LoanCharge, time_provider: &SafeTimeProvider) -> Result<ChargeId> {
        if charge.is_due_at_disbursement() {
            warn!(charge_id = %charge.id, "disbursement charge added after loan creation");
            return Err(ScheduleError::InvalidCharge {
                message: "disbursement charges must be attached when the loan is created".to_string(),
            });
        }
        if self.charges.iter().any(|c| c.id == charge.id) {
            return Err(ScheduleError::InvalidCharge {
                message: format!("charge {} already attached", charge.id),
            });
        }
        prepare_charge(&mut charge, &self.installments, &self.currency, self.tranche_context());

        let reprocessor = ChargeReprocessor::new(&self.currency, self.tranche_context());
        let mut installments = self.installments.clone();
        reprocessor.reprocess_charge(self.disbursement_date, &mut installments, &charge)?;
        self.installments = installments;

        let charge_id = charge.id;
        let category = charge.category;
        let amount = charge.amount;
        self.charges.push(charge);

        let now = time_provider.now();
        self.events.emit(Event::ChargeApplied {
            loan_id: self.id,
            charge_id,
            category,
            amount,
            timestamp: now,
        });
        self.events.emit(Event::ChargesReprocessed {
            loan_id: self.id,
            mode: ReprocessMode::Single,
            installments: self.installments.len(),
            charges: 1,
            timestamp: now,
        });
        self.update_summary(time_provider);

        info!(loan_id = %self.id, charge_id = %charge_id, category = ?category, "charge applied");
        Ok(charge_id)
    }

    /// waive everything still outstanding on a charge
    pub fn waive_charge(&mut self, id: ChargeId, time_provider: &SafeTimeProvider) -> Result<Money> {
        let waived = self.settle_charge(id, LoanCharge::waive)?;

        self.events.emit(Event::ChargeWaived {
            loan_id: self.id,
            charge_id: id,
            amount_waived: waived,
            timestamp: time_provider.now(),
        });
        self.update_summary(time_provider);

        info!(loan_id = %self.id, charge_id = %id, amount = %waived, "charge waived");
        Ok(waived)
    }

    /// write off everything still outstanding on a charge
    pub fn write_off_charge(&mut self, id: ChargeId, time_provider: &SafeTimeProvider) -> Result<Money> {
        let written_off = self.settle_charge(id, LoanCharge::write_off)?;

        self.events.emit(Event::ChargeWrittenOff {
            loan_id: self.id,
            charge_id: id,
            amount_written_off: written_off,
            timestamp: time_provider.now(),
        });
        self.update_summary(time_provider);

        info!(loan_id = %self.id, charge_id = %id, amount = %written_off, "charge written off");
        Ok(written_off)
    }

    /// apply `settle` to an active charge and move its contribution in the
    /// schedule along with it
    ///
    /// The charge's current contribution is taken out of the schedule before
    /// settling and the new contribution added back, so the additive
    /// single-charge pass never counts the charge twice.
    fn settle_charge<F>(&mut self, id: ChargeId, settle: F) -> Result<Money>
    where
        F: FnOnce(&mut LoanCharge) -> Money,
    {
        let index = self.charge_index(id)?;
        if !self.charges[index].active {
            return Err(ScheduleError::InvalidCharge {
                message: format!("charge {} is not active", id),
            });
        }

        let reprocessor = ChargeReprocessor::new(
            &self.currency,
            TrancheContext {
                multi_disbursement: self.multi_disbursement,
                tranches: &self.tranches,
            },
        );
        let charge = &mut self.charges[index];
        let mut installments = self.installments.clone();
        reprocessor.retract_charge(self.disbursement_date, &mut installments, charge)?;
        let settled = settle(&mut *charge);
        reprocessor.reprocess_charge(self.disbursement_date, &mut installments, charge)?;
        self.installments = installments;
        Ok(settled)
    }

    /// deactivate a charge and rebuild the schedule's charge portions
    pub fn remove_charge(&mut self, id: ChargeId, time_provider: &SafeTimeProvider) -> Result<()> {
        let index = self.charge_index(id)?;
        self.charges[index].active = false;

        self.events.emit(Event::ChargeRemoved {
            loan_id: self.id,
            charge_id: id,
            timestamp: time_provider.now(),
        });
        self.reprocess_charges(time_provider)
    }

    /// undo the disbursement: summary totals are cleared and the loan goes
    /// back to approved
    pub fn undo_disbursement(&mut self, time_provider: &SafeTimeProvider) -> Result<()> {
        if self.status != LoanStatus::Active {
            return Err(ScheduleError::InvalidState {
                current: self.status,
                expected: LoanStatus::Active,
            });
        }

        self.summary.zero_fields();
        let old_status = self.status;
        self.status = LoanStatus::Approved;

        let now = time_provider.now();
        self.events.emit(Event::SummaryZeroed {
            loan_id: self.id,
            timestamp: now,
        });
        self.events.emit(Event::StatusChanged {
            loan_id: self.id,
            old_status,
            new_status: self.status,
            reason: "disbursement undone".to_string(),
            timestamp: now,
        });

        info!(loan_id = %self.id, "disbursement undone, summary zeroed");
        Ok(())
    }

    pub fn add_transaction(&mut self, transaction: LoanTransaction) {
        self.transactions.push(transaction);
    }

    /// transactions in canonical processing order
    pub fn sorted_transactions(&self) -> Vec<&LoanTransaction> {
        ordering::sorted(&self.transactions)
    }

    /// whether `date` falls in the window of installment `installment_number`
    pub fn is_in_period(&self, date: NaiveDate, installment_number: u32) -> Result<bool> {
        let target = self
            .installments
            .iter()
            .find(|i| i.installment_number == installment_number)
            .ok_or(ScheduleError::InstallmentNotFound { number: installment_number })?;
        is_in_period(date, target, &self.installments)
    }
}

/// resolve amounts a charge needs before it is distributed
///
/// Overdue percentage charges keep whatever amount they were resolved to by
/// the caller, since their base is the overdue installment.
fn prepare_charge(
    charge: &mut LoanCharge,
    installments: &[Installment],
    currency: &Currency,
    tranches: TrancheContext<'_>,
) {
    if charge.is_instalment_fee() {
        charge.generate_installment_charges(installments, currency);
    } else if !charge.calculation.is_percentage_based() {
        charge.resolve_amount(Money::ZERO, currency);
    } else if !charge.is_overdue_installment_charge() {
        let base = ChargeDistributor::for_schedule(currency, installments, tranches).percentage_base(charge);
        charge.resolve_amount(base, currency);
    }
}

/// builder for loans
pub struct LoanBuilder {
    id: Option<LoanId>,
    currency: Currency,
    principal: Option<Money>,
    disbursement_date: Option<NaiveDate>,
    status: LoanStatus,
    installments: Vec<Installment>,
    charges: Vec<LoanCharge>,
    tranches: Vec<DisbursementTranche>,
    multi_disbursement: bool,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            currency: Currency::default(),
            principal: None,
            disbursement_date: None,
            status: LoanStatus::Active,
            installments: Vec::new(),
            charges: Vec::new(),
            tranches: Vec::new(),
            multi_disbursement: false,
        }
    }

    pub fn id(mut self, id: LoanId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn disbursement_date(mut self, date: NaiveDate) -> Self {
        self.disbursement_date = Some(date);
        self
    }

    pub fn status(mut self, status: LoanStatus) -> Self {
        self.status = status;
        self
    }

    pub fn installment(mut self, installment: Installment) -> Self {
        self.installments.push(installment);
        self
    }

    pub fn installments(mut self, installments: impl IntoIterator<Item = Installment>) -> Self {
        self.installments.extend(installments);
        self
    }

    pub fn charge(mut self, charge: LoanCharge) -> Self {
        self.charges.push(charge);
        self
    }

    /// add a tranche; a loan with tranches is a multi-disbursement loan
    pub fn tranche(mut self, tranche: DisbursementTranche) -> Self {
        self.tranches.push(tranche);
        self.multi_disbursement = true;
        self
    }

    pub fn build(self) -> Result<Loan> {
        let principal = self.principal.ok_or(ScheduleError::InvalidConfiguration {
            message: "principal is required".to_string(),
        })?;
        let disbursement_date = self.disbursement_date.ok_or(ScheduleError::InvalidConfiguration {
            message: "disbursement date is required".to_string(),
        })?;

        let mut installments = self.installments;
        installments.sort_by_key(|i| i.installment_number);
        for (expected, installment) in (1u32..).zip(&installments) {
            if installment.installment_number != expected {
                return Err(ScheduleError::InvalidConfiguration {
                    message: format!(
                        "installment numbers must run 1..n, found {} at position {}",
                        installment.installment_number, expected
                    ),
                });
            }
        }
        fetch_first_normal_installment_number(&installments)?;

        let tranches = TrancheContext {
            multi_disbursement: self.multi_disbursement,
            tranches: &self.tranches,
        };
        let mut charges = self.charges;
        for charge in charges.iter_mut() {
            prepare_charge(charge, &installments, &self.currency, tranches);
        }
        let due_at_disbursement: Money = charges
            .iter()
            .filter(|c| c.active && c.category == ChargeCategory::Fee && c.is_due_at_disbursement())
            .map(|c| c.amount)
            .sum();

        Ok(Loan {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            currency: self.currency,
            principal,
            disbursement_date,
            status: self.status,
            installments,
            charges,
            tranches: self.tranches,
            multi_disbursement: self.multi_disbursement,
            transactions: Vec::new(),
            summary: LoanSummary::new(due_at_disbursement),
            events: EventStore::new(),
        })
    }
}

impl Default for LoanBuilder {
    fn default() -> Self {
        Self::new()
    }
}
