pub mod charges;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod processing;
pub mod schedule;
pub mod serialization;
pub mod summary;
pub mod transactions;
pub mod types;

// re-export key types
pub use charges::{ChargeDistributor, DisbursementTranche, InstallmentCharge, LoanCharge, TrancheContext};
pub use config::{Currency, RoundingMode};
pub use decimal::Money;
pub use errors::{Result, ScheduleError};
pub use events::{Event, EventStore, ReprocessMode};
pub use loan::{Loan, LoanBuilder};
pub use processing::{ChargeReprocessor, PeriodPortion};
pub use schedule::{ChargePortion, DueWindow, Installment};
pub use serialization::LoanView;
pub use summary::{LoanSummary, SummaryCalculator};
pub use transactions::{LoanTransaction, LoanTransactionType};
pub use types::{
    ChargeCalculation, ChargeCategory, ChargeId, ChargeTimeType, LoanId, LoanStatus, TransactionId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
