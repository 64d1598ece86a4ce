use thiserror::Error;
use uuid::Uuid;

use crate::types::LoanStatus;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("schedule has no normal (non down-payment) installment")]
    NoNormalInstallment,

    #[error("installment not found: {number}")]
    InstallmentNotFound {
        number: u32,
    },

    #[error("charge not found: {id}")]
    ChargeNotFound {
        id: Uuid,
    },

    #[error("invalid charge: {message}")]
    InvalidCharge {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid loan status: current {current:?}, expected {expected:?}")]
    InvalidState {
        current: LoanStatus,
        expected: LoanStatus,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
