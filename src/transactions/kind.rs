use serde::{Deserialize, Serialize};

/// loan transaction types with their stable numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanTransactionType {
    Disbursement,
    Repayment,
    Contra,
    WaiveInterest,
    RepaymentAtDisbursement,
    WriteOff,
    MarkedForRescheduling,
    RecoveryRepayment,
    WaiveCharges,
    Accrual,
    InitiateTransfer,
    ApproveTransfer,
    WithdrawTransfer,
    RejectTransfer,
    ChargePayment,
    Refund,
    RefundForActiveLoan,
    IncomePosting,
    CreditBalanceRefund,
    MerchantIssuedRefund,
    PayoutRefund,
    GoodwillCredit,
    ChargeRefund,
    Chargeback,
    ChargeAdjustment,
    ChargeOff,
    DownPayment,
    ReAge,
    ReAmortize,
}

impl LoanTransactionType {
    const ALL: [LoanTransactionType; 29] = [
        LoanTransactionType::Disbursement,
        LoanTransactionType::Repayment,
        LoanTransactionType::Contra,
        LoanTransactionType::WaiveInterest,
        LoanTransactionType::RepaymentAtDisbursement,
        LoanTransactionType::WriteOff,
        LoanTransactionType::MarkedForRescheduling,
        LoanTransactionType::RecoveryRepayment,
        LoanTransactionType::WaiveCharges,
        LoanTransactionType::Accrual,
        LoanTransactionType::InitiateTransfer,
        LoanTransactionType::ApproveTransfer,
        LoanTransactionType::WithdrawTransfer,
        LoanTransactionType::RejectTransfer,
        LoanTransactionType::ChargePayment,
        LoanTransactionType::Refund,
        LoanTransactionType::RefundForActiveLoan,
        LoanTransactionType::IncomePosting,
        LoanTransactionType::CreditBalanceRefund,
        LoanTransactionType::MerchantIssuedRefund,
        LoanTransactionType::PayoutRefund,
        LoanTransactionType::GoodwillCredit,
        LoanTransactionType::ChargeRefund,
        LoanTransactionType::Chargeback,
        LoanTransactionType::ChargeAdjustment,
        LoanTransactionType::ChargeOff,
        LoanTransactionType::DownPayment,
        LoanTransactionType::ReAge,
        LoanTransactionType::ReAmortize,
    ];

    pub fn code(self) -> u16 {
        match self {
            LoanTransactionType::Disbursement => 1,
            LoanTransactionType::Repayment => 2,
            LoanTransactionType::Contra => 3,
            LoanTransactionType::WaiveInterest => 4,
            LoanTransactionType::RepaymentAtDisbursement => 5,
            LoanTransactionType::WriteOff => 6,
            LoanTransactionType::MarkedForRescheduling => 7,
            LoanTransactionType::RecoveryRepayment => 8,
            LoanTransactionType::WaiveCharges => 9,
            LoanTransactionType::Accrual => 10,
            LoanTransactionType::InitiateTransfer => 12,
            LoanTransactionType::ApproveTransfer => 13,
            LoanTransactionType::WithdrawTransfer => 14,
            LoanTransactionType::RejectTransfer => 15,
            LoanTransactionType::ChargePayment => 16,
            LoanTransactionType::Refund => 17,
            LoanTransactionType::RefundForActiveLoan => 18,
            LoanTransactionType::IncomePosting => 19,
            LoanTransactionType::CreditBalanceRefund => 20,
            LoanTransactionType::MerchantIssuedRefund => 21,
            LoanTransactionType::PayoutRefund => 22,
            LoanTransactionType::GoodwillCredit => 23,
            LoanTransactionType::ChargeRefund => 24,
            LoanTransactionType::Chargeback => 25,
            LoanTransactionType::ChargeAdjustment => 26,
            LoanTransactionType::ChargeOff => 27,
            LoanTransactionType::DownPayment => 28,
            LoanTransactionType::ReAge => 29,
            LoanTransactionType::ReAmortize => 30,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub fn is_waiver(self) -> bool {
        matches!(self, LoanTransactionType::WaiveInterest | LoanTransactionType::WaiveCharges)
    }

    pub fn is_repayment_like(self) -> bool {
        matches!(
            self,
            LoanTransactionType::Repayment
                | LoanTransactionType::MerchantIssuedRefund
                | LoanTransactionType::PayoutRefund
                | LoanTransactionType::GoodwillCredit
                | LoanTransactionType::ChargeRefund
                | LoanTransactionType::ChargeAdjustment
                | LoanTransactionType::DownPayment
        )
    }

    /// types that move no money
    pub fn is_non_monetary(self) -> bool {
        matches!(
            self,
            LoanTransactionType::Contra
                | LoanTransactionType::MarkedForRescheduling
                | LoanTransactionType::ApproveTransfer
                | LoanTransactionType::InitiateTransfer
                | LoanTransactionType::RejectTransfer
                | LoanTransactionType::WithdrawTransfer
                | LoanTransactionType::ChargeOff
        )
    }
}
