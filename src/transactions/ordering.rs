use std::cmp::Ordering;

use super::LoanTransaction;

/// canonical processing order of loan transactions
///
/// Keys, in order: transaction date; creation timestamp (missing first);
/// income posting before anything else; waivers before anything else;
/// identifier (unpersisted first).
pub fn compare(a: &LoanTransaction, b: &LoanTransaction) -> Ordering {
    a.transaction_date
        .cmp(&b.transaction_date)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| b.is_income_posting().cmp(&a.is_income_posting()))
        .then_with(|| b.is_waiver().cmp(&a.is_waiver()))
        .then_with(|| a.id.cmp(&b.id))
}

/// sort transactions into canonical order
pub fn sort(transactions: &mut [LoanTransaction]) {
    transactions.sort_by(compare);
}

/// sorted copy of the transactions, leaving the input untouched
pub fn sorted<'a, I>(transactions: I) -> Vec<&'a LoanTransaction>
where
    I: IntoIterator<Item = &'a LoanTransaction>,
{
    let mut ordered: Vec<&LoanTransaction> = transactions.into_iter().collect();
    ordered.sort_by(|a, b| compare(a, b));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::transactions::LoanTransactionType;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repayment(day: u32) -> LoanTransaction {
        LoanTransaction::new(LoanTransactionType::Repayment, date(2024, 3, day), Money::from_major(100))
    }

    #[test]
    fn test_date_orders_first() {
        let early = repayment(1).with_id(9);
        let late = repayment(2).with_id(1);
        assert_eq!(compare(&early, &late), Ordering::Less);
    }

    #[test]
    fn test_missing_timestamp_sorts_first() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let stamped = repayment(1).with_created_at(created);
        let unstamped = repayment(1);
        assert_eq!(compare(&unstamped, &stamped), Ordering::Less);

        let later = repayment(1).with_created_at(created + chrono::Duration::minutes(1));
        assert_eq!(compare(&stamped, &later), Ordering::Less);
    }

    #[test]
    fn test_income_posting_then_waiver_priority() {
        let income = LoanTransaction::new(LoanTransactionType::IncomePosting, date(2024, 3, 1), Money::from_major(5)).with_id(3);
        let waiver = LoanTransaction::new(LoanTransactionType::WaiveCharges, date(2024, 3, 1), Money::from_major(5)).with_id(2);
        let payment = repayment(1).with_id(1);

        let mut transactions = vec![payment.clone(), waiver.clone(), income.clone()];
        sort(&mut transactions);
        assert_eq!(transactions, vec![income, waiver, payment]);
    }

    #[test]
    fn test_reversed_income_posting_loses_priority() {
        let mut income = LoanTransaction::new(LoanTransactionType::IncomePosting, date(2024, 3, 1), Money::from_major(5)).with_id(3);
        income.reversed = true;
        let payment = repayment(1).with_id(1);
        assert_eq!(compare(&payment, &income), Ordering::Less);
    }

    #[test]
    fn test_unpersisted_before_persisted() {
        let persisted = repayment(1).with_id(1);
        let unpersisted = repayment(1);
        let ordered = sorted([&persisted, &unpersisted]);
        assert_eq!(ordered[0].id, None);
        assert_eq!(ordered[1].id, Some(1));
    }
}
