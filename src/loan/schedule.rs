//! Amortization schedule generation and aggregation
//!
//! The schedule yields exactly `term_months + 1` rows; row 0 is the initial
//! state with a zero payment so renderers get the full balance curve without
//! interpolating. Amounts are rounded to the cent month by month, and the
//! final payment is recomputed to absorb the rounding residue: the balance
//! after the last row is exactly 0.

use serde::{Deserialize, Serialize};

use super::round_cents;
use super::terms::LoanTerms;

/// One month of the amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month index (0 = initial state)
    pub month: u32,

    /// Loan year the month belongs to (0 for the initial row)
    pub year: u32,

    /// Payment made this month
    pub payment: f64,

    /// Interest portion of the payment
    pub interest: f64,

    /// Principal portion of the payment
    pub principal: f64,

    /// Interest paid since origination
    pub cumulative_interest: f64,

    /// Principal repaid since origination
    pub cumulative_principal: f64,

    /// Remaining balance after the payment
    pub balance: f64,
}

/// Lazy iterator over the amortization rows of a loan
#[derive(Debug, Clone)]
pub struct AmortizationSchedule {
    terms: LoanTerms,
    payment: f64,
    month: u32,
    balance: f64,
    cumulative_interest: f64,
    cumulative_principal: f64,
}

impl AmortizationSchedule {
    pub(crate) fn new(terms: LoanTerms) -> Self {
        Self {
            terms,
            payment: round_cents(terms.monthly_payment()),
            month: 0,
            balance: terms.principal,
            cumulative_interest: 0.0,
            cumulative_principal: 0.0,
        }
    }

    /// Rows remaining to be produced
    fn remaining(&self) -> usize {
        (self.terms.term_months + 1 - self.month) as usize
    }
}

impl Iterator for AmortizationSchedule {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<AmortizationRow> {
        if self.month > self.terms.term_months {
            return None;
        }

        let month = self.month;
        self.month += 1;

        if month == 0 {
            return Some(AmortizationRow {
                month: 0,
                year: 0,
                payment: 0.0,
                interest: 0.0,
                principal: 0.0,
                cumulative_interest: 0.0,
                cumulative_principal: 0.0,
                balance: round_cents(self.balance),
            });
        }

        let interest = round_cents(self.balance * self.terms.monthly_rate());

        // Final month settles whatever balance is left
        let (principal, payment) = if month == self.terms.term_months {
            let principal = round_cents(self.balance);
            (principal, round_cents(principal + interest))
        } else {
            (round_cents(self.payment - interest), self.payment)
        };

        self.balance = round_cents((self.balance - principal).max(0.0));
        self.cumulative_interest = round_cents(self.cumulative_interest + interest);
        self.cumulative_principal = round_cents(self.cumulative_principal + principal);

        Some(AmortizationRow {
            month,
            year: (month - 1) / 12 + 1,
            payment,
            interest,
            principal,
            cumulative_interest: self.cumulative_interest,
            cumulative_principal: self.cumulative_principal,
            balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AmortizationSchedule {}

/// Headline figures of a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_payment: f64,

    /// Sum of all payments over the term
    pub total_paid: f64,

    /// Total interest over the term
    pub total_interest: f64,

    /// Total interest / principal
    pub interest_ratio: f64,
}

/// One year of the schedule, aggregated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualRow {
    pub year: u32,

    /// Mean payment over the year's months
    pub average_payment: f64,

    /// Interest paid during the year
    pub interest_paid: f64,

    /// Principal repaid during the year
    pub principal_paid: f64,

    pub cumulative_interest: f64,
    pub cumulative_principal: f64,

    /// Balance at the end of the year
    pub ending_balance: f64,
}

impl LoanTerms {
    /// Headline figures, computed by draining a schedule
    pub fn summary(&self) -> LoanSummary {
        let mut total_paid = 0.0;
        let mut total_interest = 0.0;
        for row in self.schedule() {
            total_paid += row.payment;
            total_interest = row.cumulative_interest;
        }

        LoanSummary {
            monthly_payment: round_cents(self.monthly_payment()),
            total_paid: round_cents(total_paid),
            total_interest,
            interest_ratio: total_interest / self.principal,
        }
    }

    /// Per-year aggregation of the schedule (initial row excluded)
    pub fn annual_summary(&self) -> Vec<AnnualRow> {
        let mut years: Vec<AnnualRow> = Vec::with_capacity(self.term_months.div_ceil(12) as usize);

        for row in self.schedule().skip(1) {
            if years.last().map(|y| y.year) != Some(row.year) {
                years.push(AnnualRow {
                    year: row.year,
                    average_payment: 0.0,
                    interest_paid: 0.0,
                    principal_paid: 0.0,
                    cumulative_interest: 0.0,
                    cumulative_principal: 0.0,
                    ending_balance: 0.0,
                });
            }
            let current = years.last_mut().unwrap();
            current.average_payment += row.payment;
            current.interest_paid += row.interest;
            current.principal_paid += row.principal;
            current.cumulative_interest = row.cumulative_interest;
            current.cumulative_principal = row.cumulative_principal;
            current.ending_balance = row.balance;
        }

        for year in &mut years {
            let months = if year.year * 12 <= self.term_months {
                12
            } else {
                self.term_months % 12
            };
            year.average_payment /= months as f64;
        }

        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_terms() -> LoanTerms {
        LoanTerms::new(250_000.0, 0.025, 240).unwrap()
    }

    #[test]
    fn test_row_count_and_initial_row() {
        let rows: Vec<_> = reference_terms().schedule().collect();
        assert_eq!(rows.len(), 241);

        assert_eq!(rows[0].month, 0);
        assert_eq!(rows[0].payment, 0.0);
        assert_eq!(rows[0].balance, 250_000.0);
        assert_eq!(rows[1].year, 1);
        assert_eq!(rows[12].year, 1);
        assert_eq!(rows[13].year, 2);
        assert_eq!(rows[240].year, 20);
    }

    #[test]
    fn test_balance_reaches_exactly_zero() {
        let last = reference_terms().schedule().last().unwrap();
        assert_eq!(last.balance, 0.0);
    }

    #[test]
    fn test_principal_portions_sum_to_principal() {
        let terms = reference_terms();
        let total: f64 = terms.schedule().map(|r| r.principal).sum();
        assert!((total - terms.principal).abs() < 0.01);

        let last = terms.schedule().last().unwrap();
        assert!((last.cumulative_principal - terms.principal).abs() < 0.01);
    }

    #[test]
    fn test_balance_is_monotone_non_increasing() {
        let mut last_balance = f64::INFINITY;
        for row in reference_terms().schedule() {
            assert!(row.balance <= last_balance);
            last_balance = row.balance;
        }
    }

    #[test]
    fn test_zero_rate_loan() {
        let terms = LoanTerms::new(120_000.0, 0.0, 240).unwrap();
        for row in terms.schedule().skip(1) {
            assert_eq!(row.interest, 0.0);
            assert_eq!(row.payment, 500.0);
        }
        let last = terms.schedule().last().unwrap();
        assert_eq!(last.balance, 0.0);
        assert_eq!(last.cumulative_interest, 0.0);
    }

    #[test]
    fn test_schedule_is_restartable() {
        let terms = reference_terms();
        let schedule = terms.schedule();

        let first: Vec<_> = schedule.clone().collect();
        let second: Vec<_> = schedule.collect();
        assert_eq!(first.len(), second.len());
        assert_eq!(first[100].balance, second[100].balance);

        // A fresh schedule starts over from month 0
        assert_eq!(terms.schedule().next().unwrap().month, 0);
    }

    #[test]
    fn test_exact_size_iterator() {
        let mut schedule = reference_terms().schedule();
        assert_eq!(schedule.len(), 241);
        schedule.next();
        assert_eq!(schedule.len(), 240);
    }

    #[test]
    fn test_summary() {
        let summary = reference_terms().summary();
        assert!((summary.monthly_payment - 1_324.76).abs() < 0.01);
        assert!(summary.total_interest > 0.0);
        assert!(
            (summary.total_paid - (250_000.0 + summary.total_interest)).abs() < 0.02
        );
        assert!((summary.interest_ratio - summary.total_interest / 250_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_annual_summary_aggregates_schedule() {
        let terms = reference_terms();
        let annual = terms.annual_summary();

        assert_eq!(annual.len(), 20);
        assert_eq!(annual[0].year, 1);

        let total_interest: f64 = annual.iter().map(|y| y.interest_paid).sum();
        let total_principal: f64 = annual.iter().map(|y| y.principal_paid).sum();
        assert!((total_interest - terms.summary().total_interest).abs() < 0.05);
        assert!((total_principal - terms.principal).abs() < 0.05);
        assert_eq!(annual[19].ending_balance, 0.0);

        // Early years are interest-heavy, later years principal-heavy
        assert!(annual[0].interest_paid > annual[19].interest_paid);
        assert!(annual[0].principal_paid < annual[19].principal_paid);
    }
}
