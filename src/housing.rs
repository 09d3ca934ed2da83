//! Buy-vs-rent comparison
//!
//! Year-by-year projection of two parallel net-worth trajectories: an owner
//! financing a property with a fixed-rate loan, and a renter investing the
//! upfront cost plus whatever the mortgage would have cost above the rent.
//! Loan balances come from the amortization schedule; the rest is plain
//! yearly compounding.

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::loan::LoanTerms;

/// Inputs of a buy-vs-rent comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyVsRentScenario {
    /// Purchase price of the property
    pub property_price: f64,

    /// Cash paid upfront, reducing the borrowed amount
    pub down_payment: f64,

    /// Annual loan rate as a fraction
    pub loan_rate: f64,

    /// Loan term in years
    pub loan_term_years: u32,

    /// Acquisition costs (notary and fees) as a fraction of the price
    pub purchase_cost_rate: f64,

    /// Annual property appreciation rate (may be negative)
    pub appreciation_rate: f64,

    /// Resale costs as a fraction of the property value
    pub resale_cost_rate: f64,

    /// Initial monthly rent on the comparable home
    pub monthly_rent: f64,

    /// Annual rent growth rate
    pub rent_growth_rate: f64,

    /// Annual return of the renter's (and owner's surplus) portfolio
    pub investment_return: f64,

    /// Comparison horizon in years
    pub horizon_years: u32,
}

impl BuyVsRentScenario {
    /// Check every invariant; called by `simulate` before any computation
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.property_price <= 0.0 {
            return Err(ParameterError::NotPositive {
                field: "property_price",
                value: self.property_price,
            });
        }
        if self.down_payment < 0.0 || self.down_payment > self.property_price {
            return Err(ParameterError::OutOfRange {
                field: "down_payment",
                min: 0.0,
                max: self.property_price,
                value: self.down_payment,
            });
        }
        if self.loan_rate < 0.0 {
            return Err(ParameterError::Negative {
                field: "loan_rate",
                value: self.loan_rate,
            });
        }
        if self.loan_term_years == 0 {
            return Err(ParameterError::NotPositive {
                field: "loan_term_years",
                value: 0.0,
            });
        }
        if self.horizon_years == 0 {
            return Err(ParameterError::NotPositive {
                field: "horizon_years",
                value: 0.0,
            });
        }
        if self.monthly_rent < 0.0 {
            return Err(ParameterError::Negative {
                field: "monthly_rent",
                value: self.monthly_rent,
            });
        }
        for (field, value) in [
            ("purchase_cost_rate", self.purchase_cost_rate),
            ("resale_cost_rate", self.resale_cost_rate),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(ParameterError::OutOfRange {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        if self.rent_growth_rate < 0.0 {
            return Err(ParameterError::Negative {
                field: "rent_growth_rate",
                value: self.rent_growth_rate,
            });
        }
        if self.investment_return < 0.0 {
            return Err(ParameterError::Negative {
                field: "investment_return",
                value: self.investment_return,
            });
        }
        if self.appreciation_rate <= -1.0 {
            return Err(ParameterError::OutOfRange {
                field: "appreciation_rate",
                min: -1.0,
                max: 1.0,
                value: self.appreciation_rate,
            });
        }
        Ok(())
    }

    /// Upfront cash needed to buy: down payment plus acquisition costs
    pub fn upfront_cost(&self) -> f64 {
        self.down_payment + self.property_price * self.purchase_cost_rate
    }

    /// Run the yearly comparison
    pub fn simulate(&self) -> Result<BuyVsRentResult, ParameterError> {
        self.validate()?;

        let borrowed = self.property_price - self.down_payment;
        let term_months = self.loan_term_years * 12;

        // Fully-cash purchases have no loan leg
        let (monthly_payment, year_end_balances) = if borrowed > 0.0 {
            let terms = LoanTerms::new(borrowed, self.loan_rate, term_months)?;
            let balances: Vec<f64> = terms
                .schedule()
                .filter(|row| row.month > 0 && row.month % 12 == 0)
                .map(|row| row.balance)
                .collect();
            (terms.monthly_payment(), balances)
        } else {
            (0.0, Vec::new())
        };

        let mut rows = Vec::with_capacity(self.horizon_years as usize);
        let mut property_value = self.property_price;
        let mut rent = self.monthly_rent;
        let mut renter_portfolio = self.upfront_cost();
        let mut owner_cash = 0.0;

        for year in 1..=self.horizon_years {
            property_value *= 1.0 + self.appreciation_rate;

            let annual_rent = rent * 12.0;
            let in_loan_term = year as usize <= year_end_balances.len();
            let annual_payment = if in_loan_term {
                monthly_payment * 12.0
            } else {
                0.0
            };

            // Renter invests what the mortgage would have cost above the rent
            let invested_surplus = (annual_payment - annual_rent).max(0.0);
            renter_portfolio = renter_portfolio * (1.0 + self.investment_return) + invested_surplus;

            // Owner invests what the rent would have cost above the mortgage
            let owner_saving = (annual_rent - annual_payment).max(0.0);
            owner_cash = (owner_cash + owner_saving) * (1.0 + self.investment_return);

            let loan_balance = if in_loan_term {
                year_end_balances[year as usize - 1]
            } else {
                0.0
            };
            let owner_net_position =
                property_value * (1.0 - self.resale_cost_rate) - loan_balance + owner_cash;

            rows.push(YearRow {
                year,
                property_value,
                loan_balance,
                owner_cash,
                owner_net_position,
                renter_portfolio,
                annual_rent,
            });

            rent *= 1.0 + self.rent_growth_rate;
        }

        let crossover_year = rows
            .windows(2)
            .find(|pair| {
                pair[1].renter_portfolio > pair[1].owner_net_position
                    && pair[0].renter_portfolio <= pair[0].owner_net_position
            })
            .map(|pair| pair[1].year);

        let owner_final = rows.last().map_or(0.0, |r| r.owner_net_position);
        let renter_final = rows.last().map_or(0.0, |r| r.renter_portfolio);
        let relative_difference_pct = if owner_final != 0.0 {
            100.0 * (renter_final - owner_final) / owner_final
        } else {
            0.0
        };

        let outcome = if relative_difference_pct < 0.0 {
            Outcome::OwnerAhead
        } else {
            Outcome::RenterAhead
        };

        Ok(BuyVsRentResult {
            rows,
            crossover_year,
            summary: ComparisonSummary {
                owner_final,
                renter_final,
                relative_difference_pct,
                outcome,
            },
        })
    }
}

/// One year of the comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearRow {
    pub year: u32,

    /// Property value after this year's appreciation
    pub property_value: f64,

    /// Loan balance at the end of the year
    pub loan_balance: f64,

    /// Owner's invested savings (rent advantage years)
    pub owner_cash: f64,

    /// Property net of resale costs, minus the loan, plus cash
    pub owner_net_position: f64,

    /// Renter's invested portfolio
    pub renter_portfolio: f64,

    /// Rent paid during the year
    pub annual_rent: f64,
}

/// Which trajectory ends ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    OwnerAhead,
    RenterAhead,
}

/// Final-year comparison figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub owner_final: f64,
    pub renter_final: f64,

    /// `100 * (renter - owner) / owner`; 0 when the owner position is 0
    pub relative_difference_pct: f64,

    pub outcome: Outcome,
}

/// Complete result of a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyVsRentResult {
    /// One row per year, in order
    pub rows: Vec<YearRow>,

    /// First year the renter overtakes the owner, if any
    pub crossover_year: Option<u32>,

    pub summary: ComparisonSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_scenario() -> BuyVsRentScenario {
        BuyVsRentScenario {
            property_price: 300_000.0,
            down_payment: 50_000.0,
            loan_rate: 0.025,
            loan_term_years: 20,
            purchase_cost_rate: 0.075,
            appreciation_rate: 0.015,
            resale_cost_rate: 0.06,
            monthly_rent: 1_000.0,
            rent_growth_rate: 0.015,
            investment_return: 0.05,
            horizon_years: 20,
        }
    }

    #[test]
    fn test_validation() {
        let mut s = base_scenario();
        s.property_price = 0.0;
        assert!(s.simulate().is_err());

        let mut s = base_scenario();
        s.down_payment = 400_000.0;
        assert!(s.simulate().is_err());

        let mut s = base_scenario();
        s.horizon_years = 0;
        assert!(s.simulate().is_err());

        let mut s = base_scenario();
        s.resale_cost_rate = 1.5;
        assert!(s.simulate().is_err());
    }

    #[test]
    fn test_rows_are_ordered_and_complete() {
        let result = base_scenario().simulate().unwrap();
        assert_eq!(result.rows.len(), 20);
        for (i, row) in result.rows.iter().enumerate() {
            assert_eq!(row.year, i as u32 + 1);
        }

        // Property appreciates each year
        for pair in result.rows.windows(2) {
            assert!(pair[1].property_value > pair[0].property_value);
        }
        // Loan balance decreases and ends at 0 on the 20-year horizon
        for pair in result.rows.windows(2) {
            assert!(pair[1].loan_balance <= pair[0].loan_balance);
        }
        assert_eq!(result.rows.last().unwrap().loan_balance, 0.0);
    }

    #[test]
    fn test_renter_portfolio_grows_with_upfront_seed() {
        let scenario = base_scenario();
        let result = scenario.simulate().unwrap();

        // The renter starts with the owner's upfront cost invested
        let seeded = scenario.upfront_cost() * (1.0 + scenario.investment_return);
        assert!(result.rows[0].renter_portfolio >= seeded - 1e-9);
    }

    #[test]
    fn test_loan_balance_zero_after_term() {
        let mut scenario = base_scenario();
        scenario.loan_term_years = 10;
        scenario.horizon_years = 15;

        let result = scenario.simulate().unwrap();
        assert!(result.rows[8].loan_balance > 0.0);
        assert_eq!(result.rows[9].loan_balance, 0.0);
        for row in &result.rows[10..] {
            assert_eq!(row.loan_balance, 0.0);
        }
    }

    #[test]
    fn test_cash_purchase_has_no_loan_leg() {
        let mut scenario = base_scenario();
        scenario.down_payment = scenario.property_price;

        let result = scenario.simulate().unwrap();
        for row in &result.rows {
            assert_eq!(row.loan_balance, 0.0);
        }
        // With no mortgage payment the owner banks the avoided rent
        assert!(result.rows.last().unwrap().owner_cash > 0.0);
    }

    #[test]
    fn test_crossover_when_renter_overtakes_mid_horizon() {
        // Small down payment and cheap rent: the owner's equity leads early
        // through amortization and appreciation, but the renter's large
        // invested surplus compounds at 8% and overtakes within the horizon.
        let scenario = BuyVsRentScenario {
            property_price: 300_000.0,
            down_payment: 10_000.0,
            loan_rate: 0.025,
            loan_term_years: 20,
            purchase_cost_rate: 0.0,
            appreciation_rate: 0.03,
            resale_cost_rate: 0.0,
            monthly_rent: 500.0,
            rent_growth_rate: 0.015,
            investment_return: 0.08,
            horizon_years: 25,
        };

        let result = scenario.simulate().unwrap();

        // Owner ahead in year 1
        let first = &result.rows[0];
        assert!(first.owner_net_position > first.renter_portfolio);

        let year = result.crossover_year.expect("renter should overtake");
        assert!(year > 1);
        let row = &result.rows[year as usize - 1];
        let prev = &result.rows[year as usize - 2];
        assert!(row.renter_portfolio > row.owner_net_position);
        assert!(prev.renter_portfolio <= prev.owner_net_position);
    }

    #[test]
    fn test_no_crossover_when_owner_stays_ahead() {
        let mut scenario = base_scenario();
        scenario.investment_return = 0.0;
        scenario.appreciation_rate = 0.04;

        let result = scenario.simulate().unwrap();
        assert_eq!(result.crossover_year, None);
        assert_eq!(result.summary.outcome, Outcome::OwnerAhead);
        assert!(result.summary.relative_difference_pct < 0.0);
    }

    #[test]
    fn test_zero_owner_position_guards_percentage() {
        // Property collapses almost entirely: owner ends near or below zero
        let mut scenario = base_scenario();
        scenario.appreciation_rate = -0.90;
        scenario.horizon_years = 3;

        let result = scenario.simulate().unwrap();
        // Division guard: the percentage is finite whatever the owner ends at
        assert!(result.summary.relative_difference_pct.is_finite());
    }
}
