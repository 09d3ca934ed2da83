//! Patrimoine CLI
//!
//! Command-line interface for the personal-finance calculators. Each
//! subcommand mirrors one calculator: it prints the headline metrics, and can
//! dump the full row sequence to CSV or the result record as JSON.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};

use patrimoine::tax::{EmploymentStatus, InvestmentIncome, Wrapper, WrapperTax};
use patrimoine::{
    BuyVsRentScenario, Compounding, ContributionFrequency, ContributionTiming, FireProfile,
    GrowthParameters, LoanTerms, ReportOptions, TaxEngine, TaxTables, TaxpayerProfile,
};

#[derive(Parser)]
#[command(name = "patrimoine", version, about = "Personal-finance calculators")]
struct Cli {
    /// Print the result record as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compound-interest projection with periodic contributions
    Compound {
        /// Initial capital (€)
        #[arg(long, default_value_t = 0.0)]
        capital: f64,

        /// Periodic contribution amount (€)
        #[arg(long, default_value_t = 100.0)]
        contribution: f64,

        /// Contribution frequency
        #[arg(long, value_enum, default_value_t = FrequencyArg::Monthly)]
        frequency: FrequencyArg,

        /// Interest capitalization frequency
        #[arg(long, value_enum, default_value_t = CompoundingArg::Annual)]
        compounding: CompoundingArg,

        /// Annual rate (%)
        #[arg(long, default_value_t = 5.0)]
        rate: f64,

        /// Horizon in years
        #[arg(long, default_value_t = 10.0)]
        years: f64,

        /// Pay contributions at the start of each period
        #[arg(long)]
        start_of_period: bool,

        /// Adjust the result for this annual inflation rate (%)
        #[arg(long)]
        inflation: Option<f64>,

        /// Tax the gains inside this wrapper
        #[arg(long, value_enum)]
        wrapper: Option<WrapperArg>,

        /// Personal marginal rate (%) for the progressive alternative
        #[arg(long)]
        marginal_rate: Option<f64>,

        /// Write the year-by-year trajectory to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Income tax, marginal rate (TMI) and average rate
    Tax {
        /// Gross annual income (€)
        #[arg(long)]
        income: f64,

        /// Fiscal shares (1 single, 2 couple, +0.5 per child)
        #[arg(long, default_value_t = 1.0)]
        shares: f64,

        /// Fiscal year (defaults to the current year when a table exists)
        #[arg(long)]
        year: Option<u16>,

        /// Skip the capped 10% salary allowance
        #[arg(long)]
        no_allowance: bool,

        /// Include estimated social contributions for this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Years to financial independence
    Fire {
        /// Net annual income (€)
        #[arg(long, default_value_t = 40_000.0)]
        income: f64,

        /// Annual expenses (€)
        #[arg(long, default_value_t = 25_000.0)]
        expenses: f64,

        /// Current invested net worth (€)
        #[arg(long, default_value_t = 10_000.0)]
        net_worth: f64,

        /// Expected annual return (%)
        #[arg(long, default_value_t = 7.0)]
        rate: f64,

        /// Withdrawal rate (%)
        #[arg(long, default_value_t = 4.0)]
        withdrawal: f64,

        /// Current age
        #[arg(long, default_value_t = 30)]
        age: u32,

        /// Write the wealth projection to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Loan amortization schedule
    Loan {
        /// Amount borrowed (€)
        #[arg(long, default_value_t = 250_000.0)]
        principal: f64,

        /// Annual rate, TAEG (%)
        #[arg(long, default_value_t = 2.5)]
        rate: f64,

        /// Term in years (ignored when --months is given)
        #[arg(long, default_value_t = 20)]
        years: u32,

        /// Term in months
        #[arg(long)]
        months: Option<u32>,

        /// Write the full schedule to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Buy-vs-rent net-worth comparison
    BuyVsRent {
        /// Property price (€)
        #[arg(long, default_value_t = 300_000.0)]
        price: f64,

        /// Down payment (€)
        #[arg(long, default_value_t = 50_000.0)]
        down: f64,

        /// Annual loan rate (%)
        #[arg(long, default_value_t = 2.5)]
        loan_rate: f64,

        /// Loan term in years
        #[arg(long, default_value_t = 20)]
        loan_term: u32,

        /// Acquisition costs (% of price)
        #[arg(long, default_value_t = 7.5)]
        purchase_costs: f64,

        /// Annual property appreciation (%)
        #[arg(long, default_value_t = 1.5)]
        appreciation: f64,

        /// Resale costs (% of value)
        #[arg(long, default_value_t = 6.0)]
        resale_costs: f64,

        /// Initial monthly rent (€)
        #[arg(long, default_value_t = 1_000.0)]
        rent: f64,

        /// Annual rent growth (%)
        #[arg(long, default_value_t = 1.5)]
        rent_growth: f64,

        /// Annual investment return (%)
        #[arg(long, default_value_t = 5.0)]
        investment_return: f64,

        /// Projection horizon in years
        #[arg(long, default_value_t = 20)]
        horizon: u32,

        /// Write the yearly rows to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FrequencyArg {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl From<FrequencyArg> for ContributionFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Annual => ContributionFrequency::Annual,
            FrequencyArg::SemiAnnual => ContributionFrequency::SemiAnnual,
            FrequencyArg::Quarterly => ContributionFrequency::Quarterly,
            FrequencyArg::Monthly => ContributionFrequency::Monthly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompoundingArg {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
    Continuous,
}

impl From<CompoundingArg> for Compounding {
    fn from(arg: CompoundingArg) -> Self {
        match arg {
            CompoundingArg::Annual => Compounding::Annual,
            CompoundingArg::SemiAnnual => Compounding::SemiAnnual,
            CompoundingArg::Quarterly => Compounding::Quarterly,
            CompoundingArg::Monthly => Compounding::Monthly,
            CompoundingArg::Continuous => Compounding::Continuous,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WrapperArg {
    Cto,
    Pea,
    AssuranceVie,
}

impl From<WrapperArg> for Wrapper {
    fn from(arg: WrapperArg) -> Self {
        match arg {
            WrapperArg::Cto => Wrapper::OrdinaryAccount,
            WrapperArg::Pea => Wrapper::Pea,
            WrapperArg::AssuranceVie => Wrapper::AssuranceVie,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Employee,
    CivilServant,
    SelfEmployed,
}

impl From<StatusArg> for EmploymentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Employee => EmploymentStatus::Employee,
            StatusArg::CivilServant => EmploymentStatus::CivilServant,
            StatusArg::SelfEmployed => EmploymentStatus::SelfEmployed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compound {
            capital,
            contribution,
            frequency,
            compounding,
            rate,
            years,
            start_of_period,
            inflation,
            wrapper,
            marginal_rate,
            csv,
        } => {
            let timing = if start_of_period {
                ContributionTiming::StartOfPeriod
            } else {
                ContributionTiming::EndOfPeriod
            };
            let params = GrowthParameters::new(
                capital,
                contribution,
                rate / 100.0,
                frequency.into(),
                compounding.into(),
                years,
                timing,
            )?;

            let options = ReportOptions {
                after_tax: wrapper.map(|w| WrapperTax {
                    wrapper: w.into(),
                    income: InvestmentIncome::Interest,
                    marginal_rate: marginal_rate.map(|r| r / 100.0),
                }),
                inflation_rate: inflation.map(|r| r / 100.0),
            };
            let report = params.report(&options);

            if let Some(path) = &csv {
                write_trajectory_csv(path, &params)?;
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Compound interest ({} years at {:.2}%)", years, rate);
            println!("{}", "-".repeat(48));
            println!(
                "{:<28} {:>15.2} €",
                "Total contributed", report.total_contributed
            );
            println!("{:<28} {:>15.2} €", "Gross final value", report.gross_value);
            println!("{:<28} {:>15.2} €", "Gross interest", report.gross_interest);
            if let Some(tax) = &report.tax {
                println!(
                    "{:<28} {:>15.2} €",
                    "Taxable interest", tax.taxable_interest
                );
                println!(
                    "{:<28} {:>14.1} %",
                    "Effective tax rate",
                    tax.effective_rate * 100.0
                );
                println!("{:<28} {:>15.2} €", "Tax due", tax.tax_due);
                println!("{:<28} {:>15.2} €", "Net final value", tax.net_value);
            }
            if let Some(real) = &report.real {
                println!(
                    "{:<28} {:>15.2} €",
                    "Real (deflated) value", real.real_value
                );
                println!(
                    "{:<28} {:>14.2} %",
                    "Real annualized return",
                    real.real_annual_return * 100.0
                );
            }
        }

        Command::Tax {
            income,
            shares,
            year,
            no_allowance,
            status,
        } => {
            let tables = load_tables();
            let year = year.unwrap_or_else(|| default_year(&tables));
            let engine = TaxEngine::new(tables);

            let mut profile = TaxpayerProfile::new(income, shares, year)?;
            profile.salary_allowance = !no_allowance;
            profile.status = status.map(Into::into);

            let assessment = engine.compute(&profile)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
                return Ok(());
            }

            println!("Income tax {} ({} share(s))", year, shares);
            println!("{}", "-".repeat(48));
            println!(
                "{:<28} {:>15.2} €",
                "Taxable income", assessment.taxable_income
            );
            println!(
                "{:<28} {:>15.2} €",
                "Family quotient", assessment.quotient
            );
            println!(
                "{:<28} {:>14.0} %",
                "Marginal rate (TMI)",
                assessment.marginal_rate * 100.0
            );
            println!(
                "{:<28} {:>15.2} €",
                "Tax before rebate", assessment.tax_before_rebate
            );
            if assessment.rebate > 0.0 {
                println!("{:<28} {:>15.2} €", "Décote", assessment.rebate);
            }
            println!("{:<28} {:>15.2} €", "Net tax", assessment.net_tax);
            println!(
                "{:<28} {:>14.1} %",
                "Average rate",
                assessment.average_rate * 100.0
            );

            println!();
            println!(
                "{:>24} {:>8} {:>12} {:>12}",
                "Bracket", "Rate", "Base", "Tax"
            );
            for share in &assessment.per_bracket {
                let upper = share
                    .upper
                    .map_or_else(|| "∞".to_string(), |u| format!("{:.0}", u));
                println!(
                    "{:>24} {:>7.0}% {:>12.0} {:>12.2}",
                    format!("{:.0} - {}", share.lower, upper),
                    share.rate * 100.0,
                    share.base,
                    share.tax * shares,
                );
            }

            if let Some(social) = &assessment.social {
                println!();
                println!("{:<28} {:>15.2} €", "Social contributions", social.amount);
                println!("{:<28} {:>15.2} €", "Total levies", social.total_levies);
                println!("{:<28} {:>15.2} €", "Net income", social.net_income);
                println!(
                    "{:<28} {:>14.1} %",
                    "Global rate",
                    social.global_rate * 100.0
                );
            }
        }

        Command::Fire {
            income,
            expenses,
            net_worth,
            rate,
            withdrawal,
            age,
            csv,
        } => {
            let profile = FireProfile::new(
                income,
                expenses,
                net_worth,
                rate / 100.0,
                withdrawal / 100.0,
                age,
            )?;
            let report = profile.report();

            if let Some(path) = &csv {
                let horizon = if report.years_to_target.is_finite() {
                    report.years_to_target.ceil() as u32 + 5
                } else {
                    50
                };
                write_fire_csv(path, &profile, horizon)?;
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("FIRE projection");
            println!("{}", "-".repeat(48));
            println!("{:<28} {:>15.2} €", "Target wealth", report.target_wealth);
            println!("{:<28} {:>15.2} €", "Annual savings", report.annual_savings);
            println!(
                "{:<28} {:>14.1} %",
                "Savings rate",
                report.savings_rate * 100.0
            );
            println!("{:<28} {:>15.2} €", "Missing wealth", report.missing_wealth);
            if report.years_to_target.is_finite() {
                println!(
                    "{:<28} {:>13.1} yr",
                    "Years to target", report.years_to_target
                );
                println!(
                    "{:<28} {:>13.0} yr",
                    "FIRE age",
                    report.fire_age.unwrap_or_default()
                );
            } else {
                println!("{:<28} {:>15}", "Years to target", "unreachable");
                println!("{:<28} {:>15}", "FIRE age", "N/A");
            }
        }

        Command::Loan {
            principal,
            rate,
            years,
            months,
            csv,
        } => {
            let term_months = months.unwrap_or(years * 12);
            let terms = LoanTerms::new(principal, rate / 100.0, term_months)?;
            let summary = terms.summary();

            if let Some(path) = &csv {
                write_schedule_csv(path, &terms)?;
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!(
                "Loan {:.0} € over {} months at {:.2}%",
                principal, term_months, rate
            );
            println!("{}", "-".repeat(48));
            println!(
                "{:<28} {:>15.2} €",
                "Monthly payment", summary.monthly_payment
            );
            println!(
                "{:<28} {:>15.2} €",
                "Total interest", summary.total_interest
            );
            println!("{:<28} {:>15.2} €", "Total repaid", summary.total_paid);
            println!(
                "{:<28} {:>14.1} %",
                "Interest / principal",
                summary.interest_ratio * 100.0
            );

            println!();
            println!(
                "{:>4} {:>12} {:>12} {:>12} {:>14}",
                "Year", "Payment", "Interest", "Principal", "Balance"
            );
            for row in terms.annual_summary() {
                println!(
                    "{:>4} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                    row.year,
                    row.average_payment,
                    row.interest_paid,
                    row.principal_paid,
                    row.ending_balance,
                );
            }
        }

        Command::BuyVsRent {
            price,
            down,
            loan_rate,
            loan_term,
            purchase_costs,
            appreciation,
            resale_costs,
            rent,
            rent_growth,
            investment_return,
            horizon,
            csv,
        } => {
            let scenario = BuyVsRentScenario {
                property_price: price,
                down_payment: down,
                loan_rate: loan_rate / 100.0,
                loan_term_years: loan_term,
                purchase_cost_rate: purchase_costs / 100.0,
                appreciation_rate: appreciation / 100.0,
                resale_cost_rate: resale_costs / 100.0,
                monthly_rent: rent,
                rent_growth_rate: rent_growth / 100.0,
                investment_return: investment_return / 100.0,
                horizon_years: horizon,
            };
            let result = scenario.simulate()?;

            if let Some(path) = &csv {
                write_buy_vs_rent_csv(path, &result)?;
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            println!("Buy vs rent over {} years", horizon);
            println!("{}", "-".repeat(48));
            println!(
                "{:<28} {:>15.2} €",
                "Owner net position", result.summary.owner_final
            );
            println!(
                "{:<28} {:>15.2} €",
                "Renter portfolio", result.summary.renter_final
            );
            println!(
                "{:<28} {:>14.1} %",
                "Relative difference", result.summary.relative_difference_pct
            );
            match result.crossover_year {
                Some(year) => println!("{:<28} {:>13} yr", "Renter overtakes in", year),
                None => println!("{:<28} {:>15}", "Renter overtakes in", "never"),
            }
        }
    }

    Ok(())
}

/// Bracket tables: CSV reference data when present, built-ins otherwise
fn load_tables() -> TaxTables {
    match TaxTables::from_csv() {
        Ok(tables) => {
            log::info!("loaded bracket tables for {:?}", tables.years());
            tables
        }
        Err(err) => {
            log::warn!("using built-in bracket tables ({err})");
            TaxTables::builtin()
        }
    }
}

/// Current calendar year when a table exists for it, else the latest table
fn default_year(tables: &TaxTables) -> u16 {
    let current = u16::try_from(chrono::Local::now().year()).unwrap_or(0);
    if tables.get(current).is_some() {
        current
    } else {
        tables.latest_year()
    }
}

fn write_trajectory_csv(path: &PathBuf, params: &GrowthParameters) -> anyhow::Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "Year,Contributed,Value")?;
    for point in params.trajectory() {
        writeln!(
            file,
            "{},{:.2},{:.2}",
            point.year, point.contributed, point.value
        )?;
    }
    println!("Trajectory written to {}", path.display());
    Ok(())
}

fn write_fire_csv(path: &PathBuf, profile: &FireProfile, horizon: u32) -> anyhow::Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "Year,Wealth,Target")?;
    let target = profile.target_wealth();
    for point in profile.projection(horizon) {
        writeln!(file, "{},{:.2},{:.2}", point.year, point.wealth, target)?;
    }
    println!("Projection written to {}", path.display());
    Ok(())
}

fn write_schedule_csv(path: &PathBuf, terms: &LoanTerms) -> anyhow::Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(
        file,
        "Month,Year,Payment,Interest,Principal,CumInterest,CumPrincipal,Balance"
    )?;
    for row in terms.schedule() {
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.month,
            row.year,
            row.payment,
            row.interest,
            row.principal,
            row.cumulative_interest,
            row.cumulative_principal,
            row.balance,
        )?;
    }
    println!("Schedule written to {}", path.display());
    Ok(())
}

fn write_buy_vs_rent_csv(
    path: &PathBuf,
    result: &patrimoine::BuyVsRentResult,
) -> anyhow::Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(
        file,
        "Year,PropertyValue,LoanBalance,OwnerCash,OwnerNet,RenterPortfolio,AnnualRent"
    )?;
    for row in &result.rows {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.year,
            row.property_value,
            row.loan_balance,
            row.owner_cash,
            row.owner_net_position,
            row.renter_portfolio,
            row.annual_rent,
        )?;
    }
    println!("Comparison written to {}", path.display());
    Ok(())
}
