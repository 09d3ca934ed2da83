//! Buy-vs-rent sensitivity sweep
//!
//! Runs the comparison across an investment-return x property-appreciation
//! grid and writes one CSV row per cell (final positions, relative
//! difference, crossover year) for heatmap-style analysis.

use std::fs::File;
use std::io::Write;
use std::time::Instant;

use rayon::prelude::*;

use patrimoine::housing::Outcome;
use patrimoine::BuyVsRentScenario;

/// One cell of the sweep grid
#[derive(Debug, Clone)]
struct GridCell {
    investment_return: f64,
    appreciation_rate: f64,
}

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
        horizon_years: 25,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();

    // 0%..=10% investment return x 0%..=5% appreciation, half-point steps
    let mut grid = Vec::new();
    for ret_halves in 0..=20 {
        for appr_halves in 0..=10 {
            grid.push(GridCell {
                investment_return: ret_halves as f64 * 0.005,
                appreciation_rate: appr_halves as f64 * 0.005,
            });
        }
    }
    println!("Sweeping {} scenarios...", grid.len());

    let results: Vec<_> = grid
        .par_iter()
        .map(|cell| {
            let scenario = BuyVsRentScenario {
                investment_return: cell.investment_return,
                appreciation_rate: cell.appreciation_rate,
                ..base_scenario()
            };
            let result = scenario.simulate().expect("grid scenario must be valid");
            (cell.clone(), result)
        })
        .collect();

    println!("Sweep complete in {:?}", start.elapsed());

    let output_path = "buy_vs_rent_sensitivity.csv";
    let mut file = File::create(output_path)?;
    writeln!(
        file,
        "InvestmentReturn,Appreciation,OwnerFinal,RenterFinal,RelativeDiffPct,CrossoverYear"
    )?;
    for (cell, result) in &results {
        writeln!(
            file,
            "{:.3},{:.3},{:.2},{:.2},{:.2},{}",
            cell.investment_return,
            cell.appreciation_rate,
            result.summary.owner_final,
            result.summary.renter_final,
            result.summary.relative_difference_pct,
            result
                .crossover_year
                .map_or(String::new(), |y| y.to_string()),
        )?;
    }
    println!("Output written to {}", output_path);

    // Quick console summary
    let renter_wins = results
        .iter()
        .filter(|(_, r)| r.summary.outcome == Outcome::RenterAhead)
        .count();
    println!(
        "\nRenter ends ahead in {}/{} scenarios over {} years",
        renter_wins,
        results.len(),
        base_scenario().horizon_years
    );
    if let Some((cell, result)) = results
        .iter()
        .max_by(|a, b| {
            a.1.summary
                .relative_difference_pct
                .total_cmp(&b.1.summary.relative_difference_pct)
        })
    {
        println!(
            "Best renter case: return {:.1}%, appreciation {:.1}% -> {:+.1}%",
            cell.investment_return * 100.0,
            cell.appreciation_rate * 100.0,
            result.summary.relative_difference_pct
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
