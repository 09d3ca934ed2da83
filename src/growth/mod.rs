//! Capital growth with periodic contributions and compound interest

mod annuity;
mod report;
mod schedule;

pub use annuity::present_value;
pub use report::{GrowthReport, InflationAdjusted, ReportOptions, TaxOnGains};
pub use schedule::{
    Compounding, ContributionFrequency, ContributionTiming, GrowthParameters, GrowthPoint,
};
