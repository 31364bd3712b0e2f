//! Gain projections: dollar-cost averaging and portfolio-level predictions.

mod dca;
mod market_conditions;
mod portfolio;

pub use dca::{project_dca, DcaInput, DcaProjection, PaymentFrequency};
pub use market_conditions::MarketConditions;
pub use portfolio::{
    EtfStats, Holding, HorizonPrediction, PortfolioMetrics, PortfolioModel, PortfolioPredictions,
    PortfolioRequest, RetirementPrediction,
};
