use bigdecimal::{BigDecimal, Zero};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CapitalContribution, CapitalSummary, CreateCapitalContribution, FlowType};

pub fn create(
    portfolio_id: Option<Uuid>,
    input: CreateCapitalContribution,
) -> Result<CapitalContribution, AppError> {
    if input.amount <= BigDecimal::zero() {
        return Err(AppError::Validation("Amount must be > 0".into()));
    }

    let contribution = CapitalContribution::new(portfolio_id, input);
    info!(
        "Recorded {:?} of {} for portfolio {:?}",
        contribution.flow_type, contribution.amount, contribution.portfolio_id
    );
    Ok(contribution)
}

/// Totals the contributions belonging to `portfolio_id`; other portfolios'
/// contributions are ignored.
pub fn summarize(portfolio_id: Option<Uuid>, contributions: &[CapitalContribution]) -> CapitalSummary {
    let mut owned: Vec<CapitalContribution> = contributions
        .iter()
        .filter(|c| c.portfolio_id == portfolio_id)
        .cloned()
        .collect();
    owned.sort_by_key(|c| (c.contribution_date, c.created_at));

    let (total_deposits, total_withdrawals) = owned.iter().fold(
        (BigDecimal::zero(), BigDecimal::zero()),
        |(deposits, withdrawals), c| match c.flow_type {
            FlowType::Deposit => (deposits + &c.amount, withdrawals),
            FlowType::Withdrawal => (deposits, withdrawals + &c.amount),
        },
    );

    CapitalSummary {
        portfolio_id,
        net_capital: &total_deposits - &total_withdrawals,
        total_deposits,
        total_withdrawals,
        contributions: owned,
    }
}
