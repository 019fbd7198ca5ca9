use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Deposit,
    Withdrawal,
}

// Money moved into or out of a portfolio by its owner. Contributions without a
// portfolio id predate per-portfolio tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalContribution {
    pub id: uuid::Uuid,
    pub portfolio_id: Option<uuid::Uuid>,
    pub flow_type: FlowType,
    pub amount: BigDecimal,
    pub contribution_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCapitalContribution {
    pub flow_type: FlowType,
    pub amount: BigDecimal,
    pub contribution_date: NaiveDate,
    pub description: Option<String>,
}

impl CapitalContribution {
    pub fn new(portfolio_id: Option<uuid::Uuid>, data: CreateCapitalContribution) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            portfolio_id,
            flow_type: data.flow_type,
            amount: data.amount,
            contribution_date: data.contribution_date,
            description: data.description,
            created_at: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalSummary {
    pub portfolio_id: Option<uuid::Uuid>,
    #[serde(serialize_with = "decimal::as_number")]
    pub total_deposits: BigDecimal,
    #[serde(serialize_with = "decimal::as_number")]
    pub total_withdrawals: BigDecimal,
    #[serde(serialize_with = "decimal::as_number")]
    pub net_capital: BigDecimal,
    pub contributions: Vec<CapitalContribution>,
}
