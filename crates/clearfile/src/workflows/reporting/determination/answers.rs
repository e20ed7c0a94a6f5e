use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::exemptions::{EntityExemption, TransactionExemption, TrustExemption};

/// Use of the property being transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Residential,
    Commercial,
    VacantLand,
}

impl PropertyType {
    pub const fn is_residential(self) -> bool {
        matches!(self, PropertyType::Residential)
    }
}

/// How the purchase is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingType {
    Cash,
    Financed,
}

/// Whether the financing lender maintains an AML/SAR program. `unknown` is a
/// legitimate answer: the transaction stays reportable and the caller must
/// surface a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LenderAmlStatus {
    HasProgram,
    NoProgram,
    Unknown,
}

/// Legal form of the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    Individual,
    Entity,
    Trust,
}

/// Questionnaire answer set consumed by the determination engine.
///
/// Fields arrive from the wizard snapshot and may be unset; the engine
/// reports every missing required answer before evaluating anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeterminationAnswers {
    pub property_type: Option<PropertyType>,
    /// Required only when the property is non-residential.
    #[serde(default)]
    pub intent_to_build_residential: Option<bool>,
    pub financing: Option<FinancingType>,
    /// Required only when the purchase is financed.
    #[serde(default)]
    pub lender_aml_status: Option<LenderAmlStatus>,
    pub buyer_type: Option<BuyerType>,
    /// Required only when the buyer is a trust.
    #[serde(default)]
    pub is_statutory_trust: Option<bool>,
    #[serde(default)]
    pub entity_exemptions: Vec<EntityExemption>,
    #[serde(default)]
    pub trust_exemptions: Vec<TrustExemption>,
    #[serde(default)]
    pub transaction_exemptions: Vec<TransactionExemption>,
    /// Used by the caller to derive the filing deadline; not part of the
    /// reportability rules themselves.
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
}
