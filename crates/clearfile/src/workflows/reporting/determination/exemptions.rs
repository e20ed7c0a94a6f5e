use serde::{Deserialize, Serialize};

/// Which checklist produced the outcome. Statutory trusts are legally
/// entities, so their verdicts record the entity set; transaction-shaped
/// exemptions record their own set regardless of buyer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExemptionSetKind {
    Entity,
    Trust,
    Transaction,
}

/// Exempt transferee categories for entity buyers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityExemption {
    SecuritiesReportingIssuer,
    GovernmentalAuthority,
    Bank,
    CreditUnion,
    DepositoryInstitutionHoldingCompany,
    MoneyServicesBusiness,
    BrokerDealer,
    SecuritiesExchangeOrClearingAgency,
    OtherExchangeActRegisteredEntity,
    InvestmentCompany,
    InvestmentAdviser,
    InsuranceCompany,
    StateLicensedInsuranceProducer,
    CommodityExchangeActRegisteredEntity,
    PublicUtility,
}

impl EntityExemption {
    pub const fn code(self) -> &'static str {
        match self {
            EntityExemption::SecuritiesReportingIssuer => "ENTITY_SECURITIES_REPORTING_ISSUER",
            EntityExemption::GovernmentalAuthority => "ENTITY_GOVERNMENTAL_AUTHORITY",
            EntityExemption::Bank => "ENTITY_BANK",
            EntityExemption::CreditUnion => "ENTITY_CREDIT_UNION",
            EntityExemption::DepositoryInstitutionHoldingCompany => {
                "ENTITY_DEPOSITORY_HOLDING_COMPANY"
            }
            EntityExemption::MoneyServicesBusiness => "ENTITY_MONEY_SERVICES_BUSINESS",
            EntityExemption::BrokerDealer => "ENTITY_BROKER_DEALER",
            EntityExemption::SecuritiesExchangeOrClearingAgency => {
                "ENTITY_SECURITIES_EXCHANGE_OR_CLEARING_AGENCY"
            }
            EntityExemption::OtherExchangeActRegisteredEntity => {
                "ENTITY_OTHER_EXCHANGE_ACT_REGISTERED"
            }
            EntityExemption::InvestmentCompany => "ENTITY_INVESTMENT_COMPANY",
            EntityExemption::InvestmentAdviser => "ENTITY_INVESTMENT_ADVISER",
            EntityExemption::InsuranceCompany => "ENTITY_INSURANCE_COMPANY",
            EntityExemption::StateLicensedInsuranceProducer => {
                "ENTITY_STATE_LICENSED_INSURANCE_PRODUCER"
            }
            EntityExemption::CommodityExchangeActRegisteredEntity => {
                "ENTITY_COMMODITY_EXCHANGE_ACT_REGISTERED"
            }
            EntityExemption::PublicUtility => "ENTITY_PUBLIC_UTILITY",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            EntityExemption::SecuritiesReportingIssuer => {
                "issuer of securities registered with the SEC"
            }
            EntityExemption::GovernmentalAuthority => "governmental authority",
            EntityExemption::Bank => "regulated bank",
            EntityExemption::CreditUnion => "federally insured credit union",
            EntityExemption::DepositoryInstitutionHoldingCompany => {
                "depository institution holding company"
            }
            EntityExemption::MoneyServicesBusiness => "registered money services business",
            EntityExemption::BrokerDealer => "registered broker or dealer in securities",
            EntityExemption::SecuritiesExchangeOrClearingAgency => {
                "securities exchange or clearing agency"
            }
            EntityExemption::OtherExchangeActRegisteredEntity => {
                "other Exchange Act registered entity"
            }
            EntityExemption::InvestmentCompany => "registered investment company",
            EntityExemption::InvestmentAdviser => "registered investment adviser",
            EntityExemption::InsuranceCompany => "state-regulated insurance company",
            EntityExemption::StateLicensedInsuranceProducer => {
                "state-licensed insurance producer"
            }
            EntityExemption::CommodityExchangeActRegisteredEntity => {
                "Commodity Exchange Act registered entity"
            }
            EntityExemption::PublicUtility => "regulated public utility",
        }
    }
}

/// Exempt categories for non-statutory trust buyers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustExemption {
    TrusteeRegulatedInstitution,
    SecuritiesReportingIssuerTrust,
    CharitableTrust,
    CourtSupervisedTrust,
}

impl TrustExemption {
    pub const fn code(self) -> &'static str {
        match self {
            TrustExemption::TrusteeRegulatedInstitution => "TRUST_TRUSTEE_REGULATED_INSTITUTION",
            TrustExemption::SecuritiesReportingIssuerTrust => {
                "TRUST_SECURITIES_REPORTING_ISSUER"
            }
            TrustExemption::CharitableTrust => "TRUST_CHARITABLE",
            TrustExemption::CourtSupervisedTrust => "TRUST_COURT_SUPERVISED",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            TrustExemption::TrusteeRegulatedInstitution => {
                "trustee is a regulated bank or trust company"
            }
            TrustExemption::SecuritiesReportingIssuerTrust => {
                "trust is itself a securities reporting issuer"
            }
            TrustExemption::CharitableTrust => "charitable or split-interest trust",
            TrustExemption::CourtSupervisedTrust => "trust administered under court supervision",
        }
    }
}

/// Transaction-shaped exemptions, independent of the buyer's legal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionExemption {
    DeathOrInheritance,
    Divorce,
    Bankruptcy,
    CourtOrder,
    NoConsiderationSettlorToTrust,
    QualifiedIntermediaryExchange,
}

impl TransactionExemption {
    pub const fn code(self) -> &'static str {
        match self {
            TransactionExemption::DeathOrInheritance => "TX_DEATH_OR_INHERITANCE",
            TransactionExemption::Divorce => "TX_DIVORCE",
            TransactionExemption::Bankruptcy => "TX_BANKRUPTCY",
            TransactionExemption::CourtOrder => "TX_COURT_ORDER",
            TransactionExemption::NoConsiderationSettlorToTrust => {
                "TX_NO_CONSIDERATION_SETTLOR_TO_TRUST"
            }
            TransactionExemption::QualifiedIntermediaryExchange => {
                "TX_QUALIFIED_INTERMEDIARY_EXCHANGE"
            }
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            TransactionExemption::DeathOrInheritance => "transfer resulting from death",
            TransactionExemption::Divorce => "transfer incident to divorce or dissolution",
            TransactionExemption::Bankruptcy => "transfer supervised by a bankruptcy estate",
            TransactionExemption::CourtOrder => "transfer ordered by a court",
            TransactionExemption::NoConsiderationSettlorToTrust => {
                "no-consideration transfer by a settlor to their trust"
            }
            TransactionExemption::QualifiedIntermediaryExchange => {
                "transfer through a qualified intermediary exchange"
            }
        }
    }
}
