use super::answers::{
    BuyerType, DeterminationAnswers, FinancingType, LenderAmlStatus, PropertyType,
};
use super::exemptions::ExemptionSetKind;
use super::{DeterminationVerdict, IncompleteAnswers};
use crate::workflows::reporting::domain::PartyRole;

struct CompleteAnswers<'a> {
    property_type: PropertyType,
    intent_to_build_residential: bool,
    financing: FinancingType,
    lender_aml_status: Option<LenderAmlStatus>,
    buyer_type: BuyerType,
    is_statutory_trust: bool,
    answers: &'a DeterminationAnswers,
}

fn require_complete(answers: &DeterminationAnswers) -> Result<CompleteAnswers<'_>, IncompleteAnswers> {
    let mut missing = Vec::new();

    if answers.property_type.is_none() {
        missing.push("property_type");
    }
    if let Some(property) = answers.property_type {
        if !property.is_residential() && answers.intent_to_build_residential.is_none() {
            missing.push("intent_to_build_residential");
        }
    }
    if answers.financing.is_none() {
        missing.push("financing");
    }
    if answers.financing == Some(FinancingType::Financed) && answers.lender_aml_status.is_none() {
        missing.push("lender_aml_status");
    }
    if answers.buyer_type.is_none() {
        missing.push("buyer_type");
    }
    if answers.buyer_type == Some(BuyerType::Trust) && answers.is_statutory_trust.is_none() {
        missing.push("is_statutory_trust");
    }

    if !missing.is_empty() {
        return Err(IncompleteAnswers { missing });
    }

    Ok(CompleteAnswers {
        property_type: answers.property_type.unwrap_or(PropertyType::Residential),
        intent_to_build_residential: answers.intent_to_build_residential.unwrap_or(false),
        financing: answers.financing.unwrap_or(FinancingType::Cash),
        lender_aml_status: answers.lender_aml_status,
        buyer_type: answers.buyer_type.unwrap_or(BuyerType::Individual),
        is_statutory_trust: answers.is_statutory_trust.unwrap_or(false),
        answers,
    })
}

fn exempt(code: &str, reason: String, evaluated_set: Option<ExemptionSetKind>) -> DeterminationVerdict {
    DeterminationVerdict {
        is_reportable: false,
        reason,
        exemption_code: Some(code.to_string()),
        required_parties: Vec::new(),
        evaluated_set,
        lender_aml_unknown: false,
    }
}

/// Evaluate in mandated order, short-circuiting on the first exemption so the
/// reasoning cites the first disqualifying condition.
pub(super) fn evaluate(
    answers: &DeterminationAnswers,
) -> Result<DeterminationVerdict, IncompleteAnswers> {
    let complete = require_complete(answers)?;

    // 1. Property use: non-residential with no residential construction planned.
    if !complete.property_type.is_residential() && !complete.intent_to_build_residential {
        return Ok(exempt(
            "NON_RESIDENTIAL",
            "non-residential property with no intent to build residential housing".to_string(),
            None,
        ));
    }

    // 2. Financing by a lender with a confirmed AML program. An unverified
    // lender does not exempt; the verdict carries a warning flag instead.
    let mut lender_aml_unknown = false;
    if complete.financing == FinancingType::Financed {
        match complete.lender_aml_status {
            Some(LenderAmlStatus::HasProgram) => {
                return Ok(exempt(
                    "FINANCED_WITH_AML_LENDER",
                    "financed by a lender maintaining an AML/SAR program".to_string(),
                    None,
                ));
            }
            Some(LenderAmlStatus::Unknown) => lender_aml_unknown = true,
            Some(LenderAmlStatus::NoProgram) | None => {}
        }
    }

    // 3. Individual buyers are never reportable, whatever else was answered.
    if complete.buyer_type == BuyerType::Individual {
        return Ok(exempt(
            "INDIVIDUAL_BUYER",
            "the transferee is an individual".to_string(),
            None,
        ));
    }

    // 4./5. Buyer exemption checklist. A statutory trust is evaluated against
    // the entity set because the law treats it as an entity.
    let evaluate_entity_set =
        complete.buyer_type == BuyerType::Entity || complete.is_statutory_trust;

    if evaluate_entity_set {
        if let Some(exemption) = complete.answers.entity_exemptions.first() {
            return Ok(exempt(
                exemption.code(),
                format!("the transferee entity is a {}", exemption.description()),
                Some(ExemptionSetKind::Entity),
            ));
        }
    } else if let Some(exemption) = complete.answers.trust_exemptions.first() {
        return Ok(exempt(
            exemption.code(),
            format!("the transferee trust qualifies: {}", exemption.description()),
            Some(ExemptionSetKind::Trust),
        ));
    }

    // 6. Transaction-shaped exemptions come last.
    if let Some(exemption) = complete.answers.transaction_exemptions.first() {
        return Ok(exempt(
            exemption.code(),
            format!("exempt transaction shape: {}", exemption.description()),
            Some(ExemptionSetKind::Transaction),
        ));
    }

    let mut required_parties = vec![PartyRole::Transferee, PartyRole::Transferor];
    if evaluate_entity_set {
        required_parties.push(PartyRole::BeneficialOwner);
    } else {
        required_parties.extend([
            PartyRole::Trustee,
            PartyRole::Settlor,
            PartyRole::Beneficiary,
        ]);
    }

    let reason = if lender_aml_unknown {
        "no exemption applies; transaction is reportable (lender AML program status unverified)"
            .to_string()
    } else {
        "no exemption applies; transaction is reportable".to_string()
    };

    Ok(DeterminationVerdict {
        is_reportable: true,
        reason,
        exemption_code: None,
        required_parties,
        evaluated_set: Some(if evaluate_entity_set {
            ExemptionSetKind::Entity
        } else {
            ExemptionSetKind::Trust
        }),
        lender_aml_unknown,
    })
}
