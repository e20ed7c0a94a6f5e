use crate::infra::{parse_date, InMemoryAuditSink, InMemoryOutbox, InMemoryReportStore};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use clearfile::error::AppError;
use clearfile::workflows::reporting::{
    determine, BuyerType, DeterminationAnswers, FinancingType, MockFilingAdapter, PartyData,
    PartyEntityType, PartyLinkSpec, PartyRole, PropertyType, ReportIntake, ReportService,
    ReportingConfig,
};
use serde_json::json;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "demo-hooks")]
use clearfile::workflows::reporting::DemoOutcome;

#[derive(Args, Debug)]
pub(crate) struct DetermineArgs {
    /// Path to a JSON file with the determination questionnaire answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum ScriptedOutcome {
    #[default]
    Accept,
    Reject,
    NeedsReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum DemoBuyer {
    #[default]
    Entity,
    Trust,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Closing date for the demo transaction (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) closing_date: Option<NaiveDate>,
    /// Legal form of the demo buyer
    #[arg(long, value_enum, default_value_t)]
    pub(crate) buyer: DemoBuyer,
    /// Scripted outcome for the first filing attempt
    #[arg(long, value_enum, default_value_t)]
    pub(crate) outcome: ScriptedOutcome,
}

pub(crate) fn run_determine(args: DetermineArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.answers)?;
    let answers: DeterminationAnswers = serde_json::from_str(&raw)
        .map_err(|err| std::io::Error::new(ErrorKind::InvalidData, err))?;

    match determine(&answers) {
        Ok(verdict) => {
            let rendered = serde_json::to_string_pretty(&verdict)
                .unwrap_or_else(|_| verdict.reason.clone());
            println!("{rendered}");
            Ok(())
        }
        Err(incomplete) => {
            println!("Answers incomplete; still needed:");
            for field in &incomplete.missing {
                println!("  - {field}");
            }
            Ok(())
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        closing_date,
        buyer,
        outcome,
    } = args;

    let closing_date =
        closing_date.unwrap_or_else(|| chrono::Local::now().date_naive());

    println!("Transaction reporting demo");

    let store = Arc::new(InMemoryReportStore::default());
    let outbox = Arc::new(InMemoryOutbox::default());
    let audit = Arc::new(InMemoryAuditSink::default());
    let service = ReportService::new(
        store,
        outbox.clone(),
        audit.clone(),
        Arc::new(MockFilingAdapter::accepting()),
        ReportingConfig::default(),
    );

    let report = service.create_report(ReportIntake {
        property_address: "418 Linden Ave, Des Moines, IA".to_string(),
        preparer_email: "closer@titleco.example".to_string(),
        closing_date: Some(closing_date),
    })?;
    println!("- Opened report {} ({})", report.report_id.0, report.status);

    let answers = demo_answers(buyer, closing_date);
    service.save_wizard(
        &report.report_id,
        6,
        json!({ "questionnaire": "completed" }),
    )?;
    let verdict = service.run_determination(&report.report_id, &answers)?;
    println!("- Determination: {}", verdict.reason);
    if !verdict.is_reportable {
        println!("  Report is exempt; nothing further to collect or file.");
        return Ok(());
    }
    println!(
        "  Required roles: {}",
        verdict
            .required_parties
            .iter()
            .map(|role| role.label())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let specs = demo_party_specs(&verdict.required_parties, buyer);
    let links = service.issue_party_links(&report.report_id, specs, None)?;
    println!("- Issued {} party links", links.len());

    for link in &links {
        let view = service.party_by_token(&link.token)?;
        service.save_party(&link.token, demo_party_data(link.role, buyer))?;
        let receipt = service.submit_party(&link.token)?;
        println!(
            "  {} ({}) submitted, confirmation {}",
            view.display_name, view.role, receipt.confirmation_id
        );
    }

    let check = service.ready_check(&report.report_id)?;
    println!("- Ready to file: {}", check.ready);
    for item in &check.missing {
        println!("  missing: {}", item.message);
    }

    #[cfg(feature = "demo-hooks")]
    if outcome != ScriptedOutcome::Accept {
        let scripted = match outcome {
            ScriptedOutcome::Reject => DemoOutcome::Reject {
                code: "E-DEMO-001".to_string(),
                message: "scripted rejection for the demo".to_string(),
            },
            _ => DemoOutcome::NeedsReview {
                message: "scripted manual review for the demo".to_string(),
            },
        };
        service.set_filing_outcome(&report.report_id, scripted)?;
        println!("- Armed a scripted {:?} outcome for the first attempt", outcome);
    }
    #[cfg(not(feature = "demo-hooks"))]
    let _ = outcome;

    let mut filing = service.file_report(&report.report_id)?;
    println!(
        "- Filing attempt {}: {}",
        filing.attempts, filing.status
    );
    if let Some(message) = &filing.rejection_message {
        println!("  {}", message);
    }

    if filing.receipt_id.is_none() {
        filing = service.retry_filing(&report.report_id)?;
        println!(
            "- Filing attempt {}: {}",
            filing.attempts, filing.status
        );
    }

    if let Some(receipt) = &filing.receipt_id {
        println!("- Regulator receipt: {receipt}");
    }

    println!("\nNotification outbox ({} queued)", outbox.events().len());
    for event in outbox.events() {
        println!("  - [{}] {} -> {}", event.kind.label(), event.subject, event.recipient);
    }

    println!("\nAudit trail ({} entries)", audit.entries().len());
    for entry in audit.entries() {
        println!("  - {} by {}", entry.action, entry.actor.label());
    }

    Ok(())
}

fn demo_answers(buyer: DemoBuyer, closing_date: NaiveDate) -> DeterminationAnswers {
    DeterminationAnswers {
        property_type: Some(PropertyType::Residential),
        financing: Some(FinancingType::Cash),
        buyer_type: Some(match buyer {
            DemoBuyer::Entity => BuyerType::Entity,
            DemoBuyer::Trust => BuyerType::Trust,
        }),
        is_statutory_trust: match buyer {
            DemoBuyer::Trust => Some(false),
            DemoBuyer::Entity => None,
        },
        closing_date: Some(closing_date),
        ..DeterminationAnswers::default()
    }
}

fn demo_party_specs(required: &[PartyRole], buyer: DemoBuyer) -> Vec<PartyLinkSpec> {
    required
        .iter()
        .map(|role| {
            let (entity_type, name) = match role {
                PartyRole::Transferee => match buyer {
                    DemoBuyer::Entity => (PartyEntityType::Entity, "Linden Holdings LLC"),
                    DemoBuyer::Trust => (PartyEntityType::Trust, "Park Family Trust"),
                },
                PartyRole::Transferor => (PartyEntityType::Individual, "Dana Voss"),
                PartyRole::BeneficialOwner => (PartyEntityType::Individual, "Casey Moran"),
                PartyRole::Trustee => (PartyEntityType::Individual, "Riley Park"),
                PartyRole::Settlor => (PartyEntityType::Individual, "Lee Park"),
                PartyRole::Beneficiary => (PartyEntityType::Individual, "Morgan Park"),
            };
            PartyLinkSpec {
                role: *role,
                entity_type,
                display_name: name.to_string(),
                email: format!(
                    "{}@example.com",
                    name.to_lowercase().replace(' ', ".")
                ),
            }
        })
        .collect()
}

fn demo_party_data(role: PartyRole, buyer: DemoBuyer) -> PartyData {
    let mut data = PartyData::new();
    if role == PartyRole::Transferee {
        match buyer {
            DemoBuyer::Entity => {
                data.insert("legal_name".to_string(), json!("Linden Holdings LLC"));
                data.insert("ein".to_string(), json!("12-3456789"));
                data.insert("formation_state".to_string(), json!("IA"));
                data.insert("authorized_signer".to_string(), json!("Casey Moran"));
            }
            DemoBuyer::Trust => {
                data.insert("trust_name".to_string(), json!("Park Family Trust"));
                data.insert("trust_type".to_string(), json!("revocable"));
                data.insert("execution_date".to_string(), json!("2011-05-20"));
                data.insert("trustee_name".to_string(), json!("Riley Park"));
            }
        }
        return data;
    }

    data.insert("legal_name".to_string(), json!("Demo Participant"));
    data.insert("date_of_birth".to_string(), json!("1980-01-15"));
    data.insert("residential_address".to_string(), json!("77 High St"));
    data.insert("contact_email".to_string(), json!("party@example.com"));
    if role == PartyRole::BeneficialOwner {
        data.insert("ownership_percentage".to_string(), json!(100.0));
    }
    data
}
