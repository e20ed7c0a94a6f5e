//! Integration scenarios for the transaction reporting workflow, driven
//! end-to-end through the public service facade and HTTP router.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use serde_json::json;

    use clearfile::workflows::reporting::{
        AuditEntry, AuditError, AuditSink, BuyerType, DeterminationAnswers, FinancingType,
        MockFilingAdapter, NotificationEvent, NotificationOutbox, OutboxError, PartyData,
        PartyEntityType, PartyLinkSpec, PartyRole, PropertyType, ReportAggregate, ReportId,
        ReportIntake, ReportService, ReportingConfig, ReportingError, StoreError,
    };
    // Re-exported so the scenarios module gets the trait methods through the glob.
    pub(super) use clearfile::workflows::reporting::ReportStore;

    #[derive(Default)]
    pub(super) struct MemoryStore {
        aggregates: Mutex<HashMap<ReportId, ReportAggregate>>,
    }

    impl ReportStore for MemoryStore {
        fn insert(&self, aggregate: ReportAggregate) -> Result<(), StoreError> {
            let mut guard = self.aggregates.lock().expect("lock");
            if guard.contains_key(&aggregate.report.report_id) {
                return Err(StoreError::Conflict);
            }
            guard.insert(aggregate.report.report_id.clone(), aggregate);
            Ok(())
        }

        fn fetch(&self, id: &ReportId) -> Result<Option<ReportAggregate>, StoreError> {
            let guard = self.aggregates.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn find_report_by_token(&self, token: &str) -> Result<Option<ReportId>, StoreError> {
            let guard = self.aggregates.lock().expect("lock");
            Ok(guard
                .values()
                .find(|aggregate| aggregate.links.iter().any(|link| link.token == token))
                .map(|aggregate| aggregate.report.report_id.clone()))
        }

        fn update(
            &self,
            id: &ReportId,
            op: &mut dyn FnMut(&mut ReportAggregate) -> Result<(), ReportingError>,
        ) -> Result<ReportAggregate, ReportingError> {
            let mut guard = self.aggregates.lock().expect("lock");
            let current = guard.get(id).ok_or(StoreError::NotFound)?;
            let mut draft = current.clone();
            op(&mut draft)?;
            guard.insert(id.clone(), draft.clone());
            Ok(draft)
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryOutbox {
        events: Mutex<Vec<NotificationEvent>>,
    }

    impl MemoryOutbox {
        pub(super) fn events(&self) -> Vec<NotificationEvent> {
            self.events.lock().expect("lock").clone()
        }
    }

    impl NotificationOutbox for MemoryOutbox {
        fn enqueue(&self, event: NotificationEvent) -> Result<(), OutboxError> {
            self.events.lock().expect("lock").push(event);
            Ok(())
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryAudit {
        entries: Mutex<Vec<AuditEntry>>,
    }

    impl MemoryAudit {
        pub(super) fn entries(&self) -> Vec<AuditEntry> {
            self.entries.lock().expect("lock").clone()
        }
    }

    impl AuditSink for MemoryAudit {
        fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
            self.entries.lock().expect("lock").push(entry);
            Ok(())
        }
    }

    pub(super) type WorkflowService =
        ReportService<MemoryStore, MemoryOutbox, MemoryAudit, MockFilingAdapter>;

    pub(super) fn build_service(
        adapter: MockFilingAdapter,
    ) -> (
        Arc<WorkflowService>,
        Arc<MemoryStore>,
        Arc<MemoryOutbox>,
        Arc<MemoryAudit>,
    ) {
        let store = Arc::new(MemoryStore::default());
        let outbox = Arc::new(MemoryOutbox::default());
        let audit = Arc::new(MemoryAudit::default());
        let service = Arc::new(ReportService::new(
            store.clone(),
            outbox.clone(),
            audit.clone(),
            Arc::new(adapter),
            ReportingConfig::default(),
        ));
        (service, store, outbox, audit)
    }

    pub(super) fn intake() -> ReportIntake {
        ReportIntake {
            property_address: "900 Grand Ave, Des Moines, IA".to_string(),
            preparer_email: "escrow@titleco.example".to_string(),
            closing_date: Some(NaiveDate::from_ymd_opt(2025, 9, 10).expect("valid date")),
        }
    }

    pub(super) fn entity_answers() -> DeterminationAnswers {
        DeterminationAnswers {
            property_type: Some(PropertyType::Residential),
            financing: Some(FinancingType::Cash),
            buyer_type: Some(BuyerType::Entity),
            closing_date: Some(NaiveDate::from_ymd_opt(2025, 9, 10).expect("valid date")),
            ..DeterminationAnswers::default()
        }
    }

    pub(super) fn trust_answers() -> DeterminationAnswers {
        DeterminationAnswers {
            property_type: Some(PropertyType::Residential),
            financing: Some(FinancingType::Cash),
            buyer_type: Some(BuyerType::Trust),
            is_statutory_trust: Some(false),
            closing_date: Some(NaiveDate::from_ymd_opt(2025, 9, 10).expect("valid date")),
            ..DeterminationAnswers::default()
        }
    }

    pub(super) fn individual_answers() -> DeterminationAnswers {
        DeterminationAnswers {
            property_type: Some(PropertyType::Residential),
            financing: Some(FinancingType::Cash),
            buyer_type: Some(BuyerType::Individual),
            ..DeterminationAnswers::default()
        }
    }

    pub(super) fn spec(role: PartyRole, entity_type: PartyEntityType, name: &str) -> PartyLinkSpec {
        PartyLinkSpec {
            role,
            entity_type,
            display_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        }
    }

    pub(super) fn individual_data(name: &str) -> PartyData {
        let mut data = PartyData::new();
        data.insert("legal_name".to_string(), json!(name));
        data.insert("date_of_birth".to_string(), json!("1975-11-03"));
        data.insert("residential_address".to_string(), json!("77 High St"));
        data.insert(
            "contact_email".to_string(),
            json!(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        );
        data
    }

    pub(super) fn entity_data() -> PartyData {
        let mut data = PartyData::new();
        data.insert("legal_name".to_string(), json!("Grand Ave Ventures LLC"));
        data.insert("ein".to_string(), json!("98-7654321"));
        data.insert("formation_state".to_string(), json!("DE"));
        data.insert("authorized_signer".to_string(), json!("Riley Park"));
        data
    }

    pub(super) fn trust_data() -> PartyData {
        let mut data = PartyData::new();
        data.insert("trust_name".to_string(), json!("Park Family Trust"));
        data.insert("trust_type".to_string(), json!("revocable"));
        data.insert("execution_date".to_string(), json!("2011-05-20"));
        data.insert("trustee_name".to_string(), json!("Riley Park"));
        data
    }
}

mod scenarios {
    use super::common::*;
    use clearfile::workflows::reporting::{
        DemoOutcome, MockFilingAdapter, NotificationKind, PartyEntityType, PartyRole, ReportStatus,
    };

    #[test]
    fn entity_purchase_reaches_filed_with_receipt() {
        let (service, store, outbox, audit) = build_service(MockFilingAdapter::accepting());

        let report = service.create_report(intake()).expect("report created");
        let verdict = service
            .run_determination(&report.report_id, &entity_answers())
            .expect("determination runs");
        assert!(verdict.is_reportable);

        let links = service
            .issue_party_links(
                &report.report_id,
                vec![
                    spec(PartyRole::Transferee, PartyEntityType::Entity, "Riley Park"),
                    spec(
                        PartyRole::Transferor,
                        PartyEntityType::Individual,
                        "Dana Voss",
                    ),
                    spec(
                        PartyRole::BeneficialOwner,
                        PartyEntityType::Individual,
                        "Riley Park",
                    ),
                ],
                None,
            )
            .expect("links issued");

        for link in &links {
            let data = match link.role {
                PartyRole::Transferee => entity_data(),
                PartyRole::Transferor => individual_data("Dana Voss"),
                _ => individual_data("Riley Park"),
            };
            service.save_party(&link.token, data).expect("party saved");
            service.submit_party(&link.token).expect("party submitted");
        }

        let check = service
            .ready_check(&report.report_id)
            .expect("ready check runs");
        assert!(check.ready);

        let filing = service
            .file_report(&report.report_id)
            .expect("filing dispatched");
        assert_eq!(filing.status, "accepted");

        let stored = store
            .fetch(&report.report_id)
            .expect("fetch")
            .expect("present");
        assert_eq!(stored.report.status, ReportStatus::Filed);
        assert!(stored.report.receipt_id.is_some());

        let kinds: Vec<_> = outbox.events().iter().map(|event| event.kind).collect();
        assert_eq!(
            kinds
                .iter()
                .filter(|kind| **kind == NotificationKind::PartyInvite)
                .count(),
            3
        );
        assert!(kinds.contains(&NotificationKind::FilingReceipt));

        let actions: Vec<_> = audit
            .entries()
            .iter()
            .map(|entry| entry.action.clone())
            .collect();
        assert!(actions.contains(&"report_created".to_string()));
        assert!(actions.contains(&"determination_run".to_string()));
        assert!(actions.contains(&"filing_submitted".to_string()));
    }

    #[test]
    fn individual_purchase_parks_exempt_until_reopened() {
        let (service, store, outbox, _) = build_service(MockFilingAdapter::accepting());

        let report = service.create_report(intake()).expect("report created");
        let verdict = service
            .run_determination(&report.report_id, &individual_answers())
            .expect("determination runs");
        assert!(!verdict.is_reportable);
        assert_eq!(verdict.exemption_code.as_deref(), Some("INDIVIDUAL_BUYER"));

        let stored = store
            .fetch(&report.report_id)
            .expect("fetch")
            .expect("present");
        assert_eq!(stored.report.status, ReportStatus::Exempt);
        assert!(outbox.events().is_empty());

        service
            .reopen_determination(&report.report_id)
            .expect("reopen succeeds");
        let verdict = service
            .run_determination(&report.report_id, &entity_answers())
            .expect("re-run succeeds");
        assert!(verdict.is_reportable);
    }

    #[test]
    fn rejection_corrections_and_retry_recover_the_filing() {
        let adapter = MockFilingAdapter::with_default(DemoOutcome::Reject {
            code: "E-BO-017".to_string(),
            message: "beneficial owner identifier mismatch".to_string(),
        });
        let (service, store, outbox, _) = build_service(adapter);

        let report = service.create_report(intake()).expect("report created");
        service
            .run_determination(&report.report_id, &entity_answers())
            .expect("determination runs");
        let links = service
            .issue_party_links(
                &report.report_id,
                vec![
                    spec(PartyRole::Transferee, PartyEntityType::Entity, "Riley Park"),
                    spec(
                        PartyRole::Transferor,
                        PartyEntityType::Individual,
                        "Dana Voss",
                    ),
                    spec(
                        PartyRole::BeneficialOwner,
                        PartyEntityType::Individual,
                        "Riley Park",
                    ),
                ],
                None,
            )
            .expect("links issued");

        for link in &links {
            let data = match link.role {
                PartyRole::Transferee => entity_data(),
                _ => individual_data("Dana Voss"),
            };
            service.save_party(&link.token, data).expect("party saved");
            service.submit_party(&link.token).expect("party submitted");
        }

        let filing = service
            .file_report(&report.report_id)
            .expect("attempt completes");
        assert_eq!(filing.status, "rejected");
        assert_eq!(filing.rejection_code.as_deref(), Some("E-BO-017"));

        // The preparer pulls the flagged party back for corrections.
        let stored = store
            .fetch(&report.report_id)
            .expect("fetch")
            .expect("present");
        let owner = stored
            .parties
            .iter()
            .find(|party| party.role == PartyRole::BeneficialOwner)
            .expect("owner present");
        service
            .request_corrections(
                &report.report_id,
                &owner.party_id,
                Some("identifier mismatch".to_string()),
            )
            .expect("corrections requested");

        let owner_link = links
            .iter()
            .find(|link| link.role == PartyRole::BeneficialOwner)
            .expect("owner link");
        service
            .save_party(&owner_link.token, individual_data("Riley Park"))
            .expect("party saved");
        service
            .submit_party(&owner_link.token)
            .expect("party resubmitted");

        let retried = service
            .retry_filing(&report.report_id)
            .expect("retry completes");
        assert_eq!(retried.attempts, 2);
        assert_eq!(retried.status, "rejected");

        let alerts = outbox
            .events()
            .into_iter()
            .filter(|event| event.kind == NotificationKind::InternalAlert)
            .count();
        assert_eq!(alerts, 2);
    }

    #[test]
    fn trust_purchase_collects_trust_roles() {
        let (service, store, _, _) = build_service(MockFilingAdapter::accepting());

        let report = service.create_report(intake()).expect("report created");
        let verdict = service
            .run_determination(&report.report_id, &trust_answers())
            .expect("determination runs");
        assert!(verdict.is_reportable);
        assert!(verdict.required_parties.contains(&PartyRole::Trustee));

        let links = service
            .issue_party_links(
                &report.report_id,
                vec![
                    spec(PartyRole::Transferee, PartyEntityType::Trust, "Riley Park"),
                    spec(
                        PartyRole::Transferor,
                        PartyEntityType::Individual,
                        "Dana Voss",
                    ),
                    spec(PartyRole::Trustee, PartyEntityType::Individual, "Riley Park"),
                    spec(PartyRole::Settlor, PartyEntityType::Individual, "Lee Park"),
                    spec(
                        PartyRole::Beneficiary,
                        PartyEntityType::Individual,
                        "Morgan Park",
                    ),
                ],
                None,
            )
            .expect("links issued");
        assert_eq!(links.len(), 5);

        for link in &links {
            let data = match link.role {
                PartyRole::Transferee => trust_data(),
                PartyRole::Transferor => individual_data("Dana Voss"),
                PartyRole::Trustee => individual_data("Riley Park"),
                PartyRole::Settlor => individual_data("Lee Park"),
                _ => individual_data("Morgan Park"),
            };
            service.save_party(&link.token, data).expect("party saved");
            service.submit_party(&link.token).expect("party submitted");
        }

        let stored = store
            .fetch(&report.report_id)
            .expect("fetch")
            .expect("present");
        assert_eq!(stored.report.status, ReportStatus::ReadyToFile);

        let filing = service
            .file_report(&report.report_id)
            .expect("filing dispatched");
        assert_eq!(filing.status, "accepted");
    }
}
