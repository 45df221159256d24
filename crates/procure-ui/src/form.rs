//! New-item form state machine.
//!
//! ```text
//! Idle --mount--> LoadingReferenceData --lists settled--> Ready
//! Ready --submit--> Submitting --response--> Ready
//! any --unmount--> Idle
//! ```
//!
//! Reference data loads and the confirmation hide timer are fenced by
//! generation counters: a mount that was superseded or unmounted never
//! writes its lists, and a timer only hides the confirmation it was
//! scheduled for.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use procure_core::{Category, DraftField, ItemDraft, Location, ProcureError, SubmissionReceipt};
use procure_data::{FetchError, ProcureGateway};
use procure_observability::{RequestId, StructuredLogger};
use serde::Serialize;
use thiserror::Error;

/// How long the confirmation stays visible after a successful submission.
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(3);

/// Text of the confirmation banner.
pub const CONFIRMATION_MESSAGE: &str = "Your request is submitted.";

/// Form lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Idle,
    LoadingReferenceData,
    Ready,
    Submitting,
}

/// When the draft is cleared after a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    /// After every submission, accepted or not.
    #[default]
    Always,
    /// Only after an accepted submission.
    OnSuccess,
}

/// Identifies one shown confirmation.
pub type ConfirmationToken = u64;

/// Snapshot of the form's view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub phase: FormPhase,
    pub draft: ItemDraft,
    pub locations: Vec<Location>,
    pub categories: Vec<Category>,
    confirmation: Option<ConfirmationToken>,
}

impl FormState {
    fn new() -> Self {
        Self {
            phase: FormPhase::Idle,
            draft: ItemDraft::default(),
            locations: Vec::new(),
            categories: Vec::new(),
            confirmation: None,
        }
    }

    pub fn confirmation_visible(&self) -> bool {
        self.confirmation.is_some()
    }

    pub fn selected_category(&self) -> &str {
        self.draft.selected_category()
    }

    pub fn selected_location(&self) -> &str {
        self.draft.selected_location()
    }
}

/// Errors returned to the caller of a form action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The edit or the draft as a whole was rejected.
    #[error(transparent)]
    Invalid(#[from] ProcureError),

    /// A submission is still in flight.
    #[error("A submission is already in progress")]
    Busy,

    /// The form is not mounted, or its reference data is still loading.
    #[error("The form is not ready to submit ({phase:?})")]
    NotReady { phase: FormPhase },
}

/// How a mount ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Ready { locations: usize, categories: usize },
    /// Unmounted or remounted before the lists arrived.
    Discarded,
}

/// How a submission ended. Failures are already logged.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted {
        receipt: SubmissionReceipt,
        token: ConfirmationToken,
    },
    Rejected {
        error: FetchError,
    },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

#[derive(Debug)]
struct Inner {
    state: FormState,
    generation: u64,
    last_token: ConfirmationToken,
}

/// The new-item form. Clones share state.
#[derive(Debug, Clone)]
pub struct ItemForm {
    gateway: ProcureGateway,
    logger: StructuredLogger,
    reset_policy: ResetPolicy,
    window: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl ItemForm {
    pub fn new(gateway: ProcureGateway) -> Self {
        Self {
            gateway,
            logger: StructuredLogger::discard(),
            reset_policy: ResetPolicy::default(),
            window: CONFIRMATION_WINDOW,
            inner: Arc::new(Mutex::new(Inner {
                state: FormState::new(),
                generation: 0,
                last_token: 0,
            })),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger.component("item-form");
        self
    }

    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    /// Override the confirmation window (the default is three seconds).
    pub fn with_confirmation_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> FormState {
        self.lock().state.clone()
    }

    pub fn phase(&self) -> FormPhase {
        self.lock().state.phase
    }

    /// Start with a fresh draft and load both reference lists concurrently.
    ///
    /// Each list degrades to empty on its own; a failure is logged and does
    /// not affect the other list.
    pub async fn mount(&self) -> MountOutcome {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = FormState::new();
            inner.state.phase = FormPhase::LoadingReferenceData;
            inner.generation
        };
        let log = self.logger.for_request(RequestId::generate());

        let load_locations = async {
            let result = self.gateway.locations().await;
            let locations = degrade(&log, "locations", result);
            let count = locations.len();
            self.apply(generation, |state| state.locations = locations)
                .then_some(count)
        };
        let load_categories = async {
            let result = self.gateway.categories().await;
            let categories = degrade(&log, "categories", result);
            let count = categories.len();
            self.apply(generation, |state| state.categories = categories)
                .then_some(count)
        };

        match futures::join!(load_locations, load_categories) {
            (Some(locations), Some(categories))
                if self.apply(generation, |state| state.phase = FormPhase::Ready) =>
            {
                log.info_builder("reference data loaded")
                    .field_u64("locations", locations as u64)
                    .field_u64("categories", categories as u64)
                    .emit();
                MountOutcome::Ready {
                    locations,
                    categories,
                }
            }
            _ => {
                log.debug("reference data arrived after unmount, discarded");
                MountOutcome::Discarded
            }
        }
    }

    /// Leave the form. Outstanding reference data loads are dropped.
    pub fn unmount(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = FormState::new();
    }

    fn apply(&self, generation: u64, update: impl FnOnce(&mut FormState)) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        update(&mut inner.state);
        true
    }

    /// Apply a raw input value to the field with form name `name`.
    pub fn set_field(&self, name: &str, value: &str) -> Result<(), FormError> {
        self.lock().state.draft.set_by_name(name, value)?;
        Ok(())
    }

    /// Apply a raw input value to a field.
    pub fn set(&self, field: DraftField, value: &str) -> Result<(), FormError> {
        self.lock().state.draft.set(field, value)?;
        Ok(())
    }

    pub fn select_category(&self, id: &str) {
        self.lock().state.draft.select_category(id);
    }

    pub fn select_location(&self, name: &str) {
        self.lock().state.draft.select_location(name);
    }

    /// Submit the draft.
    ///
    /// Only a `Ready` form submits. Missing required fields fail fast
    /// without a request. An accepted submission shows the confirmation and
    /// schedules its hide timer on the current tokio runtime. The draft is reset according to the form's
    /// [`ResetPolicy`].
    pub async fn submit(&self) -> Result<SubmitOutcome, FormError> {
        let (draft, generation) = {
            let mut inner = self.lock();
            match inner.state.phase {
                FormPhase::Ready => {}
                FormPhase::Submitting => return Err(FormError::Busy),
                phase => return Err(FormError::NotReady { phase }),
            }
            inner.state.draft.validate()?;
            inner.state.phase = FormPhase::Submitting;
            (inner.state.draft.clone(), inner.generation)
        };
        let log = self.logger.for_request(RequestId::generate());

        let result = self.gateway.submit(&draft).await;

        let mut inner = self.lock();
        let mounted = inner.generation == generation;
        if mounted {
            inner.state.phase = FormPhase::Ready;
        }

        let outcome = match result {
            Ok(receipt) => {
                inner.last_token += 1;
                let token = inner.last_token;
                if mounted {
                    inner.state.confirmation = Some(token);
                    inner.state.draft = ItemDraft::default();
                }
                log.info_builder("submission accepted")
                    .field("supplier", draft.supplier_name.as_str())
                    .field("message", receipt.message.clone().unwrap_or_default())
                    .emit();
                SubmitOutcome::Accepted { receipt, token }
            }
            Err(error) => {
                if mounted {
                    inner.state.confirmation = None;
                    if self.reset_policy == ResetPolicy::Always {
                        inner.state.draft = ItemDraft::default();
                    }
                }
                log.error_builder("submission failed")
                    .field("supplier", draft.supplier_name.as_str())
                    .field("error", error.to_string())
                    .emit();
                SubmitOutcome::Rejected { error }
            }
        };
        drop(inner);

        if let SubmitOutcome::Accepted { token, .. } = &outcome {
            if mounted {
                self.schedule_hide(*token);
            }
        }
        Ok(outcome)
    }

    fn schedule_hide(&self, token: ConfirmationToken) {
        let deadline = tokio::time::Instant::now() + self.window;
        let form = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            form.hide_confirmation(token);
        });
    }

    /// Hide the confirmation if `token` is the one currently shown. Returns
    /// whether anything was hidden.
    pub fn hide_confirmation(&self, token: ConfirmationToken) -> bool {
        let mut inner = self.lock();
        if inner.state.confirmation == Some(token) {
            inner.state.confirmation = None;
            true
        } else {
            false
        }
    }
}

fn degrade<T>(log: &StructuredLogger, list: &str, result: Result<Vec<T>, FetchError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        log.error_builder(format!("failed to load {}", list))
            .field("list", list)
            .field("error", e.to_string())
            .emit();
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use procure_data::{Endpoints, FetchClient, StubReply, StubTransport};
    use procure_observability::LogLevel;
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn url(path: &str) -> String {
        format!("{}/api/v1/{}", BASE, path)
    }

    fn reference_stub() -> StubTransport {
        StubTransport::new()
            .on_get(url("countries"), StubReply::json(200, json!({"countries": ["India", "Japan"]})))
            .on_get(
                url("categories"),
                StubReply::json(200, json!({"categories": [{"id": 1, "name": "Laptops"}, {"id": 2, "name": "Chairs"}]})),
            )
    }

    fn form(stub: StubTransport) -> (ItemForm, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        let gateway = ProcureGateway::new(
            FetchClient::with_transport(stub.clone()),
            Endpoints::with_base(BASE),
        );
        (ItemForm::new(gateway), stub)
    }

    fn fill(form: &ItemForm) {
        form.set_field("supplierName", "Acme Corp").unwrap();
        form.set_field("productInfo", "14in laptops").unwrap();
        form.set_field("quantity", "12").unwrap();
        form.set_field("timeline", "2026-12-01").unwrap();
        form.set_field("requiredFor", "New hires").unwrap();
        form.select_category("1");
        form.select_location("India");
    }

    #[tokio::test]
    async fn test_mount_loads_both_lists() {
        let (form, _) = form(reference_stub());
        assert_eq!(form.phase(), FormPhase::Idle);

        let outcome = form.mount().await;
        assert_eq!(outcome, MountOutcome::Ready { locations: 2, categories: 2 });

        let state = form.snapshot();
        assert_eq!(state.phase, FormPhase::Ready);
        assert_eq!(state.locations, vec![Location::new("India"), Location::new("Japan")]);
        assert_eq!(state.categories[1], Category::new("2", "Chairs"));
    }

    #[tokio::test]
    async fn test_malformed_categories_degrade_independently() {
        let (logger, buffer) = StructuredLogger::memory();
        let (form, _) = form(
            StubTransport::new()
                .on_get(url("countries"), StubReply::json(200, json!({"countries": ["Peru"]})))
                .on_get(url("categories"), StubReply::text(200, "{categories farmers:[]}")),
        );
        let form = form.with_logger(logger);

        let outcome = form.mount().await;
        assert_eq!(outcome, MountOutcome::Ready { locations: 1, categories: 0 });
        assert!(form.snapshot().categories.is_empty());
        assert!(buffer.contains(LogLevel::Error, "failed to load categories"));
    }

    #[tokio::test]
    async fn test_non_ok_and_shape_mismatch_degrade() {
        let (form, _) = form(
            StubTransport::new()
                .on_get(url("countries"), StubReply::text(500, "oops"))
                .on_get(url("categories"), StubReply::json(200, json!({"items": []}))),
        );
        assert_eq!(
            form.mount().await,
            MountOutcome::Ready { locations: 0, categories: 0 }
        );
        assert_eq!(form.phase(), FormPhase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reference_data_after_unmount_is_discarded() {
        let (form, stub) = form(
            StubTransport::new()
                .on_get(
                    url("countries"),
                    StubReply::json(200, json!({"countries": ["India"]})).delayed(Duration::from_secs(1)),
                )
                .on_get(
                    url("categories"),
                    StubReply::json(200, json!({"categories": [{"id": 1, "name": "Laptops"}]}))
                        .delayed(Duration::from_secs(1)),
                ),
        );

        let mounting = form.clone();
        let handle = tokio::spawn(async move { mounting.mount().await });
        while stub.requests().len() < 2 {
            tokio::task::yield_now().await;
        }
        form.unmount();

        assert_eq!(handle.await.unwrap(), MountOutcome::Discarded);
        let state = form.snapshot();
        assert_eq!(state.phase, FormPhase::Idle);
        assert!(state.locations.is_empty());
        assert!(state.categories.is_empty());
    }

    #[tokio::test]
    async fn test_selection_is_derived_from_draft() {
        let (form, _) = form(reference_stub());
        form.mount().await;

        form.select_category("2");
        form.select_location("Japan");
        let state = form.snapshot();
        assert_eq!(state.selected_category(), "2");
        assert_eq!(state.draft.category.as_ref().map(|c| c.as_str()), Some("2"));
        assert_eq!(state.selected_location(), "Japan");

        form.set_field("category", "").unwrap();
        assert_eq!(form.snapshot().selected_category(), "");
    }

    #[tokio::test]
    async fn test_rejected_edit_leaves_draft_unchanged() {
        let (form, _) = form(reference_stub());
        form.set_field("quantity", "5").unwrap();

        let err = form.set_field("quantity", "-2").unwrap_err();
        assert!(matches!(err, FormError::Invalid(ProcureError::InvalidQuantity(_))));
        assert!(form.set_field("timeline", "next week").is_err());
        assert!(form.set_field("colour", "red").is_err());
        assert_eq!(form.snapshot().draft.quantity, Some(5));
    }

    #[tokio::test]
    async fn test_missing_required_fields_block_submission() {
        let (form, stub) = form(reference_stub());
        form.mount().await;
        form.set_field("supplierName", "Acme").unwrap();

        let err = form.submit().await.unwrap_err();
        match err {
            FormError::Invalid(ProcureError::MissingFields(fields)) => {
                assert!(fields.contains(&DraftField::Quantity));
                assert!(!fields.contains(&DraftField::SupplierName));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(stub.requests_to(&url("submit")).is_empty());
        assert_eq!(form.phase(), FormPhase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_requires_ready_phase() {
        let (form, stub) = form(
            StubTransport::new()
                .on_get(
                    url("countries"),
                    StubReply::json(200, json!({"countries": ["India"]})).delayed(Duration::from_secs(1)),
                )
                .on_get(
                    url("categories"),
                    StubReply::json(200, json!({"categories": [{"id": 1, "name": "Laptops"}]})),
                )
                .on_post(
                    url("submit"),
                    StubReply::json(200, json!({"message": "ok", "id": 1})).delayed(Duration::from_secs(5)),
                ),
        );
        fill(&form);
        assert_eq!(
            form.submit().await.unwrap_err(),
            FormError::NotReady { phase: FormPhase::Idle }
        );

        let mounting = form.clone();
        let handle = tokio::spawn(async move { mounting.mount().await });
        while stub.requests().len() < 2 {
            tokio::task::yield_now().await;
        }
        fill(&form);
        assert_eq!(
            form.submit().await.unwrap_err(),
            FormError::NotReady { phase: FormPhase::LoadingReferenceData }
        );
        assert!(stub.requests_to(&url("submit")).is_empty());

        handle.await.unwrap();
        fill(&form);
        let submitting = form.clone();
        let first = tokio::spawn(async move { submitting.submit().await });
        while stub.requests_to(&url("submit")).is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(form.submit().await.unwrap_err(), FormError::Busy);

        assert!(first.await.unwrap().unwrap().is_accepted());
        assert_eq!(stub.requests_to(&url("submit")).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_visible_for_exactly_three_seconds() {
        let (form, stub) = form(reference_stub().on_post(
            url("submit"),
            StubReply::json(200, json!({"message": "Form submission successful", "id": 1})),
        ));
        form.mount().await;
        fill(&form);

        let outcome = form.submit().await.unwrap();
        assert!(outcome.is_accepted());

        let body = stub.requests_to(&url("submit"))[0].json_body().unwrap();
        assert_eq!(body["supplierName"], json!("Acme Corp"));
        assert_eq!(body["category"], json!("1"));
        assert_eq!(body["timeline"], json!("2026-12-01"));

        let state = form.snapshot();
        assert!(state.confirmation_visible());
        assert_eq!(state.draft, ItemDraft::default());

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(form.snapshot().confirmation_visible());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!form.snapshot().confirmation_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_older_timer_does_not_hide_newer_confirmation() {
        let (form, _) = form(reference_stub().on_post(
            url("submit"),
            StubReply::json(200, json!({"message": "ok"})),
        ));
        form.mount().await;

        fill(&form);
        form.submit().await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        fill(&form);
        form.submit().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(form.snapshot().confirmation_visible());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!form.snapshot().confirmation_visible());
    }

    #[tokio::test]
    async fn test_failed_submission_resets_without_confirmation() {
        let (logger, buffer) = StructuredLogger::memory();
        let (form, _) = form(
            reference_stub()
                .on_post(url("submit"), StubReply::text(500, "internal error"))
                .on_post(url("submit"), StubReply::network_error("connection reset")),
        );
        let form = form.with_logger(logger);
        form.mount().await;

        for _ in 0..2 {
            fill(&form);
            let outcome = form.submit().await.unwrap();
            assert!(!outcome.is_accepted());

            let state = form.snapshot();
            assert!(!state.confirmation_visible());
            assert_eq!(state.draft, ItemDraft::default());
            assert_eq!(state.phase, FormPhase::Ready);
        }
        assert_eq!(buffer.at_level(LogLevel::Error).len(), 2);
    }

    #[tokio::test]
    async fn test_on_success_policy_keeps_draft_after_failure() {
        let (form, _) = form(
            reference_stub().on_post(url("submit"), StubReply::json(200, json!({"error": "could not save"}))),
        );
        let form = form.with_reset_policy(ResetPolicy::OnSuccess);
        form.mount().await;
        fill(&form);

        let outcome = form.submit().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                error: FetchError::ServiceError("could not save".to_string())
            }
        );
        assert_eq!(form.snapshot().draft.supplier_name, "Acme Corp");
    }

    #[test]
    fn test_hide_confirmation_requires_matching_token() {
        let (form, _) = form(StubTransport::new());
        form.lock().state.confirmation = Some(4);
        assert!(!form.hide_confirmation(3));
        assert!(form.snapshot().confirmation_visible());
        assert!(form.hide_confirmation(4));
        assert!(!form.snapshot().confirmation_visible());
    }
}
