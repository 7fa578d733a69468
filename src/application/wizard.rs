//! Three-step payment submission workflow.
//!
//! ```text
//! Amount -> Buyer -> CardAndSeller --submit--> Submitting --> Result
//!    ^                                                          |
//!    +--------------------------- reset ------------------------+
//! ```
//!
//! Forward moves are gated on the current step's fields. Rejected moves leave
//! the state untouched and are reported as [`Transition::Rejected`]; they are
//! never errors.

use super::gateway::ApiGateway;
use crate::domain::payment::{PaymentRequest, PaymentResult};
use crate::domain::transaction::{Amount, BuyerInfo, CardInfo, SellerInfo};
use crate::error::ApiError;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Amount,
    Buyer,
    CardAndSeller,
}

impl WizardStep {
    pub fn index(&self) -> usize {
        match self {
            WizardStep::Amount => 0,
            WizardStep::Buyer => 1,
            WizardStep::CardAndSeller => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Amount => "Payment Details",
            WizardStep::Buyer => "Buyer Information",
            WizardStep::CardAndSeller => "Card & Seller Information",
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            WizardStep::Amount => Some(WizardStep::Buyer),
            WizardStep::Buyer => Some(WizardStep::CardAndSeller),
            WizardStep::CardAndSeller => None,
        }
    }

    fn previous(&self) -> Option<Self> {
        match self {
            WizardStep::Amount => None,
            WizardStep::Buyer => Some(WizardStep::Amount),
            WizardStep::CardAndSeller => Some(WizardStep::Buyer),
        }
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// The backend processed the payment (approved or declined).
    Completed(PaymentResult),
    /// The call itself failed.
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    Editing(WizardStep),
    Submitting,
    Result(PaymentOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    IncompleteStep,
    AtFirstStep,
    AtFinalStep,
    NotAtFinalStep,
    SubmissionInFlight,
    NotEditing,
    NoResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    Applied,
    Rejected(Rejection),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// One form edit. Each variant targets exactly one field of the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Amount(String),
    Currency(String),
    BuyerDocument(String),
    BuyerName(String),
    CardDisplay(String),
    CardToken(String),
    SellerDocument(String),
    SellerName(String),
}

/// The form as typed so far. Fields are raw text until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    pub amount: String,
    pub currency: String,
    pub buyer_info: BuyerInfo,
    pub card_info: CardInfo,
    pub seller_info: SellerInfo,
}

impl PaymentDraft {
    pub fn empty(default_currency: &str) -> Self {
        Self {
            amount: String::new(),
            currency: default_currency.to_string(),
            buyer_info: BuyerInfo::default(),
            card_info: CardInfo::default(),
            seller_info: SellerInfo::default(),
        }
    }

    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Amount(v) => self.amount = v,
            FieldUpdate::Currency(v) => self.currency = v,
            FieldUpdate::BuyerDocument(v) => self.buyer_info.document = v,
            FieldUpdate::BuyerName(v) => self.buyer_info.name = v,
            FieldUpdate::CardDisplay(v) => self.card_info.display = v,
            FieldUpdate::CardToken(v) => self.card_info.token = v,
            FieldUpdate::SellerDocument(v) => self.seller_info.document = v,
            FieldUpdate::SellerName(v) => self.seller_info.name = v,
        }
    }

    /// Whether every field required by `step` is filled in.
    ///
    /// The amount must also parse as a non-negative decimal.
    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        let filled = |s: &str| !s.trim().is_empty();
        match step {
            WizardStep::Amount => {
                filled(&self.amount)
                    && self.amount.parse::<Amount>().is_ok()
                    && filled(&self.currency)
            }
            WizardStep::Buyer => filled(&self.buyer_info.document) && filled(&self.buyer_info.name),
            WizardStep::CardAndSeller => {
                filled(&self.card_info.display)
                    && filled(&self.card_info.token)
                    && filled(&self.seller_info.document)
                    && filled(&self.seller_info.name)
            }
        }
    }

    /// Converts a fully valid draft into a wire request.
    pub fn to_request(&self) -> Option<PaymentRequest> {
        let complete = [WizardStep::Amount, WizardStep::Buyer, WizardStep::CardAndSeller]
            .iter()
            .all(|step| self.is_step_valid(*step));
        if !complete {
            return None;
        }

        Some(PaymentRequest {
            amount: self.amount.parse().ok()?,
            currency: self.currency.trim().to_string(),
            buyer_info: self.buyer_info.clone(),
            card_info: self.card_info.clone(),
            seller_info: self.seller_info.clone(),
        })
    }
}

/// Point-in-time copy of the wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSnapshot {
    pub state: WizardState,
    pub draft: PaymentDraft,
}

struct Inner {
    state: WizardState,
    draft: PaymentDraft,
}

impl Inner {
    fn abandon_submission(&mut self) {
        if self.state == WizardState::Submitting {
            warn!("Payment submission abandoned before a response arrived");
            self.state = WizardState::Result(PaymentOutcome::Failed(ApiError::unknown(
                "Payment submission was abandoned before a response arrived",
            )));
        }
    }
}

/// Held across the backend call of [`PaymentWizard::submit`]. If the submit
/// future is dropped first, moves the wizard from `Submitting` to a failed
/// result so it can be reset.
struct InFlight {
    inner: Arc<Mutex<Inner>>,
    armed: bool,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.inner.try_lock() {
            Ok(mut inner) => inner.abandon_submission(),
            Err(_) => {
                if let Ok(handle) = Handle::try_current() {
                    let inner = Arc::clone(&self.inner);
                    handle.spawn(async move { inner.lock().await.abandon_submission() });
                }
            }
        }
    }
}

/// Payment submission state machine.
///
/// Methods take `&self` so the wizard can be shared between the input side and
/// whatever renders it; the internal lock is never held across a backend call.
pub struct PaymentWizard {
    gateway: ApiGateway,
    default_currency: String,
    inner: Arc<Mutex<Inner>>,
}

impl PaymentWizard {
    pub fn new(gateway: ApiGateway, default_currency: impl Into<String>) -> Self {
        let default_currency = default_currency.into();
        let inner = Inner {
            state: WizardState::Editing(WizardStep::Amount),
            draft: PaymentDraft::empty(&default_currency),
        };

        Self {
            gateway,
            default_currency,
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub async fn snapshot(&self) -> WizardSnapshot {
        let inner = self.inner.lock().await;
        WizardSnapshot {
            state: inner.state.clone(),
            draft: inner.draft.clone(),
        }
    }

    pub async fn state(&self) -> WizardState {
        self.inner.lock().await.state.clone()
    }

    /// Edits one field. Only allowed while a data-entry step is active.
    pub async fn update(&self, update: FieldUpdate) -> Transition {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        match inner.state {
            WizardState::Editing(_) => {
                inner.draft.apply(update);
                Transition::Applied
            }
            WizardState::Submitting => Transition::Rejected(Rejection::SubmissionInFlight),
            WizardState::Result(_) => Transition::Rejected(Rejection::NotEditing),
        }
    }

    pub async fn advance(&self) -> Transition {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let step = match inner.state {
            WizardState::Editing(step) => step,
            WizardState::Submitting => return Transition::Rejected(Rejection::SubmissionInFlight),
            WizardState::Result(_) => return Transition::Rejected(Rejection::NotEditing),
        };

        if !inner.draft.is_step_valid(step) {
            return Transition::Rejected(Rejection::IncompleteStep);
        }
        match step.next() {
            Some(next) => {
                debug!("Wizard advanced to step {}", next.index());
                inner.state = WizardState::Editing(next);
                Transition::Applied
            }
            None => Transition::Rejected(Rejection::AtFinalStep),
        }
    }

    pub async fn back(&self) -> Transition {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        match inner.state {
            WizardState::Editing(step) => match step.previous() {
                Some(previous) => {
                    inner.state = WizardState::Editing(previous);
                    Transition::Applied
                }
                None => Transition::Rejected(Rejection::AtFirstStep),
            },
            WizardState::Submitting => Transition::Rejected(Rejection::SubmissionInFlight),
            WizardState::Result(_) => Transition::Rejected(Rejection::NotEditing),
        }
    }

    /// Sends the draft to the gateway and waits for the outcome.
    ///
    /// Only fires from the last step with every field valid. While a
    /// submission is pending further calls are rejected, so at most one
    /// payment is ever in flight. There is no automatic retry. Dropping the
    /// returned future mid-flight leaves a failed result behind.
    pub async fn submit(&self) -> Transition {
        let request = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            match inner.state {
                WizardState::Editing(WizardStep::CardAndSeller) => {}
                WizardState::Editing(_) => return Transition::Rejected(Rejection::NotAtFinalStep),
                WizardState::Submitting => {
                    return Transition::Rejected(Rejection::SubmissionInFlight);
                }
                WizardState::Result(_) => return Transition::Rejected(Rejection::NotEditing),
            }

            let Some(request) = inner.draft.to_request() else {
                return Transition::Rejected(Rejection::IncompleteStep);
            };
            inner.state = WizardState::Submitting;
            request
        };
        let mut in_flight = InFlight {
            inner: Arc::clone(&self.inner),
            armed: true,
        };

        let outcome = match self.gateway.create_payment(request).await {
            Ok(result) => {
                info!("Payment submission finished with status {}", result.status);
                PaymentOutcome::Completed(result)
            }
            Err(e) => PaymentOutcome::Failed(e),
        };

        let mut inner = self.inner.lock().await;
        in_flight.armed = false;
        inner.state = WizardState::Result(outcome);
        Transition::Applied
    }

    /// Returns to the first step with an empty draft. Only fires from a result.
    pub async fn reset(&self) -> Transition {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        if !matches!(inner.state, WizardState::Result(_)) {
            return Transition::Rejected(Rejection::NoResult);
        }

        inner.state = WizardState::Editing(WizardStep::Amount);
        inner.draft = PaymentDraft::empty(&self.default_currency);
        Transition::Applied
    }
}
