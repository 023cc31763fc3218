//! Interest ledger and its state machine.
//!
//! An interest is created `pending` and moves exactly once to `accepted` or
//! `rejected`, only at the hand of the listing owner:
//!
//! ```text
//! pending --accept--> accepted
//! pending --reject--> rejected
//! ```
//!
//! The functions here work on an in-memory [`Listing`]; the service runs them
//! inside a compare-and-swap on the stored document so each one is atomic.
use crate::error::{MarketError, ValidationError};
use crate::identity::{DEFAULT_REQUESTER_NAME, Identity};
use crate::listing::{Listing, TimeStamp};
use serde::{Deserialize, Serialize};

#[derive(
    minicbor::Encode,
    minicbor::Decode,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum InterestStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Accepted,
    #[n(2)]
    Rejected,
}

impl InterestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestStatus::Pending => "pending",
            InterestStatus::Accepted => "accepted",
            InterestStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InterestStatus::Pending)
    }
}

/// The owner's verdict on a pending interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl From<Decision> for InterestStatus {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Accept => InterestStatus::Accepted,
            Decision::Reject => InterestStatus::Rejected,
        }
    }
}

impl TryFrom<InterestStatus> for Decision {
    type Error = ValidationError;

    fn try_from(value: InterestStatus) -> Result<Self, Self::Error> {
        match value {
            InterestStatus::Accepted => Ok(Decision::Accept),
            InterestStatus::Rejected => Ok(Decision::Reject),
            InterestStatus::Pending => Err(ValidationError::PendingDecision),
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub user_email: String,
    #[n(2)]
    pub user_name: String,
    #[n(3)]
    pub quantity: u64,
    #[n(4)]
    pub message: String,
    #[n(5)]
    pub status: InterestStatus,
    #[n(6)]
    pub created_at: TimeStamp,
}

impl Interest {
    /// Apply the owner's decision. Only valid from `pending`.
    pub fn decide(&mut self, decision: Decision) -> Result<(), MarketError> {
        if self.status.is_terminal() {
            return Err(MarketError::InvalidState(format!(
                "interest {} is already {}",
                self.id,
                self.status.as_str()
            )));
        }
        self.status = decision.into();
        Ok(())
    }
}

/// Body of an interest submission.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestRequest {
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub message: Option<String>,
}

impl InterestRequest {
    pub fn new(quantity: u64, message: Option<&str>) -> Self {
        Self {
            quantity,
            message: message.map(str::to_owned),
        }
    }
}

/// Append a pending interest from `requester` to `listing`.
///
/// Checks run in a fixed order: owner first, then duplicates, then the quantity.
pub fn submit(
    listing: &mut Listing,
    requester: &Identity,
    request: &InterestRequest,
    id: String,
    created_at: TimeStamp,
) -> Result<Interest, MarketError> {
    if listing.is_owned_by(requester) {
        return Err(MarketError::Forbidden(
            "owners cannot send interest on their own listing".into(),
        ));
    }
    if listing.interest_from(requester.email()).is_some() {
        return Err(MarketError::Conflict(format!(
            "{} has already sent an interest for listing {}",
            requester.email(),
            listing.id
        )));
    }
    if request.quantity == 0 {
        return Err(ValidationError::NotPositive("quantity").into());
    }

    let interest = Interest {
        id,
        user_email: requester.email().to_owned(),
        user_name: requester.display_name_or(DEFAULT_REQUESTER_NAME),
        quantity: request.quantity,
        message: request
            .message
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned(),
        status: InterestStatus::Pending,
        created_at,
    };
    listing.interests.push(interest.clone());

    Ok(interest)
}

/// Transition one interest on `listing` according to the owner's decision.
pub fn decide(
    listing: &mut Listing,
    interest_id: &str,
    decision: Decision,
    actor: &Identity,
) -> Result<Interest, MarketError> {
    if !listing.is_owned_by(actor) {
        return Err(MarketError::Forbidden(format!(
            "only the owner of listing {} may decide on its interests",
            listing.id
        )));
    }
    let interest = listing
        .interests
        .iter_mut()
        .find(|i| i.id == interest_id)
        .ok_or_else(|| MarketError::NotFound(format!("interest {interest_id}")))?;

    interest.decide(decision)?;

    Ok(interest.clone())
}
