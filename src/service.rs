//! Service layer API for listing and interest workflow operations
use crate::error::MarketError;
use crate::identity::Identity;
use crate::interest::{self, Decision, Interest, InterestRequest};
use crate::listing::{Listing, ListingDraft, ListingPatch, TimeStamp};
use crate::store::ListingStore;
use crate::utils;
use crate::views::{self, ReceivedInterest, SentInterest};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub id: String,
    pub removed_interests: usize,
}

pub struct MarketService {
    instance: Arc<sled::Db>,
    listings: ListingStore,
}

impl MarketService {
    pub fn new(instance: Arc<sled::Db>) -> Result<Self, MarketError> {
        let listings = ListingStore::open(&instance)?;
        Ok(Self {
            instance,
            listings,
        })
    }

    /// Publish a new listing owned by `owner`
    pub fn create_listing(
        &self,
        draft: &ListingDraft,
        owner: &Identity,
    ) -> Result<Listing, MarketError> {
        let listing =
            draft.validate_and_finalise(owner, utils::new_listing_id()?, TimeStamp::new())?;
        self.listings.insert(&listing)?;

        info!(listing_id = %listing.id, owner = owner.email(), "listing created");
        Ok(listing)
    }

    pub fn get_listing(&self, id: &str) -> Result<Listing, MarketError> {
        self.listings.get(id)
    }

    /// Every listing, in storage order
    pub fn list_listings(&self) -> Result<Vec<Listing>, MarketError> {
        self.listings.all()
    }

    pub fn listings_owned_by(&self, owner: &Identity) -> Result<Vec<Listing>, MarketError> {
        Ok(self
            .listings
            .all()?
            .into_iter()
            .filter(|l| l.is_owned_by(owner))
            .collect())
    }

    /// Merge `patch` into a listing. Owner only.
    pub fn update_listing(
        &self,
        id: &str,
        patch: &ListingPatch,
        actor: &Identity,
    ) -> Result<Listing, MarketError> {
        patch.validate()?;

        let ((), listing) = self
            .listings
            .mutate(id, |listing| {
                ensure_owner(listing, actor, "update")?;
                patch.apply(listing);
                Ok(())
            })
            .inspect_err(|e| warn!(listing_id = id, actor = actor.email(), error = %e, "update rejected"))?;

        info!(listing_id = id, "listing updated");
        Ok(listing)
    }

    /// Remove a listing together with its interests. Owner only.
    pub fn delete_listing(&self, id: &str, actor: &Identity) -> Result<Deleted, MarketError> {
        let removed = self
            .listings
            .remove_if(id, |listing| ensure_owner(listing, actor, "delete"))
            .inspect_err(|e| warn!(listing_id = id, actor = actor.email(), error = %e, "delete rejected"))?;

        info!(
            listing_id = id,
            interests = removed.interests.len(),
            "listing deleted"
        );
        Ok(Deleted {
            id: removed.id,
            removed_interests: removed.interests.len(),
        })
    }

    /// Register `requester`'s interest in a listing. The new entry is pending.
    pub fn submit_interest(
        &self,
        listing_id: &str,
        requester: &Identity,
        request: &InterestRequest,
    ) -> Result<Interest, MarketError> {
        // generated once so a retried swap reuses the same id and timestamp
        let interest_id = utils::new_interest_id()?;
        let created_at = TimeStamp::new();

        let (interest, _) = self
            .listings
            .mutate(listing_id, |listing| {
                interest::submit(
                    listing,
                    requester,
                    request,
                    interest_id.clone(),
                    created_at,
                )
            })
            .inspect_err(|e| {
                warn!(listing_id, requester = requester.email(), error = %e, "interest rejected")
            })?;

        info!(listing_id, interest_id = %interest.id, quantity = interest.quantity, "interest submitted");
        Ok(interest)
    }

    /// Accept or reject a pending interest. Owner only, once per interest.
    pub fn decide_interest(
        &self,
        listing_id: &str,
        interest_id: &str,
        decision: Decision,
        actor: &Identity,
    ) -> Result<Interest, MarketError> {
        let (interest, _) = self
            .listings
            .mutate(listing_id, |listing| {
                interest::decide(listing, interest_id, decision, actor)
            })
            .inspect_err(|e| {
                warn!(listing_id, interest_id, actor = actor.email(), error = %e, "decision rejected")
            })?;

        info!(
            listing_id,
            interest_id,
            status = interest.status.as_str(),
            "interest decided"
        );
        Ok(interest)
    }

    pub fn interests_received_by(
        &self,
        owner: &Identity,
    ) -> Result<Vec<ReceivedInterest>, MarketError> {
        Ok(views::received_by(&self.listings.all()?, owner))
    }

    pub fn interests_sent_by(
        &self,
        requester: &Identity,
    ) -> Result<Vec<SentInterest>, MarketError> {
        Ok(views::sent_by(&self.listings.all()?, requester))
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<(), MarketError> {
        self.listings.flush()?;
        self.instance.flush()?;
        Ok(())
    }
}

fn ensure_owner(listing: &Listing, actor: &Identity, action: &str) -> Result<(), MarketError> {
    if listing.is_owned_by(actor) {
        return Ok(());
    }
    Err(MarketError::Forbidden(format!(
        "only the owner may {action} listing {}",
        listing.id
    )))
}
