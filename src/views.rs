//! Read projections over the interest ledger.
//!
//! Both views are derived on demand from the stored listings. Totals are
//! recomputed from the listing's current price every time.
use crate::identity::Identity;
use crate::interest::Interest;
use crate::listing::{Listing, Owner, Unit};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// An interest as seen by the owner of the listing it targets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedInterest {
    #[serde(flatten)]
    pub interest: Interest,
    pub listing_id: String,
    pub listing_name: String,
    pub unit: Unit,
    pub price_per_unit: u64,
    pub total_price: u64,
}

/// An interest as seen by the buyer who sent it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SentInterest {
    #[serde(flatten)]
    pub interest: Interest,
    pub listing_id: String,
    pub listing_name: String,
    pub unit: Unit,
    #[serde(flatten)]
    pub owner: Owner,
    pub price_per_unit: u64,
    pub total_price: u64,
}

pub trait InterestView {
    fn interest(&self) -> &Interest;
}

impl InterestView for ReceivedInterest {
    fn interest(&self) -> &Interest {
        &self.interest
    }
}

impl InterestView for SentInterest {
    fn interest(&self) -> &Interest {
        &self.interest
    }
}

pub fn received_by(listings: &[Listing], owner: &Identity) -> Vec<ReceivedInterest> {
    listings
        .iter()
        .filter(|l| l.is_owned_by(owner))
        .flat_map(|l| {
            l.interests.iter().map(move |i| ReceivedInterest {
                interest: i.clone(),
                listing_id: l.id.clone(),
                listing_name: l.name.clone(),
                unit: l.unit,
                price_per_unit: l.price_per_unit,
                total_price: l.total_price_for(i),
            })
        })
        .collect()
}

pub fn sent_by(listings: &[Listing], requester: &Identity) -> Vec<SentInterest> {
    listings
        .iter()
        .filter_map(|l| l.interest_from(requester.email()).map(|i| (l, i)))
        .map(|(l, i)| SentInterest {
            interest: i.clone(),
            listing_id: l.id.clone(),
            listing_name: l.name.clone(),
            unit: l.unit,
            owner: l.owner.clone(),
            price_per_unit: l.price_per_unit,
            total_price: l.total_price_for(i),
        })
        .collect()
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InterestSort {
    /// Newest first
    #[default]
    Latest,
    /// Lexicographic on the status name: accepted, pending, rejected
    Status,
}

/// Stable in-place sort; applying it twice gives the same order.
pub fn sort_interests<V: InterestView>(items: &mut [V], sort: InterestSort) {
    match sort {
        InterestSort::Latest => items.sort_by_key(|v| Reverse(v.interest().created_at)),
        InterestSort::Status => items.sort_by_key(|v| v.interest().status.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interest::{self, Decision, InterestRequest, InterestStatus};
    use crate::listing::{Category, ListingDraft, TimeStamp};

    fn listing(id: &str, owner: &Identity, price: u64) -> Listing {
        ListingDraft::new()
            .set_name(id)
            .set_category(Category::Fruit)
            .set_price_per_unit(price)
            .set_unit(Unit::Kg)
            .set_quantity(100)
            .set_description("Alphonso")
            .set_location("Ratnagiri")
            .set_image("https://img.example/mango.jpg")
            .validate_and_finalise(owner, id.into(), TimeStamp::new())
            .unwrap()
    }

    #[test]
    fn views_partition_by_role() {
        let owner = Identity::new("owner@farm.in", None).unwrap();
        let other = Identity::new("other@farm.in", None).unwrap();
        let buyer = Identity::new("buyer@mandi.in", Some("Meena")).unwrap();

        let mut mine = listing("crop_1mine", &owner, 120);
        let mut theirs = listing("crop_1theirs", &other, 80);
        interest::submit(
            &mut mine,
            &buyer,
            &InterestRequest::new(3, None),
            "interest_1a".into(),
            TimeStamp::new_with(2025, 1, 1, 0, 0, 0),
        )
        .unwrap();
        interest::submit(
            &mut theirs,
            &buyer,
            &InterestRequest::new(4, None),
            "interest_1b".into(),
            TimeStamp::new_with(2025, 1, 2, 0, 0, 0),
        )
        .unwrap();
        let listings = vec![mine, theirs];

        let received = received_by(&listings, &owner);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].listing_id, "crop_1mine");
        assert_eq!(received[0].total_price, 360);

        let mut sent = sent_by(&listings, &buyer);
        assert_eq!(sent.len(), 2);
        sort_interests(&mut sent, InterestSort::Latest);
        assert_eq!(sent[0].listing_id, "crop_1theirs");
        assert_eq!(sent[0].owner.owner_email, "other@farm.in");
        assert_eq!(sent[0].total_price, 320);
    }

    #[test]
    fn status_sort_is_lexicographic() {
        let owner = Identity::new("owner@farm.in", None).unwrap();
        let mut l = listing("crop_1l", &owner, 10);
        for (n, email) in ["a@x.in", "b@x.in", "c@x.in"].iter().enumerate() {
            let who = Identity::new(email, None).unwrap();
            interest::submit(
                &mut l,
                &who,
                &InterestRequest::new(1, None),
                format!("interest_{n}"),
                TimeStamp::new(),
            )
            .unwrap();
        }
        interest::decide(&mut l, "interest_0", Decision::Reject, &owner).unwrap();
        interest::decide(&mut l, "interest_2", Decision::Accept, &owner).unwrap();

        let mut received = received_by(&[l], &owner);
        sort_interests(&mut received, InterestSort::Status);

        let statuses: Vec<_> = received.iter().map(|r| r.interest.status).collect();
        assert_eq!(
            statuses,
            vec![
                InterestStatus::Accepted,
                InterestStatus::Pending,
                InterestStatus::Rejected
            ]
        );
    }

    #[test]
    fn sent_view_serialises_flat() {
        let owner = Identity::new("owner@farm.in", Some("Ravi")).unwrap();
        let buyer = Identity::new("buyer@mandi.in", None).unwrap();
        let mut l = listing("crop_1l", &owner, 50);
        interest::submit(
            &mut l,
            &buyer,
            &InterestRequest::new(10, None),
            "interest_1a".into(),
            TimeStamp::new(),
        )
        .unwrap();

        let json = serde_json::to_value(&sent_by(&[l], &buyer)[0]).unwrap();
        assert_eq!(json["ownerName"], "Ravi");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["totalPrice"], 500);
        assert_eq!(json["unit"], "kg");
    }
}
