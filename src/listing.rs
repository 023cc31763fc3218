//! Crop listings: the stored document, the draft used to create one and the
//! patch used to edit one
use crate::error::{MarketError, ValidationError};
use crate::identity::{DEFAULT_OWNER_NAME, Identity};
use crate::interest::Interest;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    minicbor::Encode,
    minicbor::Decode,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub enum Category {
    #[n(0)]
    Vegetable,
    #[n(1)]
    Fruit,
    #[n(2)]
    Grain,
    #[n(3)]
    Pulse,
    #[n(4)]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vegetable => "Vegetable",
            Category::Fruit => "Fruit",
            Category::Grain => "Grain",
            Category::Pulse => "Pulse",
            Category::Other => "Other",
        }
    }
}

#[derive(
    minicbor::Encode,
    minicbor::Decode,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[n(0)]
    Kg,
    #[n(1)]
    Ton,
    #[n(2)]
    Bag,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Ton => "ton",
            Unit::Bag => "bag",
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    /// Panics on an out of range date, only meant for fixtures.
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

/// Owner details copied from the creator's identity. Not a reference to a user
/// record, so a later name change does not propagate.
#[derive(minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[n(0)]
    pub owner_email: String,
    #[n(1)]
    pub owner_name: String,
}

#[derive(minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    #[serde(rename = "type")]
    pub category: Category,
    #[n(3)]
    pub price_per_unit: u64,
    #[n(4)]
    pub unit: Unit,
    #[n(5)]
    pub quantity: u64,
    #[n(6)]
    pub description: String,
    #[n(7)]
    pub location: String,
    #[n(8)]
    pub image: String,
    #[n(9)]
    pub owner: Owner,
    #[n(10)]
    pub created_at: TimeStamp,
    #[n(11)]
    pub interests: Vec<Interest>,
}

impl Listing {
    pub fn is_owned_by(&self, who: &Identity) -> bool {
        who.is(&self.owner.owner_email)
    }

    pub fn interest(&self, interest_id: &str) -> Option<&Interest> {
        self.interests.iter().find(|i| i.id == interest_id)
    }

    pub fn interest_from(&self, email: &str) -> Option<&Interest> {
        self.interests.iter().find(|i| i.user_email == email)
    }

    /// Price of an interest at the listing's current price. Never stored.
    pub fn total_price_for(&self, interest: &Interest) -> u64 {
        interest.quantity.saturating_mul(self.price_per_unit)
    }
}

fn required_text(
    field: &'static str,
    value: &Option<String>,
) -> Result<String, ValidationError> {
    match value.as_deref().map(str::trim) {
        None => Err(ValidationError::MissingField(field)),
        Some("") => Err(ValidationError::Blank(field)),
        Some(v) => Ok(v.to_owned()),
    }
}

fn required_positive(field: &'static str, value: Option<u64>) -> Result<u64, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField(field)),
        Some(0) => Err(ValidationError::NotPositive(field)),
        Some(v) => Ok(v),
    }
}

// Used for constructing listings, everything optional until validated
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    name: Option<String>,
    #[serde(rename = "type")]
    category: Option<Category>,
    price_per_unit: Option<u64>,
    unit: Option<Unit>,
    quantity: Option<u64>,
    description: Option<String>,
    location: Option<String>,
    image: Option<String>,
}

impl ListingDraft {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }
    pub fn set_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
    pub fn set_price_per_unit(mut self, price: u64) -> Self {
        self.price_per_unit = Some(price);
        self
    }
    pub fn set_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }
    pub fn set_quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }
    pub fn set_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_owned());
        self
    }
    pub fn set_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_owned());
        self
    }

    /// Checks every field and, on success, stamps the owner, id and creation time.
    pub fn validate_and_finalise(
        &self,
        owner: &Identity,
        id: String,
        created_at: TimeStamp,
    ) -> Result<Listing, MarketError> {
        let name = required_text("name", &self.name)?;
        let category = self.category.ok_or(ValidationError::MissingField("type"))?;
        let price_per_unit = required_positive("pricePerUnit", self.price_per_unit)?;
        let unit = self.unit.ok_or(ValidationError::MissingField("unit"))?;
        let quantity = required_positive("quantity", self.quantity)?;
        let description = required_text("description", &self.description)?;
        let location = required_text("location", &self.location)?;
        let image = required_text("image", &self.image)?;

        Ok(Listing {
            id,
            name,
            category,
            price_per_unit,
            unit,
            quantity,
            description,
            location,
            image,
            owner: Owner {
                owner_email: owner.email().to_owned(),
                owner_name: owner.display_name_or(DEFAULT_OWNER_NAME),
            },
            created_at,
            interests: vec![],
        })
    }
}

/// Partial update of the owner editable fields. Absent fields are left alone.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<Category>,
    pub price_per_unit: Option<u64>,
    pub unit: Option<Unit>,
    pub quantity: Option<u64>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

impl ListingPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let texts = [
            ("name", &self.name),
            ("description", &self.description),
            ("location", &self.location),
            ("image", &self.image),
        ];
        for (field, value) in texts {
            if value.is_some() {
                required_text(field, value)?;
            }
        }
        if let Some(price) = self.price_per_unit {
            required_positive("pricePerUnit", Some(price))?;
        }
        if let Some(quantity) = self.quantity {
            required_positive("quantity", Some(quantity))?;
        }
        Ok(())
    }

    /// Merge into `listing`. Call [`ListingPatch::validate`] first.
    pub fn apply(&self, listing: &mut Listing) {
        let merge = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                *target = v.trim().to_owned();
            }
        };
        merge(&mut listing.name, &self.name);
        merge(&mut listing.description, &self.description);
        merge(&mut listing.location, &self.location);
        merge(&mut listing.image, &self.image);

        if let Some(category) = self.category {
            listing.category = category;
        }
        if let Some(price) = self.price_per_unit {
            listing.price_per_unit = price;
        }
        if let Some(unit) = self.unit {
            listing.unit = unit;
        }
        if let Some(quantity) = self.quantity {
            listing.quantity = quantity;
        }
    }
}
