//! Identifier generation

use crate::error::MarketError;
use bech32::Bech32m;
use uuid7::uuid7;

pub const LISTING_HRP: &str = "crop_";
pub const INTEREST_HRP: &str = "interest_";

// construct a time ordered unique id then encode using bech32m
pub fn new_uuid_to_bech32(hrp: &str) -> Result<String, MarketError> {
    let hrp = bech32::Hrp::parse(hrp).map_err(|e| MarketError::Identifier(e.to_string()))?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())
        .map_err(|e| MarketError::Identifier(e.to_string()))?;
    Ok(encode)
}

pub fn new_listing_id() -> Result<String, MarketError> {
    new_uuid_to_bech32(LISTING_HRP)
}

pub fn new_interest_id() -> Result<String, MarketError> {
    new_uuid_to_bech32(INTEREST_HRP)
}
