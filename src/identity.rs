//! Caller identity as supplied by the upstream identity provider.
//!
//! Authentication happens before a request reaches this crate. Every core
//! operation receives an [`Identity`] explicitly and only performs
//! authorization checks against it.

use crate::error::MarketError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OWNER_NAME: &str = "Farmer";
pub const DEFAULT_REQUESTER_NAME: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    email: String,
    name: Option<String>,
}

impl Identity {
    /// Build an identity from an email and optional display name.
    ///
    /// A blank email means nobody is signed in and yields
    /// [`MarketError::Unauthenticated`]. Blank names are treated as absent.
    pub fn new(email: impl AsRef<str>, name: Option<&str>) -> Result<Self, MarketError> {
        let email = email.as_ref().trim();
        if email.is_empty() {
            return Err(MarketError::Unauthenticated);
        }
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);

        Ok(Self {
            email: email.to_owned(),
            name,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn display_name_or(&self, fallback: &str) -> String {
        self.name.clone().unwrap_or_else(|| fallback.to_owned())
    }

    pub fn is(&self, email: &str) -> bool {
        self.email == email
    }
}
