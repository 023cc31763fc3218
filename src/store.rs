//! sled backed listing documents.
//!
//! Each listing, including its embedded interests, is one CBOR document keyed by
//! listing id. Writes go through `compare_and_swap` so a mutation only lands if
//! the document is byte-for-byte what it was derived from; otherwise the
//! mutation is re-run against the fresh copy.
use crate::error::MarketError;
use crate::listing::Listing;
use sled::IVec;
use tracing::debug;

const LISTINGS_TREE: &str = "listings";

#[derive(Clone)]
pub struct ListingStore {
    tree: sled::Tree,
}

fn decode(bytes: &IVec) -> Result<Listing, MarketError> {
    Ok(minicbor::decode(bytes)?)
}

impl ListingStore {
    pub fn open(db: &sled::Db) -> Result<Self, MarketError> {
        let tree = db.open_tree(LISTINGS_TREE)?;
        Ok(Self { tree })
    }

    /// Store a new listing. Fails with `Conflict` if the id is already taken.
    pub fn insert(&self, listing: &Listing) -> Result<(), MarketError> {
        let encoded = minicbor::to_vec(listing)?;
        self.tree
            .compare_and_swap(listing.id.as_bytes(), None::<&[u8]>, Some(encoded))?
            .map_err(|_| MarketError::Conflict(format!("listing {} already exists", listing.id)))
    }

    pub fn get(&self, id: &str) -> Result<Listing, MarketError> {
        let bytes = self
            .tree
            .get(id.as_bytes())?
            .ok_or_else(|| MarketError::NotFound(format!("listing {id}")))?;
        decode(&bytes)
    }

    pub fn all(&self) -> Result<Vec<Listing>, MarketError> {
        self.tree
            .iter()
            .values()
            .map(|bytes| decode(&bytes?))
            .collect()
    }

    /// Run `f` against the current document and persist the result atomically.
    ///
    /// `f` may run more than once under contention and must derive everything
    /// from the listing it is handed. Returning an error aborts without writing.
    pub fn mutate<T, F>(&self, id: &str, mut f: F) -> Result<(T, Listing), MarketError>
    where
        F: FnMut(&mut Listing) -> Result<T, MarketError>,
    {
        loop {
            let current = self
                .tree
                .get(id.as_bytes())?
                .ok_or_else(|| MarketError::NotFound(format!("listing {id}")))?;
            let mut listing = decode(&current)?;

            let out = f(&mut listing)?;

            let encoded = minicbor::to_vec(&listing)?;
            match self
                .tree
                .compare_and_swap(id.as_bytes(), Some(&current), Some(encoded))?
            {
                Ok(()) => return Ok((out, listing)),
                Err(_) => debug!(listing_id = id, "listing changed underneath, retrying"),
            }
        }
    }

    /// Remove the document if `check` passes on its current contents.
    pub fn remove_if<F>(&self, id: &str, mut check: F) -> Result<Listing, MarketError>
    where
        F: FnMut(&Listing) -> Result<(), MarketError>,
    {
        loop {
            let current = self
                .tree
                .get(id.as_bytes())?
                .ok_or_else(|| MarketError::NotFound(format!("listing {id}")))?;
            let listing = decode(&current)?;

            check(&listing)?;

            match self
                .tree
                .compare_and_swap(id.as_bytes(), Some(&current), None::<IVec>)?
            {
                Ok(()) => return Ok(listing),
                Err(_) => debug!(listing_id = id, "listing changed before removal, retrying"),
            }
        }
    }

    pub fn flush(&self) -> Result<(), MarketError> {
        self.tree.flush()?;
        Ok(())
    }
}
