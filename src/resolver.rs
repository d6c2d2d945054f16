//! Get-or-create lookups for entities referenced by name.
//!
//! Labels and countries are created on the spot when missing. A missing
//! creator is only reported; creating one needs the caller's consent and goes
//! through [`EntityResolver::create_creator`].

use crate::catalog_store::{CatalogDate, CatalogError, CatalogResult, NewRecordLabel, SqliteCatalogStore};
use crate::ids::IdAllocator;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Existing(i64),
    Created(i64),
    /// Lookup found nothing and nothing was created.
    Missing,
}

impl Resolution {
    pub fn id(&self) -> Option<i64> {
        match self {
            Resolution::Existing(id) | Resolution::Created(id) => Some(*id),
            Resolution::Missing => None,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}

pub struct EntityResolver<'a> {
    store: &'a SqliteCatalogStore,
    ids: &'a dyn IdAllocator,
}

fn require_name<'n>(kind: &str, name: &'n str) -> CatalogResult<&'n str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::InvalidInput(format!("{} name is empty", kind)));
    }
    Ok(name)
}

impl<'a> EntityResolver<'a> {
    pub fn new(store: &'a SqliteCatalogStore, ids: &'a dyn IdAllocator) -> Self {
        EntityResolver { store, ids }
    }

    /// Finds a label by pattern match on its name, inserting it with the given
    /// attributes when no label matches.
    pub fn resolve_or_create_label(
        &self,
        name: &str,
        founding_date: Option<CatalogDate>,
        country_id: Option<i64>,
    ) -> CatalogResult<Resolution> {
        let name = require_name("label", name)?;
        if let Some(id) = self.store.find_label_id(name)? {
            debug!("Label '{}' resolved to existing id {}", name, id);
            return Ok(Resolution::Existing(id));
        }
        let id = self.store.insert_label(
            self.ids.allocate(),
            &NewRecordLabel {
                name: name.to_string(),
                founding_date,
                country_id,
            },
        )?;
        info!("Created record label '{}' with id {}", name, id);
        Ok(Resolution::Created(id))
    }

    pub fn resolve_or_create_country(&self, name: &str) -> CatalogResult<Resolution> {
        let name = require_name("country", name)?;
        if let Some(id) = self.store.find_country_id(name)? {
            debug!("Country '{}' resolved to existing id {}", name, id);
            return Ok(Resolution::Existing(id));
        }
        let id = self.store.insert_country(self.ids.allocate(), name)?;
        info!("Created country '{}' with id {}", name, id);
        Ok(Resolution::Created(id))
    }

    /// Exact-name lookup. Never creates anything.
    pub fn resolve_creator(&self, name: &str) -> CatalogResult<Resolution> {
        let name = require_name("creator", name)?;
        Ok(match self.store.find_creator_id(name)? {
            Some(id) => Resolution::Existing(id),
            None => Resolution::Missing,
        })
    }

    pub fn create_creator(&self, name: &str) -> CatalogResult<i64> {
        let name = require_name("creator", name)?;
        let id = self.store.insert_creator(self.ids.allocate(), name)?;
        info!("Created creator '{}' with id {}", name, id);
        Ok(id)
    }
}
