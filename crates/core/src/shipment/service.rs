//! Shipment service implementation.

use std::future::Future;
use std::sync::Arc;

use shipsy_shared::types::{Page, PageRequest, UserId};
use tracing::{debug, info, warn};

use super::error::ShipmentError;
use super::filter::ShipmentCriteria;
use super::types::{Shipment, ShipmentDraft, ShipmentFilter, ShipmentRequest, ShipmentSort};

/// Repository trait for shipment persistence.
///
/// This trait is implemented by the db crate. It knows nothing about
/// ownership: lookups are by id, and listings receive criteria that already
/// carry the owner predicate.
pub trait ShipmentRepository: Send + Sync {
    /// Store a new shipment for `owner`.
    fn insert(
        &self,
        owner: UserId,
        draft: ShipmentDraft,
    ) -> impl Future<Output = Result<Shipment, ShipmentError>> + Send;

    /// Find a shipment by id, whoever owns it.
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Shipment>, ShipmentError>> + Send;

    /// Overwrite the mutable fields of an existing shipment.
    ///
    /// Fails with `ShipmentError::NotFound` if the row no longer exists.
    fn update(
        &self,
        shipment: Shipment,
    ) -> impl Future<Output = Result<Shipment, ShipmentError>> + Send;

    /// Delete by id. Returns false if nothing was deleted.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool, ShipmentError>> + Send;

    /// One page of the shipments matching `criteria`, plus the total count.
    fn find_page(
        &self,
        criteria: &ShipmentCriteria,
        sort: ShipmentSort,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Shipment>, ShipmentError>> + Send;
}

/// Shipment service enforcing per-owner access.
pub struct ShipmentService<R: ShipmentRepository> {
    repo: Arc<R>,
}

impl<R: ShipmentRepository> ShipmentService<R> {
    /// Create a new shipment service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Validate and store a new shipment owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a bad request, `Repository` if storage fails.
    pub async fn add(
        &self,
        owner: UserId,
        request: ShipmentRequest,
    ) -> Result<Shipment, ShipmentError> {
        let draft = ShipmentDraft::try_from(request)?;
        let shipment = self.repo.insert(owner, draft).await?;

        info!(owner = %owner, shipment_id = shipment.id, "shipment created");
        Ok(shipment)
    }

    /// Fetch one of the owner's shipments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown, `Forbidden` if another user owns it.
    pub async fn get(&self, owner: UserId, id: i64) -> Result<Shipment, ShipmentError> {
        let shipment = self.owned(owner, id).await?;
        debug!(owner = %owner, shipment_id = id, "shipment fetched");
        Ok(shipment)
    }

    /// Replace every mutable field of one of the owner's shipments.
    ///
    /// The request is validated before the shipment is looked up.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `NotFound` or `Forbidden` as for `add` and `get`.
    pub async fn update(
        &self,
        owner: UserId,
        id: i64,
        request: ShipmentRequest,
    ) -> Result<Shipment, ShipmentError> {
        let draft = ShipmentDraft::try_from(request)?;
        let mut shipment = self.owned(owner, id).await?;
        shipment.apply(draft);

        let updated = self.repo.update(shipment).await?;

        info!(owner = %owner, shipment_id = id, "shipment updated");
        Ok(updated)
    }

    /// Permanently remove one of the owner's shipments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown (including a second delete),
    /// `Forbidden` if another user owns it.
    pub async fn delete(&self, owner: UserId, id: i64) -> Result<(), ShipmentError> {
        self.owned(owner, id).await?;

        if !self.repo.delete(id).await? {
            return Err(ShipmentError::NotFound(id));
        }

        info!(owner = %owner, shipment_id = id, "shipment deleted");
        Ok(())
    }

    /// List the owner's shipments.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if storage fails.
    pub async fn list(
        &self,
        owner: UserId,
        sort: ShipmentSort,
        page: PageRequest,
    ) -> Result<Page<Shipment>, ShipmentError> {
        let criteria = ShipmentCriteria::owned_by(owner);
        let result = self.repo.find_page(&criteria, sort, page).await?;

        debug!(owner = %owner, page = page.page, total = result.total_elements, "shipments listed");
        Ok(result)
    }

    /// List the owner's shipments that satisfy every criterion in `filter`.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if storage fails.
    pub async fn filter(
        &self,
        owner: UserId,
        filter: &ShipmentFilter,
        sort: ShipmentSort,
        page: PageRequest,
    ) -> Result<Page<Shipment>, ShipmentError> {
        let criteria = ShipmentCriteria::owned_by(owner).and_filter(filter);
        let result = self.repo.find_page(&criteria, sort, page).await?;

        debug!(
            owner = %owner,
            predicates = criteria.predicates().len(),
            total = result.total_elements,
            "shipments filtered"
        );
        Ok(result)
    }

    /// Existence first, then ownership.
    async fn owned(&self, owner: UserId, id: i64) -> Result<Shipment, ShipmentError> {
        let shipment = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ShipmentError::NotFound(id))?;

        if shipment.owner_id != owner {
            warn!(owner = %owner, shipment_id = id, "shipment access denied");
            return Err(ShipmentError::Forbidden(id));
        }

        Ok(shipment)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
