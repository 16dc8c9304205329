//! Shipment tracking.
//!
//! This module provides business logic for shipments including:
//! - Request validation
//! - Per-owner authorization on every read and write
//! - Filter composition from optional criteria
//! - Sorting and paging of owner-scoped queries

mod error;
mod filter;
mod service;
mod types;

pub use error::ShipmentError;
pub use filter::{ShipmentCriteria, ShipmentPredicate, keyword_pattern};
pub use service::{ShipmentRepository, ShipmentService};
pub use types::{
    MAX_COST, MAX_COST_SCALE, MAX_TITLE_LEN, MAX_TYPE_LEN, Shipment, ShipmentDraft, ShipmentFilter, ShipmentRequest, ShipmentSort, ShipmentSortField,
};
