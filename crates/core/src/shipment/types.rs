//! Shipment domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use shipsy_shared::types::{SortDirection, UserId};
use validator::{Validate, ValidationError};

use super::error::ShipmentError;
use crate::validation::{describe_validation, invalid};

/// Longest accepted shipment title, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Longest accepted shipment type label.
pub const MAX_TYPE_LEN: usize = 64;

/// Most fractional digits a cost may carry.
pub const MAX_COST_SCALE: u32 = 4;

/// Exclusive upper bound on cost, matching a `DECIMAL(19,4)` column.
pub const MAX_COST: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// A stored shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    /// Server-assigned identifier.
    pub id: i64,
    /// The user who created the shipment.
    pub owner_id: UserId,
    /// Short title.
    pub title: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Category label, e.g. `AIR`, `SEA` or `ROAD`.
    pub shipment_type: String,
    /// Whether delivery has been confirmed.
    pub delivered: bool,
    /// Cost, always positive.
    pub cost: Decimal,
    /// Shipping date.
    pub shipment_date: NaiveDate,
}

impl Shipment {
    /// Replaces every mutable field with the draft's values.
    ///
    /// The id and owner are left untouched.
    pub fn apply(&mut self, draft: ShipmentDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.shipment_type = draft.shipment_type;
        self.delivered = draft.delivered;
        self.cost = draft.cost;
        self.shipment_date = draft.shipment_date;
    }
}

/// Client payload for creating or replacing a shipment.
///
/// Every field is optional at the decoding stage so a missing field turns
/// into a validation message instead of a decoding failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRequest {
    /// Title, must not be blank.
    #[validate(
        required(message = "Shipment title is required"),
        custom(function = "validate_title")
    )]
    pub shipment_title: Option<String>,

    /// Optional description.
    #[serde(default)]
    pub shipment_description: Option<String>,

    /// Category label.
    #[validate(
        required(message = "Shipment type is required"),
        custom(function = "validate_type")
    )]
    pub shipment_type: Option<String>,

    /// Delivery status.
    #[serde(rename = "isDelivered", alias = "delivered")]
    #[validate(required(message = "Delivery status is required"))]
    pub delivered: Option<bool>,

    /// Cost, accepted as a JSON number or string.
    #[validate(
        required(message = "Cost is required"),
        custom(function = "validate_cost")
    )]
    pub cost: Option<Decimal>,

    /// Shipping date in `YYYY-MM-DD` form.
    #[validate(required(message = "Shipment date is required"))]
    pub shipment_date: Option<NaiveDate>,
}

/// A validated shipment payload, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentDraft {
    /// Trimmed title.
    pub title: String,
    /// Description, `None` when blank.
    pub description: Option<String>,
    /// Trimmed category label.
    pub shipment_type: String,
    /// Delivery status.
    pub delivered: bool,
    /// Positive cost.
    pub cost: Decimal,
    /// Shipping date.
    pub shipment_date: NaiveDate,
}

impl TryFrom<ShipmentRequest> for ShipmentDraft {
    type Error = ShipmentError;

    fn try_from(request: ShipmentRequest) -> Result<Self, Self::Error> {
        request
            .validate()
            .map_err(|errors| ShipmentError::Validation(describe_validation(&errors)))?;

        let (Some(title), Some(shipment_type), Some(delivered), Some(cost), Some(shipment_date)) = (
            request.shipment_title,
            request.shipment_type,
            request.delivered,
            request.cost,
            request.shipment_date,
        ) else {
            return Err(ShipmentError::validation("Missing required shipment fields"));
        };

        let description = request
            .shipment_description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            title: title.trim().to_string(),
            description,
            shipment_type: shipment_type.trim().to_string(),
            delivered,
            cost,
            shipment_date,
        })
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(invalid("blank", "Shipment title must not be blank"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(invalid(
            "length",
            "Shipment title must be at most 255 characters",
        ));
    }
    Ok(())
}

fn validate_type(shipment_type: &str) -> Result<(), ValidationError> {
    let trimmed = shipment_type.trim();
    if trimmed.is_empty() {
        return Err(invalid("blank", "Shipment type must not be blank"));
    }
    if trimmed.chars().count() > MAX_TYPE_LEN {
        return Err(invalid(
            "length",
            "Shipment type must be at most 64 characters",
        ));
    }
    Ok(())
}

fn validate_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if *cost <= Decimal::ZERO {
        return Err(invalid("range", "Cost must be greater than zero"));
    }
    if *cost >= MAX_COST {
        return Err(invalid("range", "Cost must be less than 1000000000000000"));
    }
    if cost.normalize().scale() > MAX_COST_SCALE {
        return Err(invalid(
            "scale",
            "Cost must have at most 4 decimal places",
        ));
    }
    Ok(())
}

/// Optional filter criteria, all combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentFilter {
    /// Exact category match.
    pub shipment_type: Option<String>,
    /// Earliest shipping date, inclusive.
    pub start_date: Option<NaiveDate>,
    /// Latest shipping date, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Lowest cost, inclusive.
    pub min_cost: Option<Decimal>,
    /// Highest cost, inclusive.
    pub max_cost: Option<Decimal>,
    /// Case-insensitive substring of title or description.
    pub keyword: Option<String>,
    /// Delivery status match.
    #[serde(rename = "isDelivered", alias = "delivered")]
    pub delivered: Option<bool>,
}

/// Fields a shipment listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ShipmentSortField {
    /// Identifier.
    Id,
    /// Title.
    Title,
    /// Category label.
    Type,
    /// Delivery status.
    Delivered,
    /// Cost.
    Cost,
    /// Shipping date.
    #[default]
    ShipmentDate,
}

impl ShipmentSortField {
    /// Every sortable field.
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::Title,
        Self::Type,
        Self::Delivered,
        Self::Cost,
        Self::ShipmentDate,
    ];

    /// The client-facing field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "shipmentTitle",
            Self::Type => "shipmentType",
            Self::Delivered => "isDelivered",
            Self::Cost => "cost",
            Self::ShipmentDate => "shipmentDate",
        }
    }

    /// Parses a client-facing field name.
    ///
    /// # Errors
    ///
    /// Returns `ShipmentError::Validation` for a name outside the sortable set.
    pub fn parse(name: &str) -> Result<Self, ShipmentError> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|f| f.as_str()).collect();
                ShipmentError::Validation(format!(
                    "Cannot sort by '{name}'; expected one of {}",
                    allowed.join(", ")
                ))
            })
    }
}

/// Ordering of a shipment listing.
///
/// Storage always adds `id` in the same direction as a tie-breaker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipmentSort {
    /// Primary sort field.
    pub field: ShipmentSortField,
    /// Direction for both the primary field and the tie-breaker.
    pub direction: SortDirection,
}

impl ShipmentSort {
    /// Builds a sort from optional query values, falling back to newest first.
    ///
    /// # Errors
    ///
    /// Returns `ShipmentError::Validation` when `sort_by` names an unknown field.
    pub fn from_query(sort_by: Option<&str>, sort_dir: Option<&str>) -> Result<Self, ShipmentError> {
        let field = match sort_by {
            Some(name) if !name.trim().is_empty() => ShipmentSortField::parse(name)?,
            _ => ShipmentSortField::default(),
        };
        let direction = sort_dir.map(SortDirection::parse_lenient).unwrap_or_default();
        Ok(Self { field, direction })
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
