//! Shipment repository for database operations.
//!
//! Criteria built by the core crate are lowered into one `Condition::all()`
//! whose first conjunct is always the owner clause.

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, NotSet,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use shipsy_core::shipment::{
    Shipment, ShipmentCriteria, ShipmentDraft, ShipmentError, ShipmentPredicate,
    ShipmentRepository as ShipmentRepoTrait, ShipmentSort, ShipmentSortField, keyword_pattern,
};
use shipsy_shared::types::{Page, PageRequest, SortDirection, UserId};
use tracing::debug;

use crate::entities::shipments;

/// Shipment repository implementation.
#[derive(Debug, Clone)]
pub struct ShipmentRepository {
    db: DatabaseConnection,
}

impl ShipmentRepository {
    /// Create a new shipment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ShipmentRepoTrait for ShipmentRepository {
    async fn insert(&self, owner: UserId, draft: ShipmentDraft) -> Result<Shipment, ShipmentError> {
        let now = Utc::now().into();
        let active_model = shipments::ActiveModel {
            id: NotSet,
            owner_id: Set(owner.into_inner()),
            shipment_title: Set(draft.title),
            shipment_description: Set(draft.description),
            shipment_type: Set(draft.shipment_type),
            is_delivered: Set(draft.delivered),
            cost: Set(draft.cost),
            shipment_date: Set(draft.shipment_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| ShipmentError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Shipment>, ShipmentError> {
        let model = shipments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ShipmentError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn update(&self, shipment: Shipment) -> Result<Shipment, ShipmentError> {
        let id = shipment.id;
        let active_model = shipments::ActiveModel {
            id: Set(id),
            shipment_title: Set(shipment.title),
            shipment_description: Set(shipment.description),
            shipment_type: Set(shipment.shipment_type),
            is_delivered: Set(shipment.delivered),
            cost: Set(shipment.cost),
            shipment_date: Set(shipment.shipment_date),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match active_model.update(&self.db).await {
            Ok(model) => Ok(to_domain(model)),
            Err(DbErr::RecordNotUpdated) => Err(ShipmentError::NotFound(id)),
            Err(e) => Err(ShipmentError::repository(e.to_string())),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, ShipmentError> {
        let result = shipments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ShipmentError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_page(
        &self,
        criteria: &ShipmentCriteria,
        sort: ShipmentSort,
        page: PageRequest,
    ) -> Result<Page<Shipment>, ShipmentError> {
        let total = shipments::Entity::find()
            .filter(to_condition(criteria))
            .count(&self.db)
            .await
            .map_err(|e| ShipmentError::repository(e.to_string()))?;

        // Past the last bindable offset every page is empty.
        let models = match page_query(criteria, sort, page) {
            Some(query) => query
                .all(&self.db)
                .await
                .map_err(|e| ShipmentError::repository(e.to_string()))?,
            None => {
                debug!(offset = page.offset(), "page offset out of range");
                Vec::new()
            }
        };

        Ok(Page::new(
            models.into_iter().map(to_domain).collect(),
            page,
            total,
        ))
    }
}

/// Lowers criteria into a conjunction, owner clause first.
fn to_condition(criteria: &ShipmentCriteria) -> Condition {
    criteria
        .predicates()
        .iter()
        .fold(Condition::all(), |condition, predicate| {
            condition.add(to_expr(predicate))
        })
}

fn to_expr(predicate: &ShipmentPredicate) -> SimpleExpr {
    use shipments::Column;

    match predicate {
        ShipmentPredicate::OwnedBy(owner) => Column::OwnerId.eq(owner.into_inner()),
        ShipmentPredicate::TypeIs(t) => Column::ShipmentType.eq(t.as_str()),
        ShipmentPredicate::DateFrom(d) => Column::ShipmentDate.gte(*d),
        ShipmentPredicate::DateTo(d) => Column::ShipmentDate.lte(*d),
        ShipmentPredicate::CostAtLeast(c) => Column::Cost.gte(*c),
        ShipmentPredicate::CostAtMost(c) => Column::Cost.lte(*c),
        ShipmentPredicate::KeywordIn(k) => {
            let pattern = keyword_pattern(k);
            lower_like(Column::ShipmentTitle, &pattern)
                .or(lower_like(Column::ShipmentDescription, &pattern))
        }
        ShipmentPredicate::DeliveredIs(b) => Column::IsDelivered.eq(*b),
    }
}

fn lower_like(column: shipments::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((shipments::Entity, column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

const fn sort_column(field: ShipmentSortField) -> shipments::Column {
    match field {
        ShipmentSortField::Id => shipments::Column::Id,
        ShipmentSortField::Title => shipments::Column::ShipmentTitle,
        ShipmentSortField::Type => shipments::Column::ShipmentType,
        ShipmentSortField::Delivered => shipments::Column::IsDelivered,
        ShipmentSortField::Cost => shipments::Column::Cost,
        ShipmentSortField::ShipmentDate => shipments::Column::ShipmentDate,
    }
}

const fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/// Filtered, ordered and sliced select for one page.
/// Builds the ordered page query, or `None` when the offset does not fit a
/// signed 64-bit bind parameter.
fn page_query(
    criteria: &ShipmentCriteria,
    sort: ShipmentSort,
    page: PageRequest,
) -> Option<Select<shipments::Entity>> {
    let offset = page.offset();
    i64::try_from(offset).ok()?;

    let mut query = shipments::Entity::find().filter(to_condition(criteria));

    if sort.field != ShipmentSortField::Id {
        query = query.order_by(sort_column(sort.field), order(sort.direction));
    }

    Some(
        query
            .order_by(shipments::Column::Id, order(sort.direction))
            .offset(offset)
            .limit(page.limit()),
    )
}

fn to_domain(model: shipments::Model) -> Shipment {
    Shipment {
        id: model.id,
        owner_id: UserId::from_uuid(model.owner_id),
        title: model.shipment_title,
        description: model.shipment_description,
        shipment_type: model.shipment_type,
        delivered: model.is_delivered,
        cost: model.cost,
        shipment_date: model.shipment_date,
    }
}

#[cfg(test)]
#[path = "shipment_tests.rs"]
mod tests;
