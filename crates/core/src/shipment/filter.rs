//! Filter composition for shipment queries.
//!
//! A query is a list of predicates joined with AND. The list always starts
//! with the owner predicate; it can only be narrowed afterwards, never
//! widened or re-targeted at another owner.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shipsy_shared::types::UserId;

use super::types::{Shipment, ShipmentFilter};

/// One conjunct of a shipment query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipmentPredicate {
    /// Shipment belongs to this user.
    OwnedBy(UserId),
    /// Exact category match.
    TypeIs(String),
    /// Shipping date on or after this day.
    DateFrom(NaiveDate),
    /// Shipping date on or before this day.
    DateTo(NaiveDate),
    /// Cost at least this amount.
    CostAtLeast(Decimal),
    /// Cost at most this amount.
    CostAtMost(Decimal),
    /// Lowercased keyword found in the title or the description.
    KeywordIn(String),
    /// Delivery status match.
    DeliveredIs(bool),
}

impl ShipmentPredicate {
    /// Evaluates the predicate against a shipment held in memory.
    #[must_use]
    pub fn matches(&self, shipment: &Shipment) -> bool {
        match self {
            Self::OwnedBy(owner) => shipment.owner_id == *owner,
            Self::TypeIs(t) => shipment.shipment_type == *t,
            Self::DateFrom(d) => shipment.shipment_date >= *d,
            Self::DateTo(d) => shipment.shipment_date <= *d,
            Self::CostAtLeast(c) => shipment.cost >= *c,
            Self::CostAtMost(c) => shipment.cost <= *c,
            Self::KeywordIn(k) => {
                shipment.title.to_lowercase().contains(k.as_str())
                    || shipment
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(k.as_str()))
            }
            Self::DeliveredIs(b) => shipment.delivered == *b,
        }
    }
}

/// An owner-scoped conjunction of predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentCriteria {
    owner: UserId,
    predicates: Vec<ShipmentPredicate>,
}

impl ShipmentCriteria {
    /// Starts a query over one owner's shipments.
    #[must_use]
    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner,
            predicates: vec![ShipmentPredicate::OwnedBy(owner)],
        }
    }

    /// Narrows the query with one more predicate.
    #[must_use]
    pub fn and(mut self, predicate: ShipmentPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Narrows the query with every criterion present in `filter`.
    ///
    /// Blank type and keyword values count as absent.
    #[must_use]
    pub fn and_filter(mut self, filter: &ShipmentFilter) -> Self {
        if let Some(t) = non_blank(filter.shipment_type.as_deref()) {
            self = self.and(ShipmentPredicate::TypeIs(t.to_string()));
        }
        if let Some(d) = filter.start_date {
            self = self.and(ShipmentPredicate::DateFrom(d));
        }
        if let Some(d) = filter.end_date {
            self = self.and(ShipmentPredicate::DateTo(d));
        }
        if let Some(c) = filter.min_cost {
            self = self.and(ShipmentPredicate::CostAtLeast(c));
        }
        if let Some(c) = filter.max_cost {
            self = self.and(ShipmentPredicate::CostAtMost(c));
        }
        if let Some(k) = non_blank(filter.keyword.as_deref()) {
            self = self.and(ShipmentPredicate::KeywordIn(k.to_lowercase()));
        }
        if let Some(b) = filter.delivered {
            self = self.and(ShipmentPredicate::DeliveredIs(b));
        }
        self
    }

    /// The owner every query is scoped to.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// All predicates, owner first.
    #[must_use]
    pub fn predicates(&self) -> &[ShipmentPredicate] {
        &self.predicates
    }

    /// Returns true when the shipment satisfies every predicate.
    #[must_use]
    pub fn matches(&self, shipment: &Shipment) -> bool {
        self.predicates.iter().all(|p| p.matches(shipment))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builds a `LIKE` pattern that matches `keyword` literally anywhere.
///
/// `%`, `_` and `\` are escaped with a backslash.
#[must_use]
pub fn keyword_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn shipment(owner: UserId, title: &str, cost: Decimal) -> Shipment {
        Shipment {
            id: 1,
            owner_id: owner,
            title: title.to_string(),
            description: None,
            shipment_type: "AIR".to_string(),
            delivered: false,
            cost,
            shipment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_owner_predicate_is_first() {
        let owner = UserId::new();
        let criteria = ShipmentCriteria::owned_by(owner).and_filter(&ShipmentFilter {
            min_cost: Some(dec!(5)),
            ..ShipmentFilter::default()
        });

        assert_eq!(criteria.predicates()[0], ShipmentPredicate::OwnedBy(owner));
        assert_eq!(criteria.owner(), owner);
        assert_eq!(criteria.predicates().len(), 2);
    }

    #[test]
    fn test_empty_filter_adds_nothing() {
        let criteria = ShipmentCriteria::owned_by(UserId::new()).and_filter(&ShipmentFilter {
            shipment_type: Some(" ".to_string()),
            keyword: Some("   ".to_string()),
            ..ShipmentFilter::default()
        });
        assert_eq!(criteria.predicates().len(), 1);
    }

    #[test]
    fn test_other_owner_never_matches() {
        let owner = UserId::new();
        let criteria = ShipmentCriteria::owned_by(owner);

        assert!(criteria.matches(&shipment(owner, "Box", dec!(1))));
        assert!(!criteria.matches(&shipment(UserId::new(), "Box", dec!(1))));
    }

    #[test]
    fn test_keyword_is_case_insensitive_on_title_or_description() {
        let owner = UserId::new();
        let criteria = ShipmentCriteria::owned_by(owner).and_filter(&ShipmentFilter {
            keyword: Some("BoX".to_string()),
            ..ShipmentFilter::default()
        });

        let mut by_description = shipment(owner, "Parcel", dec!(1));
        by_description.description = Some("big box of books".to_string());

        assert!(criteria.matches(&shipment(owner, "Box A", dec!(1))));
        assert!(criteria.matches(&by_description));
        assert!(!criteria.matches(&shipment(owner, "Parcel", dec!(1))));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let owner = UserId::new();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let criteria = ShipmentCriteria::owned_by(owner).and_filter(&ShipmentFilter {
            start_date: Some(day),
            end_date: Some(day),
            ..ShipmentFilter::default()
        });

        assert!(criteria.matches(&shipment(owner, "Box", dec!(1))));
    }

    #[test]
    fn test_keyword_pattern_escapes_wildcards() {
        assert_eq!(keyword_pattern("box"), "%box%");
        assert_eq!(keyword_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(keyword_pattern("a\\b"), "%a\\\\b%");
    }

    proptest! {
        #[test]
        fn prop_cost_range_matches_exactly_the_bounded_costs(
            costs in prop::collection::vec(1i64..100_000, 1..40),
            low in 1i64..100_000,
            span in 0i64..50_000,
        ) {
            let owner = UserId::new();
            let min = Decimal::new(low, 2);
            let max = Decimal::new(low + span, 2);
            let criteria = ShipmentCriteria::owned_by(owner).and_filter(&ShipmentFilter {
                min_cost: Some(min),
                max_cost: Some(max),
                ..ShipmentFilter::default()
            });

            for cents in costs {
                let cost = Decimal::new(cents, 2);
                let s = shipment(owner, "Box", cost);
                prop_assert_eq!(criteria.matches(&s), min <= cost && cost <= max);
            }
        }

        #[test]
        fn prop_extra_predicates_only_narrow(
            cents in 1i64..100_000,
            delivered in any::<bool>(),
            want_delivered in any::<bool>(),
        ) {
            let owner = UserId::new();
            let mut s = shipment(owner, "Box", Decimal::new(cents, 2));
            s.delivered = delivered;

            let base = ShipmentCriteria::owned_by(owner);
            let narrowed = base.clone().and(ShipmentPredicate::DeliveredIs(want_delivered));

            if narrowed.matches(&s) {
                prop_assert!(base.matches(&s));
            }
        }
    }
}
