use super::*;
use crate::shipment::ShipmentSortField;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shipsy_shared::types::SortDirection;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory repository evaluating criteria with `ShipmentCriteria::matches`.
#[derive(Default)]
struct MockShipmentRepository {
    rows: Mutex<BTreeMap<i64, Shipment>>,
    next_id: Mutex<i64>,
}

impl MockShipmentRepository {
    fn remove_behind_service(&self, id: i64) {
        self.rows.lock().unwrap().remove(&id);
    }

    fn snapshot(&self, id: i64) -> Option<Shipment> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

fn compare(a: &Shipment, b: &Shipment, field: ShipmentSortField) -> Ordering {
    let primary = match field {
        ShipmentSortField::Id => Ordering::Equal,
        ShipmentSortField::Title => a.title.cmp(&b.title),
        ShipmentSortField::Type => a.shipment_type.cmp(&b.shipment_type),
        ShipmentSortField::Delivered => a.delivered.cmp(&b.delivered),
        ShipmentSortField::Cost => a.cost.cmp(&b.cost),
        ShipmentSortField::ShipmentDate => a.shipment_date.cmp(&b.shipment_date),
    };
    primary.then(a.id.cmp(&b.id))
}

impl ShipmentRepository for MockShipmentRepository {
    async fn insert(&self, owner: UserId, draft: ShipmentDraft) -> Result<Shipment, ShipmentError> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let shipment = Shipment {
            id: *next_id,
            owner_id: owner,
            title: draft.title,
            description: draft.description,
            shipment_type: draft.shipment_type,
            delivered: draft.delivered,
            cost: draft.cost,
            shipment_date: draft.shipment_date,
        };
        self.rows
            .lock()
            .unwrap()
            .insert(shipment.id, shipment.clone());
        Ok(shipment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Shipment>, ShipmentError> {
        Ok(self.snapshot(id))
    }

    async fn update(&self, shipment: Shipment) -> Result<Shipment, ShipmentError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&shipment.id) {
            Some(row) => {
                *row = shipment.clone();
                Ok(shipment)
            }
            None => Err(ShipmentError::NotFound(shipment.id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, ShipmentError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn find_page(
        &self,
        criteria: &ShipmentCriteria,
        sort: ShipmentSort,
        page: PageRequest,
    ) -> Result<Page<Shipment>, ShipmentError> {
        let mut matching: Vec<Shipment> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|s| criteria.matches(s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            let ord = compare(a, b, sort.field);
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap())
            .take(usize::try_from(page.limit()).unwrap())
            .collect();
        Ok(Page::new(content, page, total))
    }
}

fn service() -> (ShipmentService<MockShipmentRepository>, Arc<MockShipmentRepository>) {
    let repo = Arc::new(MockShipmentRepository::default());
    (ShipmentService::new(Arc::clone(&repo)), repo)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(title: &str, shipment_type: &str, cost: Decimal, day: NaiveDate) -> ShipmentRequest {
    ShipmentRequest {
        shipment_title: Some(title.to_string()),
        shipment_description: None,
        shipment_type: Some(shipment_type.to_string()),
        delivered: Some(false),
        cost: Some(cost),
        shipment_date: Some(day),
    }
}

fn box_a() -> ShipmentRequest {
    request("Box A", "AIR", dec!(12.50), date(2024, 1, 10))
}

fn page(page: u64, size: u64) -> PageRequest {
    PageRequest::new(page, size).unwrap()
}

#[tokio::test]
async fn test_add_then_get_round_trips() {
    let (service, _) = service();
    let owner = UserId::new();

    let created = service.add(owner, box_a()).await.unwrap();
    let fetched = service.get(owner, created.id).await.unwrap();

    assert_eq!(created, fetched);
    assert_eq!(fetched.owner_id, owner);
    assert_eq!(fetched.title, "Box A");
    assert_eq!(fetched.cost, dec!(12.50));
}

#[tokio::test]
async fn test_add_rejects_invalid_request_without_storing() {
    let (service, repo) = service();
    let owner = UserId::new();

    let mut bad = box_a();
    bad.cost = Some(dec!(-5));

    assert!(matches!(
        service.add(owner, bad).await,
        Err(ShipmentError::Validation(_))
    ));
    assert!(repo.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let (service, _) = service();
    assert!(matches!(
        service.get(UserId::new(), 999).await,
        Err(ShipmentError::NotFound(999))
    ));
}

#[tokio::test]
async fn test_get_other_owners_shipment_is_forbidden() {
    let (service, _) = service();
    let alice = UserId::new();
    let bob = UserId::new();

    let created = service.add(alice, box_a()).await.unwrap();

    assert!(matches!(
        service.get(bob, created.id).await,
        Err(ShipmentError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let (service, _) = service();
    let owner = UserId::new();
    let created = service.add(owner, box_a()).await.unwrap();

    service.delete(owner, created.id).await.unwrap();

    assert!(matches!(
        service.get(owner, created.id).await,
        Err(ShipmentError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(owner, created.id).await,
        Err(ShipmentError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_by_other_owner_is_forbidden_and_keeps_row() {
    let (service, repo) = service();
    let alice = UserId::new();
    let created = service.add(alice, box_a()).await.unwrap();

    assert!(matches!(
        service.delete(UserId::new(), created.id).await,
        Err(ShipmentError::Forbidden(_))
    ));
    assert!(repo.snapshot(created.id).is_some());
}

#[tokio::test]
async fn test_update_replaces_all_mutable_fields() {
    let (service, _) = service();
    let owner = UserId::new();
    let created = service.add(owner, box_a()).await.unwrap();

    let mut replacement = request("Box A2", "SEA", dec!(30), date(2024, 2, 2));
    replacement.delivered = Some(true);
    replacement.shipment_description = Some("relabelled".to_string());

    let updated = service.update(owner, created.id, replacement).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.owner_id, owner);
    assert_eq!(updated.title, "Box A2");
    assert_eq!(updated.shipment_type, "SEA");
    assert!(updated.delivered);
    assert_eq!(updated.cost, dec!(30));
    assert_eq!(updated.shipment_date, date(2024, 2, 2));
    assert_eq!(updated.description.as_deref(), Some("relabelled"));
}

#[tokio::test]
async fn test_cross_owner_update_is_forbidden_and_leaves_record() {
    let (service, repo) = service();
    let alice = UserId::new();
    let created = service.add(alice, box_a()).await.unwrap();

    let result = service
        .update(
            UserId::new(),
            created.id,
            request("Hijacked", "ROAD", dec!(1), date(2020, 1, 1)),
        )
        .await;

    assert!(matches!(result, Err(ShipmentError::Forbidden(_))));
    assert_eq!(repo.snapshot(created.id), Some(created));
}

#[tokio::test]
async fn test_update_validates_before_lookup() {
    let (service, _) = service();

    let mut bad = box_a();
    bad.shipment_title = Some("   ".to_string());

    assert!(matches!(
        service.update(UserId::new(), 12345, bad).await,
        Err(ShipmentError::Validation(_))
    ));
}

#[tokio::test]
async fn test_update_of_row_removed_mid_flight_is_not_found() {
    struct VanishingRepo(MockShipmentRepository);

    impl ShipmentRepository for VanishingRepo {
        async fn insert(&self, owner: UserId, draft: ShipmentDraft) -> Result<Shipment, ShipmentError> {
            self.0.insert(owner, draft).await
        }
        async fn find_by_id(&self, id: i64) -> Result<Option<Shipment>, ShipmentError> {
            let found = self.0.find_by_id(id).await;
            self.0.remove_behind_service(id);
            found
        }
        async fn update(&self, shipment: Shipment) -> Result<Shipment, ShipmentError> {
            self.0.update(shipment).await
        }
        async fn delete(&self, id: i64) -> Result<bool, ShipmentError> {
            self.0.delete(id).await
        }
        async fn find_page(
            &self,
            criteria: &ShipmentCriteria,
            sort: ShipmentSort,
            page: PageRequest,
        ) -> Result<Page<Shipment>, ShipmentError> {
            self.0.find_page(criteria, sort, page).await
        }
    }

    let service = ShipmentService::new(Arc::new(VanishingRepo(MockShipmentRepository::default())));
    let owner = UserId::new();
    let created = service.add(owner, box_a()).await.unwrap();

    assert!(matches!(
        service.update(owner, created.id, box_a()).await,
        Err(ShipmentError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_never_leaks_other_owners() {
    let (service, _) = service();
    let alice = UserId::new();
    let bob = UserId::new();

    for i in 0..3 {
        service
            .add(alice, request(&format!("A{i}"), "AIR", dec!(5), date(2024, 1, 1)))
            .await
            .unwrap();
    }
    for i in 0..4 {
        service
            .add(bob, request(&format!("B{i}"), "AIR", dec!(5), date(2024, 1, 1)))
            .await
            .unwrap();
    }

    let page = service
        .list(alice, ShipmentSort::default(), page(0, 100))
        .await
        .unwrap();

    assert_eq!(page.total_elements, 3);
    assert!(page.content.iter().all(|s| s.owner_id == alice));
}

#[tokio::test]
async fn test_twelve_records_page_into_five_five_two() {
    let (service, _) = service();
    let owner = UserId::new();
    for day in 1..=12 {
        service
            .add(owner, request(&format!("S{day}"), "ROAD", dec!(1), date(2024, 1, day)))
            .await
            .unwrap();
    }

    let mut sizes = Vec::new();
    for index in 0..3 {
        let p = service
            .list(owner, ShipmentSort::default(), page(index, 5))
            .await
            .unwrap();
        assert_eq!(p.total_elements, 12);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.number, index);
        sizes.push(p.content.len());
    }
    assert_eq!(sizes, vec![5, 5, 2]);

    let first = service
        .list(owner, ShipmentSort::default(), page(0, 5))
        .await
        .unwrap();
    assert_eq!(first.content[0].shipment_date, date(2024, 1, 12));
}

#[tokio::test]
async fn test_out_of_range_page_is_empty_with_totals() {
    let (service, _) = service();
    let owner = UserId::new();
    service.add(owner, box_a()).await.unwrap();

    let p = service
        .list(owner, ShipmentSort::default(), page(7, 5))
        .await
        .unwrap();

    assert!(p.content.is_empty());
    assert_eq!(p.total_elements, 1);
    assert_eq!(p.total_pages, 1);
}

#[tokio::test]
async fn test_empty_listing_has_zero_pages() {
    let (service, _) = service();
    let p = service
        .list(UserId::new(), ShipmentSort::default(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(p.total_elements, 0);
    assert_eq!(p.total_pages, 0);
}

#[tokio::test]
async fn test_sort_ties_are_broken_by_id() {
    let (service, _) = service();
    let owner = UserId::new();
    let mut ids = Vec::new();
    for i in 0..4 {
        let s = service
            .add(owner, request(&format!("T{i}"), "AIR", dec!(7), date(2024, 5, 5)))
            .await
            .unwrap();
        ids.push(s.id);
    }

    let sort = ShipmentSort {
        field: ShipmentSortField::Cost,
        direction: SortDirection::Asc,
    };
    let p = service.list(owner, sort, page(0, 10)).await.unwrap();
    let listed: Vec<i64> = p.content.iter().map(|s| s.id).collect();

    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_cost_range_filter() {
    let (service, _) = service();
    let owner = UserId::new();
    for cost in [dec!(5), dec!(10), dec!(15), dec!(20), dec!(25)] {
        service
            .add(owner, request("Crate", "SEA", cost, date(2024, 1, 1)))
            .await
            .unwrap();
    }

    let filter = ShipmentFilter {
        min_cost: Some(dec!(10)),
        max_cost: Some(dec!(20)),
        ..ShipmentFilter::default()
    };
    let p = service
        .filter(owner, &filter, ShipmentSort::default(), page(0, 100))
        .await
        .unwrap();

    assert_eq!(p.total_elements, 3);
    assert!(
        p.content
            .iter()
            .all(|s| s.cost >= dec!(10) && s.cost <= dec!(20))
    );
}

#[tokio::test]
async fn test_box_a_scenario() {
    let (service, _) = service();
    let owner = UserId::new();
    let created = service.add(owner, box_a()).await.unwrap();
    service
        .add(owner, request("Pallet", "SEA", dec!(99), date(2024, 1, 11)))
        .await
        .unwrap();

    let filter = ShipmentFilter {
        shipment_type: Some("AIR".to_string()),
        keyword: Some("box".to_string()),
        start_date: Some(date(2024, 1, 1)),
        end_date: Some(date(2024, 1, 31)),
        ..ShipmentFilter::default()
    };
    let p = service
        .filter(owner, &filter, ShipmentSort::default(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(p.total_elements, 1);
    assert_eq!(p.content, vec![created]);
}

#[tokio::test]
async fn test_delivered_filter_picks_up_confirmed_delivery() {
    let (service, _) = service();
    let owner = UserId::new();
    let created = service.add(owner, box_a()).await.unwrap();

    let filter = ShipmentFilter {
        delivered: Some(true),
        ..ShipmentFilter::default()
    };
    let before = service
        .filter(owner, &filter, ShipmentSort::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(before.total_elements, 0);

    let mut delivered = box_a();
    delivered.delivered = Some(true);
    service.update(owner, created.id, delivered).await.unwrap();

    let after = service
        .filter(owner, &filter, ShipmentSort::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(after.total_elements, 1);
    assert_eq!(after.content[0].id, created.id);
}

#[tokio::test]
async fn test_filter_is_still_owner_scoped() {
    let (service, _) = service();
    let alice = UserId::new();
    let bob = UserId::new();
    service.add(bob, box_a()).await.unwrap();

    let filter = ShipmentFilter {
        keyword: Some("box".to_string()),
        ..ShipmentFilter::default()
    };
    let p = service
        .filter(alice, &filter, ShipmentSort::default(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(p.total_elements, 0);
}
