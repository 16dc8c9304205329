use super::*;

#[test]
fn test_new_ids_are_v7_and_distinct() {
    let a = UserId::new();
    let b = UserId::new();

    assert_ne!(a, b);
    assert_eq!(a.into_inner().get_version_num(), 7);
}

#[test]
fn test_wraps_stored_uuid() {
    let uuid = Uuid::new_v4();
    assert_eq!(UserId::from_uuid(uuid).into_inner(), uuid);
    assert_eq!(UserId::from(uuid), UserId::from_uuid(uuid));
}

#[test]
fn test_display_and_parse_agree() {
    let id = UserId::new();
    let parsed: UserId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("not-a-uuid".parse::<UserId>().is_err());
}

#[test]
fn test_serializes_as_bare_uuid() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&UserId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
