//! Entity re-exports.

pub use super::shipments::Entity as Shipments;
pub use super::users::Entity as Users;
