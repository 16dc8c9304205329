//! Repository implementations for data access.
//!
//! Repositories implement the traits declared by the core crate, hiding the
//! `SeaORM` details from the services that use them.

pub mod shipment;
pub mod user;

pub use shipment::ShipmentRepository;
pub use user::UserRepository;
