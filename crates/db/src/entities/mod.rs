//! `SeaORM` entity definitions.

pub mod prelude;

pub mod shipments;
pub mod users;
