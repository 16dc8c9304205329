//! Core business logic for Shipsy.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Domain types, validation rules and authorization checks live here; storage
//! is reached through the repository traits the `shipsy-db` crate implements.
//!
//! # Modules
//!
//! - `auth` - Password hashing and one-time codes
//! - `profile` - Registration, login checks, verification and password reset
//! - `shipment` - Owner-scoped shipment CRUD, filtering and paging

pub mod auth;
pub mod profile;
pub mod shipment;

mod validation;
