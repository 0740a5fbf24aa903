//! # Printshop Models
//!
//! Domain records and request/response DTOs for the Printshop API.
//!
//! - [`ids`]: strongly-typed UUID identifiers
//! - [`users`]: users, roles, statuses and profile/admin DTOs
//! - [`auth`]: login, refresh and token pair DTOs
//! - [`producers`], [`products`]: the catalog
//! - [`cart`], [`orders`]: purchasing

pub mod auth;
pub mod cart;
pub mod ids;
pub mod orders;
pub mod producers;
pub mod products;
pub mod users;

pub use auth::{LoginRequest, RefreshTokenRequest, TokenPair};
pub use ids::{OrderId, ProducerId, ProductId, UserId};
pub use users::{NewUser, RegisterRequest, User, UserChanges, UserCredentials, UserRole, UserStatus};
