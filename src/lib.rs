#![doc = "The `todoguard` library crate."]
#![doc = ""]
#![doc = "A multi-tenant todo service: bcrypt-hashed credentials, HS256 bearer tokens,"]
#![doc = "an actix-web middleware that resolves the caller's identity, and todo handlers"]
#![doc = "that only ever touch the caller's own rows unless the caller is an admin."]
#![doc = "The binary (`main.rs`) wires configuration, the database pool and the routes together."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::config::Config;
pub use crate::error::AppError;
