//! Data models
//!
//! Client and Supplier embed the shared [`ContactProfile`] by
//! composition instead of inheriting from an abstract base.

pub mod client;
pub mod contact;
pub mod supplier;
pub mod user;

pub use client::{Client, ClientCreate, ClientUpdate};
pub use contact::ContactProfile;
pub use supplier::{Supplier, SupplierCreate, SupplierUpdate};
pub use user::{User, UserCreate};
