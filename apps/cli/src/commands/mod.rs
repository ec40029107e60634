//! # Commands Module
//!
//! All operations the shell can dispatch.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── auth.rs     ◄─── Login credential check
//! ├── product.rs  ◄─── Catalog search, CRUD, stock
//! ├── customer.rs ◄─── Customer register
//! ├── discount.rs ◄─── Discount codes, apply/remove
//! ├── cart.rs     ◄─── Cart manipulation
//! └── sale.rs     ◄─── Checkout and history
//! ```
//!
//! Each command is a plain async function taking exactly the state it
//! needs (`DbState`, `CartState`, `ConfigState`) plus its parameters, and
//! returning a serializable response or an `AppError`. The shell renders
//! the response; the command never prints.

pub mod auth;
pub mod cart;
pub mod customer;
pub mod discount;
pub mod product;
pub mod sale;
