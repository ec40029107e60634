//! # Cart State
//!
//! Holds the open cart for the session.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>`: command handlers run on the
//! async runtime and must take the lock to read or mutate. The cart math
//! itself lives in `ferro_core::cart`; this is only the session wrapper.

use std::sync::{Arc, Mutex};

use ferro_core::Cart;

/// Session-managed cart state.
///
/// ## Why Not RwLock?
/// Cart operations are quick and most of them mutate. A RwLock would add
/// complexity with minimal benefit.
#[derive(Debug)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}
