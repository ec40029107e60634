//! # Customer Commands
//!
//! Customer register operations.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::DbState;
use ferro_core::validation::validate_name;
use ferro_core::{CoreError, Customer};

/// Customer DTO for shell display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        CustomerDto {
            id: c.id,
            name: c.name,
            phone: c.phone,
            email: c.email,
            address: c.address,
        }
    }
}

/// Input for registering a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Lists the customer register sorted by name.
pub async fn list_customers(db: &DbState, limit: Option<u32>) -> Result<Vec<CustomerDto>, AppError> {
    let limit = limit.unwrap_or(50).min(200);
    debug!(limit = %limit, "list_customers command");

    let customers = db.inner().customers().list(limit).await?;
    Ok(customers.into_iter().map(CustomerDto::from).collect())
}

/// Registers a new customer.
pub async fn add_customer(db: &DbState, input: NewCustomer) -> Result<CustomerDto, AppError> {
    debug!(name = %input.name, "add_customer command");

    validate_name(&input.name).map_err(CoreError::from)?;

    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        name: input.name.trim().to_string(),
        phone: input.phone.trim().to_string(),
        email: input.email.trim().to_string(),
        address: input.address.trim().to_string(),
        created_at: Utc::now(),
    };

    db.inner().customers().insert(&customer).await?;

    info!(name = %customer.name, "Customer registered");
    Ok(CustomerDto::from(customer))
}

/// Finds a single customer by id or name fragment.
pub async fn find_customer(db: &DbState, query: &str) -> Result<CustomerDto, AppError> {
    debug!(query = %query, "find_customer command");

    let customer = db
        .inner()
        .customers()
        .find(query)
        .await?
        .ok_or_else(|| AppError::not_found("Customer", query))?;

    Ok(CustomerDto::from(customer))
}

/// Removes a customer from the register.
pub async fn remove_customer(db: &DbState, query: &str) -> Result<(), AppError> {
    debug!(query = %query, "remove_customer command");

    let customer = db
        .inner()
        .customers()
        .find(query)
        .await?
        .ok_or_else(|| AppError::not_found("Customer", query))?;

    db.inner().customers().delete(&customer.id).await?;

    info!(name = %customer.name, "Customer removed");
    Ok(())
}
