//! Service layer providing the business rules on top of the entities.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Raises tagged error kinds only; HTTP status mapping happens upstream.

pub mod booking_service;
pub mod booking_state;
pub mod errors;
pub mod fetch;
pub mod item_service;
pub mod mapping;
pub mod request_service;
pub mod user_service;

#[cfg(test)]
pub mod test_support;
