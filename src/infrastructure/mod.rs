//! Infrastructure layer - Signing backends, token service, observability

pub mod logging;
pub mod observability;
pub mod signing;
pub mod token;
