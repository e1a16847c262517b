//! Application services: logic that sits between the route handlers and the
//! database/gateway layers.

pub mod checkout;
