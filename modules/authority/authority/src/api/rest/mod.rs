//! REST surface of the authority module.
//!
//! Routes orchestrate but don't contain business logic: handlers translate
//! DTOs into SDK requests and delegate to [`AuthenticationApi`](authority_sdk::AuthenticationApi).

pub mod dto;
pub mod error;
mod handlers;
pub mod routes;
