//! Integration tests for the install endpoint.
//!
//! These drive the axum router in-process with recording installer fakes;
//! no real package manager is invoked and no socket is bound.

mod helpers;
