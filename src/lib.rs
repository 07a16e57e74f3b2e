//! packmule library — exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;
