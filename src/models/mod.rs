//! Data models for the SysAid API.
//!
//! This module contains type definitions for the SysAid REST API,
//! including the service request response shape, write payload types,
//! and common query parameter builders.

mod activity;
mod common;
mod message;
mod service_request;

pub use activity::*;
pub use common::*;
pub use message::*;
pub use service_request::*;
