//! # sysaid
//!
//! A client library for the SysAid ITSM REST API.
//!
//! The SysAid service permits only two logins per five-minute window per
//! account, so this client persists the session cookies issued at login
//! to a per-username file and reuses them across constructions. A session
//! rejected mid-flight triggers a single transparent re-login before the
//! error surfaces.
//!
//! ## Features
//!
//! - **Session reuse**: cookies are cached in `<username>_cookies.json`
//!   and written through on every (re-)login
//! - **Service request operations**: get, list, search, count, create,
//!   update, close, delete, links, attachments, activities, messages
//! - **Generic passthrough**: `make_request` reaches any endpoint with a
//!   caller-chosen verb
//! - **Security**: credentials are never logged or persisted, and are
//!   sanitized out of error messages
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`] - Credentials and connection configuration
//! - [`error`] - Error types with credential-sanitizing messages
//! - [`session`] - On-disk session cookie persistence
//! - [`endpoints`] - The per-endpoint HTTP verb and path table
//! - [`client`] - The authenticated HTTP client
//! - [`models`] - Data models for API requests and responses
//!
//! ## Usage
//!
//! ```ignore
//! use sysaid::client::SysaidClient;
//! use sysaid::config::Config;
//! use sysaid::models::ListParams;
//!
//! async fn example() -> Result<(), sysaid::error::SysaidError> {
//!     let config = Config::new("alice", "password", "acme")?;
//!     let client = SysaidClient::connect(config).await?;
//!
//!     // Fetch one ticket
//!     if let Some(sr) = client.get_sr(42).await? {
//!         println!("#{}: {:?}", sr.id, sr.value_str("title"));
//!     }
//!
//!     // List the 20 most recently updated incidents
//!     let params = ListParams::new()
//!         .with_type("incident")
//!         .with_sort("update_time")
//!         .with_dir("desc")
//!         .with_limit(20);
//!     for sr in client.get_sr_list(&params).await? {
//!         println!("#{}", sr.id);
//!     }
//!
//!     // Move a ticket to Open
//!     client.update_sr(42, serde_json::json!({"sr_status": "Open"})).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Clients are built from explicit values (`Config::new`,
//! `Config::with_base_url`) or from the environment (`Config::from_env`):
//!
//! - `SYSAID_USERNAME`: account username
//! - `SYSAID_PASSWORD`: account password
//! - `SYSAID_ENVIRONMENT`: tenant subdomain (resolves to
//!   `https://<env>.sysaidit.com/api/v1/`), or
//! - `SYSAID_BASE_URL`: explicit instance URL
//!
//! ## Security Considerations
//!
//! The password is stored only in memory and is:
//! - Never logged at any log level
//! - Never written to the cookie file
//! - Sanitized from error messages built from response bodies

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod session;

pub use client::SysaidClient;
pub use config::Config;
pub use error::SysaidError;
