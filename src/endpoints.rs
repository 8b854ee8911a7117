//! Per-endpoint HTTP method and path table.
//!
//! The SysAid REST documentation does not state which HTTP verb each
//! endpoint expects, which historically left the choice to caller
//! convention. This table fixes the mapping in one place so it is
//! testable and centrally correctable; every convenience wrapper on
//! [`SysaidClient`](crate::client::SysaidClient) dispatches through it.
//! The generic `make_request` escape hatch still accepts a caller-chosen
//! verb for endpoints the table does not cover.

use reqwest::Method;

/// A SysAid REST endpoint with its fixed HTTP verb and path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Authenticate and obtain session cookies.
    Login,
    /// Fetch one service request by id.
    GetSr(u64),
    /// List service requests.
    ListSrs,
    /// Full-text search over service requests.
    SearchSrs,
    /// Count service requests matching a filter.
    CountSrs,
    /// Create a service request.
    CreateSr,
    /// Update fields of a service request.
    UpdateSr(u64),
    /// Delete one or more service requests.
    DeleteSrs,
    /// Close a service request with a solution text.
    CloseSr(u64),
    /// Fetch a service request template.
    SrTemplate,
    /// Attach a named link to a service request.
    AddSrLink(u64),
    /// Remove a named link from a service request.
    DeleteSrLink(u64),
    /// Upload a file attachment to a service request.
    AddSrAttachment(u64),
    /// Remove a file attachment from a service request.
    DeleteSrAttachment(u64),
    /// Record an activity entry on a service request.
    AddSrActivity(u64),
    /// Remove an activity entry from a service request.
    DeleteSrActivity(u64),
    /// Send a message from a service request.
    SendSrMessage(u64),
    /// List users.
    ListUsers,
    /// Fetch one user by id.
    GetUser(u64),
}

impl Endpoint {
    /// Returns the HTTP verb this endpoint expects.
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Login => Method::POST,
            Endpoint::GetSr(_)
            | Endpoint::ListSrs
            | Endpoint::SearchSrs
            | Endpoint::CountSrs
            | Endpoint::SrTemplate
            | Endpoint::ListUsers
            | Endpoint::GetUser(_) => Method::GET,
            Endpoint::CreateSr
            | Endpoint::CloseSr(_)
            | Endpoint::AddSrLink(_)
            | Endpoint::AddSrAttachment(_)
            | Endpoint::AddSrActivity(_)
            | Endpoint::SendSrMessage(_) => Method::POST,
            Endpoint::UpdateSr(_) => Method::PUT,
            Endpoint::DeleteSrs
            | Endpoint::DeleteSrLink(_)
            | Endpoint::DeleteSrAttachment(_)
            | Endpoint::DeleteSrActivity(_) => Method::DELETE,
        }
    }

    /// Returns the path relative to the `/api/v1/` base.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "login".to_string(),
            Endpoint::GetSr(id) => format!("sr/{}", id),
            Endpoint::ListSrs => "sr".to_string(),
            Endpoint::SearchSrs => "sr/search".to_string(),
            Endpoint::CountSrs => "sr/count".to_string(),
            Endpoint::CreateSr => "sr".to_string(),
            Endpoint::UpdateSr(id) => format!("sr/{}", id),
            Endpoint::DeleteSrs => "sr".to_string(),
            Endpoint::CloseSr(id) => format!("sr/{}/close", id),
            Endpoint::SrTemplate => "sr/template".to_string(),
            Endpoint::AddSrLink(id) | Endpoint::DeleteSrLink(id) => format!("sr/{}/link", id),
            Endpoint::AddSrAttachment(id) | Endpoint::DeleteSrAttachment(id) => {
                format!("sr/{}/attachment", id)
            }
            Endpoint::AddSrActivity(id) | Endpoint::DeleteSrActivity(id) => {
                format!("sr/{}/activity", id)
            }
            Endpoint::SendSrMessage(id) => format!("sr/{}/message", id),
            Endpoint::ListUsers => "users".to_string(),
            Endpoint::GetUser(id) => format!("users/{}", id),
        }
    }
}
