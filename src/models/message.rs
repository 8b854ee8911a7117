//! Message payloads for sending notifications from a service request.

use serde::{Deserialize, Serialize};

/// A message sent from a service request to one or more users.
///
/// User ids in the To and CC fields are comma-separated; a group id is
/// surrounded by `[ ]`, per the SysAid documentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrMessage {
    /// Id of the sending user.
    #[serde(rename = "fromUserId")]
    pub from_user_id: String,

    /// Comma-separated recipient user ids.
    #[serde(rename = "toUsers")]
    pub to_users: String,

    /// Comma-separated CC user ids.
    #[serde(rename = "ccUsers", default)]
    pub cc_users: String,

    /// Message subject.
    #[serde(rename = "msgSubject")]
    pub subject: String,

    /// Message body.
    #[serde(rename = "msgBody")]
    pub body: String,
}

/// Delivery options for [`SrMessage`].
#[derive(Debug, Clone)]
pub struct MessageOptions {
    /// Delivery method (only `email` is documented).
    pub method: String,

    /// Whether to append the SR details to the message.
    pub add_sr_details: bool,

    /// Whether to attach the message to the SR.
    pub add_attachment_to_sr: bool,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            method: "email".to_string(),
            add_sr_details: true,
            add_attachment_to_sr: true,
        }
    }
}

impl MessageOptions {
    /// Converts the options to query pairs.
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("method".to_string(), self.method.clone()),
            (
                "addSrDetails".to_string(),
                self.add_sr_details.to_string(),
            ),
            (
                "addAttachmentToSr".to_string(),
                self.add_attachment_to_sr.to_string(),
            ),
        ]
    }
}
