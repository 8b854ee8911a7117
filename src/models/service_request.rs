//! Service request (ticket) models for the SysAid API.
//!
//! This module defines the data structures for SRs as the API returns
//! them, plus the payload types used when creating or updating them.

use serde::{Deserialize, Serialize};

/// A single attribute of a service request.
///
/// The SysAid API represents every SR field as a key/value entry with
/// optional display captions, rather than as a fixed schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrAttribute {
    /// Field key (e.g., `sr_status`, `title`, `assigned_to`).
    pub key: String,

    /// Raw field value. The type varies per field (string, number, list).
    #[serde(default)]
    pub value: serde_json::Value,

    /// Human-readable rendering of the value.
    #[serde(rename = "valueCaption", default)]
    pub value_caption: Option<String>,

    /// Value type hint reported by the server. Not consistently typed
    /// across deployments, so kept raw.
    #[serde(rename = "valueClass", default)]
    pub value_class: serde_json::Value,

    /// Human-readable rendering of the key.
    #[serde(rename = "keyCaption", default)]
    pub key_caption: Option<String>,
}

/// A service request as returned by the SysAid API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Unique SR id (the API returns it as a string or an integer).
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u64,

    /// Whether the caller may update this SR.
    #[serde(rename = "canUpdate", default)]
    pub can_update: bool,

    /// Whether the caller may delete this SR.
    #[serde(rename = "canDelete", default)]
    pub can_delete: bool,

    /// Whether the caller may archive this SR.
    #[serde(rename = "canArchive", default)]
    pub can_archive: bool,

    /// Whether this SR has child requests.
    #[serde(rename = "hasChildren", default)]
    pub has_children: bool,

    /// The SR's fields. Which keys are present depends on the `fields`
    /// query parameter of the call that produced this SR.
    #[serde(default)]
    pub info: Vec<SrAttribute>,
}

impl ServiceRequest {
    /// Returns the attribute with the given key, if present.
    pub fn attribute(&self, key: &str) -> Option<&SrAttribute> {
        self.info.iter().find(|attr| attr.key == key)
    }

    /// Returns the raw value of the attribute with the given key.
    pub fn value(&self, key: &str) -> Option<&serde_json::Value> {
        self.attribute(key).map(|attr| &attr.value)
    }

    /// Returns the value of the attribute as a string slice, if it is one.
    pub fn value_str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(|v| v.as_str())
    }

    /// Returns the display caption of the attribute's value, if present.
    pub fn value_caption(&self, key: &str) -> Option<&str> {
        self.attribute(key)
            .and_then(|attr| attr.value_caption.as_deref())
    }
}

/// Deserializes an SR id that may arrive as a string or an integer.
fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an SR id as an integer or a numeric string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(value).map_err(|_| E::custom(format!("negative SR id: {}", value)))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            value
                .parse()
                .map_err(|_| E::custom(format!("non-numeric SR id: {:?}", value)))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// A key/value pair in a `create_sr` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrField {
    /// Field key.
    pub key: String,
    /// Field value.
    pub value: serde_json::Value,
}

impl SrField {
    /// Creates a field entry.
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The kind of service request to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SrType {
    /// An incident (the default).
    #[default]
    Incident,
    /// A service request proper.
    Request,
    /// A problem record.
    Problem,
    /// A change record.
    Change,
    /// All types (meaningful only for listing/templates).
    All,
}

impl SrType {
    /// The wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SrType::Incident => "incident",
            SrType::Request => "request",
            SrType::Problem => "problem",
            SrType::Change => "change",
            SrType::All => "all",
        }
    }
}

impl std::fmt::Display for SrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters for `create_sr`.
#[derive(Debug, Clone, Default)]
pub struct CreateSrOptions {
    /// SR kind to create.
    pub sr_type: SrType,

    /// View to apply to the returned SR.
    pub view: Option<String>,

    /// Template to instantiate.
    pub template_id: Option<u64>,
}

impl CreateSrOptions {
    /// Creates options for the given SR kind.
    pub fn new(sr_type: SrType) -> Self {
        Self {
            sr_type,
            ..Self::default()
        }
    }

    /// Sets the view.
    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Sets the template id.
    #[must_use]
    pub fn with_template_id(mut self, template_id: u64) -> Self {
        self.template_id = Some(template_id);
        self
    }

    /// Converts the options to query pairs.
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("type".to_string(), self.sr_type.as_str().to_string())];
        if let Some(ref view) = self.view {
            query.push(("view".to_string(), view.clone()));
        }
        if let Some(template_id) = self.template_id {
            query.push(("template_id".to_string(), template_id.to_string()));
        }
        query
    }
}
