//! Rich embed descriptor.

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// One name/value row of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field heading
    pub name: String,
    /// Field body
    pub value: String,
    /// Render next to neighbouring inline fields
    pub inline: bool,
}

/// Structured rich-content block attached to a message.
///
/// The reactive core treats embeds as opaque and compares them by their
/// serialized form, so two independently built embeds with the same fields
/// are equal.
///
/// # Examples
///
/// ```
/// use quill_core::EmbedDescriptor;
///
/// let embed = EmbedDescriptor::default()
///     .title("Exception")
///     .description("frame 0")
///     .field("traceback", "...", false);
/// assert_eq!(embed.title.as_deref(), Some("Exception"));
/// assert_eq!(embed.fields.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(strip_option, into)]
pub struct EmbedDescriptor {
    /// Embed title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Embed body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link attached to the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Side bar colour (0xRRGGBB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// Footer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Name/value rows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[setters(skip)]
    pub fields: Vec<EmbedField>,
}

impl EmbedDescriptor {
    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Serialized form used for structural comparison.
    pub fn canonical(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Structural equality over the serialized form.
    pub fn renders_same_as(&self, other: &EmbedDescriptor) -> bool {
        self.canonical() == other.canonical()
    }
}
