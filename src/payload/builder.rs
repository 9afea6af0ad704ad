//! Fluent builder turning loose notification attributes into a payload.

use bytes::Bytes;
use serde_json::{Map, Value};

use super::{Alert, Aps, Payload};
use crate::error::Result;

/// Builder for notification payloads.
///
/// # Example
///
/// ```
/// use apns_wire::payload::PayloadBuilder;
/// use serde_json::json;
///
/// let bytes = PayloadBuilder::new()
///     .alert("sample")
///     .field("foo", json!("bar"))
///     .build(2048)
///     .unwrap();
///
/// assert_eq!(&bytes[..], br#"{"aps":{"alert":"sample"},"foo":"bar"}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    alert: Option<String>,
    badge: Option<u32>,
    sound: Option<String>,
    category: Option<String>,
    content_available: bool,
    extra: Map<String, Value>,
    loc_key: Option<String>,
    action_loc_key: Option<String>,
    loc_args: Option<Value>,
}

impl PayloadBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Alert text. Becomes `body` when localization parts are also set.
    pub fn alert(mut self, text: impl Into<String>) -> Self {
        self.alert = Some(text.into());
        self
    }

    /// Badge number.
    pub fn badge(mut self, badge: u32) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Sound file name.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Category identifier.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Mark the notification as a background content update.
    pub fn content_available(mut self, available: bool) -> Self {
        self.content_available = available;
        self
    }

    /// Replace all custom root keys.
    pub fn extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Add one custom root key.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Localization key for the alert message.
    pub fn loc_key(mut self, key: impl Into<String>) -> Self {
        self.loc_key = Some(key.into());
        self
    }

    /// Localization key for the action button.
    pub fn action_loc_key(mut self, key: impl Into<String>) -> Self {
        self.action_loc_key = Some(key.into());
        self
    }

    /// Arguments for `loc-key`, normally an array of strings.
    pub fn loc_args(mut self, args: impl Into<Value>) -> Self {
        self.loc_args = Some(args.into());
        self
    }

    /// Assemble the typed payload.
    pub fn payload(&self) -> Payload {
        let alert = Alert::from_parts(
            self.alert.clone(),
            self.loc_key.clone(),
            self.action_loc_key.clone(),
            self.loc_args.clone(),
        );

        Payload {
            aps: Aps {
                alert,
                badge: self.badge,
                sound: self.sound.clone(),
                category: self.category.clone(),
                content_available: self.content_available,
            },
            extra: self.extra.clone(),
        }
    }

    /// Serialize the payload, failing when it is longer than `max_size`.
    ///
    /// # Errors
    ///
    /// - `DataOverflow` carrying the actual size and `max_size`
    /// - `InvalidPayload` when a custom key is `aps`
    pub fn build(&self, max_size: usize) -> Result<Bytes> {
        self.payload().encode(max_size)
    }
}
