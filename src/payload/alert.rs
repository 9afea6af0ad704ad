//! The `alert` member of the `aps` dictionary.
//!
//! On the wire an alert is either a bare string or a localization
//! dictionary. Callers supply loose parts (text, `loc-key`,
//! `action-loc-key`, `loc-args`) and [`Alert::from_parts`] picks the
//! variant.

use serde::Serialize;
use serde_json::Value;

/// Alert shown by the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Alert {
    /// Plain text alert, serialized as a JSON string.
    Plain(String),
    /// Localized alert, serialized as a JSON object.
    Localized(LocalizedAlert),
}

/// Localization dictionary form of an alert.
///
/// Members are emitted in declaration order; absent members are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalizedAlert {
    /// Text shown alongside the localized content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Localization key for the action button title.
    #[serde(rename = "action-loc-key", skip_serializing_if = "Option::is_none")]
    pub action_loc_key: Option<String>,
    /// Format arguments for `loc-key`. Passed through verbatim.
    #[serde(rename = "loc-args", skip_serializing_if = "Option::is_none")]
    pub loc_args: Option<Value>,
    /// Localization key for the alert message.
    #[serde(rename = "loc-key", skip_serializing_if = "Option::is_none")]
    pub loc_key: Option<String>,
}

impl LocalizedAlert {
    /// True when any localization member is set.
    fn has_localization(&self) -> bool {
        self.loc_key.is_some() || self.action_loc_key.is_some() || self.loc_args.is_some()
    }
}

impl Alert {
    /// Choose the alert form from its loose parts.
    ///
    /// - any localization part present: `Localized`, with `body` set to
    ///   `text` when given
    /// - otherwise `text` present: `Plain`
    /// - otherwise: no alert
    ///
    /// # Example
    ///
    /// ```
    /// use apns_wire::payload::Alert;
    ///
    /// let alert = Alert::from_parts(Some("hi".into()), None, None, None);
    /// assert_eq!(alert, Some(Alert::Plain("hi".into())));
    /// assert_eq!(Alert::from_parts(None, None, None, None), None);
    /// ```
    pub fn from_parts(
        text: Option<String>,
        loc_key: Option<String>,
        action_loc_key: Option<String>,
        loc_args: Option<Value>,
    ) -> Option<Self> {
        let localized = LocalizedAlert {
            body: None,
            action_loc_key,
            loc_args,
            loc_key,
        };

        if localized.has_localization() {
            return Some(Alert::Localized(LocalizedAlert {
                body: text,
                ..localized
            }));
        }

        text.map(Alert::Plain)
    }
}

impl From<&str> for Alert {
    fn from(text: &str) -> Self {
        Alert::Plain(text.to_string())
    }
}

impl From<String> for Alert {
    fn from(text: String) -> Self {
        Alert::Plain(text)
    }
}

impl From<LocalizedAlert> for Alert {
    fn from(localized: LocalizedAlert) -> Self {
        Alert::Localized(localized)
    }
}
