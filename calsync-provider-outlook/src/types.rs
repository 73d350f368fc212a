//! Microsoft Graph wire types for calendar events and change notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Graph `event` resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ItemBody>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTimeTimeZone>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTimeTimeZone>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_all_day: bool,

    /// Read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl OutlookEvent {
    /// Body content, empty when the event has no body.
    pub fn body_content(&self) -> &str {
        self.body.as_ref().map(|b| b.content.as_str()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub content_type: BodyType,
    #[serde(default)]
    pub content: String,
}

impl ItemBody {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content_type: BodyType::Text,
            content: content.into(),
        }
    }
}

/// Graph returns lowercase values and accepts either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    #[serde(rename = "text", alias = "Text")]
    Text,
    #[serde(rename = "html", alias = "HTML", alias = "Html")]
    Html,
}

/// Local date-time plus the zone it is expressed in, e.g.
/// `{ "dateTime": "2024-01-01T09:00:00.0000000", "timeZone": "UTC" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

/// Body of a webhook POST from a Graph subscription.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeNotificationCollection {
    #[serde(default)]
    pub value: Vec<ChangeNotification>,
}

impl ChangeNotificationCollection {
    pub fn first(&self) -> Option<&ChangeNotification> {
        self.value.first()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNotification {
    pub id: Option<String>,
    pub subscription_id: Option<String>,
    pub change_type: Option<String>,
    pub resource: Option<String>,
    pub resource_data: Option<ResourceData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceData {
    pub id: Option<String>,
}

impl ChangeNotification {
    /// Id of the event this notification is about.
    ///
    /// Graph puts the event id in `resourceData.id`; bare payloads carry it
    /// as the entry's own `id`.
    pub fn event_id(&self) -> Option<&str> {
        self.resource_data
            .as_ref()
            .and_then(|r| r.id.as_deref())
            .or(self.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}
