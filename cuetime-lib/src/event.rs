//! Rundown event records referenced by the runtime snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timer::Direction;

/// User-defined field attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomField {
    pub value: String,
}

impl CustomField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A scheduled entry in the rundown.
///
/// Times are milliseconds since midnight.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    pub cue: String,
    pub title: String,
    pub subtitle: String,
    pub presenter: String,
    pub note: String,
    pub colour: String,
    pub time_start: i64,
    pub time_end: i64,
    pub duration: i64,
    pub is_public: bool,
    pub skip: bool,
    pub timer_type: Direction,
    pub custom: BTreeMap<String, CustomField>,
}

impl Event {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Attach or replace a custom field.
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), CustomField::new(value));
        self
    }

    /// Value of a built-in attribute, addressed by its wire name, as text.
    ///
    /// Returns `None` for names that are not built-in attributes.
    pub fn attribute(&self, name: &str) -> Option<String> {
        let value = match name {
            "id" => self.id.clone(),
            "cue" => self.cue.clone(),
            "title" => self.title.clone(),
            "subtitle" => self.subtitle.clone(),
            "presenter" => self.presenter.clone(),
            "note" => self.note.clone(),
            "colour" => self.colour.clone(),
            "timeStart" => self.time_start.to_string(),
            "timeEnd" => self.time_end.to_string(),
            "duration" => self.duration.to_string(),
            "isPublic" => self.is_public.to_string(),
            "skip" => self.skip.to_string(),
            "timerType" => self.timer_type.to_string(),
            _ => return None,
        };
        Some(value)
    }
}
