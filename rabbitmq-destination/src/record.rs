/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Log record model handed to the destination by the logging framework.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Severity / classification of a log record.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum LogType {
    Success,
    #[default]
    Info,
    Event,
    Warning,
    Failure,
    Error,
    Critical,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Success => "Success",
            LogType::Info => "Info",
            LogType::Event => "Event",
            LogType::Warning => "Warning",
            LogType::Failure => "Failure",
            LogType::Error => "Error",
            LogType::Critical => "Critical",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named attachment carried alongside a record.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LogItem {
    pub name: String,
    pub value: serde_json::Value,
}

impl LogItem {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One structured log entry. The destination only reads it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,
    #[serde(default)]
    pub log_type: LogType,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub items: Vec<LogItem>,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
}

impl LogRecord {
    /// Creates a record with a fresh identifier stamped with the current time.
    pub fn new(log_type: LogType, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().hyphenated().to_string(),
            log_type,
            context: None,
            source: None,
            description: Some(description.into()),
            tags: Vec::new(),
            items: Vec::new(),
            date: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_item(mut self, item: LogItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Returns `true` when this record's type is one of `log_types`.
    pub fn log_type_is_in(&self, log_types: &[LogType]) -> bool {
        log_types.contains(&self.log_type)
    }
}
