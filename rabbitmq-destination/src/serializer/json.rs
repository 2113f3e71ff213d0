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

use super::RecordSerializer;
use crate::error::{Error, Result};
use crate::record::LogRecord;
use std::fmt;
use std::sync::Arc;

/// Maps a record to the JSON value that is actually written.
pub type JsonConverter = Arc<dyn Fn(&LogRecord) -> serde_json::Value + Send + Sync>;

/// Serializes records as JSON text. This is the destination's default serializer.
#[derive(Clone, Default)]
pub struct JsonRecordSerializer {
    converter: Option<JsonConverter>,
    pretty: bool,
}

impl JsonRecordSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented multi-line output. Combines with [`JsonRecordSerializer::with_converter`].
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Serializes the output of `converter` instead of the record itself.
    /// A converter returning `Value::Null` yields no text.
    pub fn with_converter<F>(converter: F) -> Self
    where
        F: Fn(&LogRecord) -> serde_json::Value + Send + Sync + 'static,
    {
        Self {
            converter: Some(Arc::new(converter)),
            pretty: false,
        }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    fn to_text<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        text.map_err(Error::serialization)
    }
}

impl RecordSerializer for JsonRecordSerializer {
    fn serialize(&self, record: &LogRecord) -> Result<Option<String>> {
        match &self.converter {
            Some(converter) => match converter(record) {
                serde_json::Value::Null => Ok(None),
                value => self.to_text(&value).map(Some),
            },
            None => self.to_text(record).map(Some),
        }
    }
}

impl fmt::Debug for JsonRecordSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonRecordSerializer")
            .field("converter", &self.converter.is_some())
            .field("pretty", &self.pretty)
            .finish()
    }
}
