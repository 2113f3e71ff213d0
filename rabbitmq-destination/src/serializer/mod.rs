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

//! Record-to-text serializers.
//!
//! A serializer may legitimately produce no text for a record (`Ok(None)`); the
//! destination then publishes an empty payload. An `Err` is a real failure and is
//! propagated to the caller of `send`.

mod json;
mod template;

pub use json::{JsonConverter, JsonRecordSerializer};
pub use template::{TemplateRecordSerializer, DEFAULT_TEMPLATE};

use crate::error::Result;
use crate::record::LogRecord;

pub trait RecordSerializer: Send + Sync {
    fn serialize(&self, record: &LogRecord) -> Result<Option<String>>;
}
