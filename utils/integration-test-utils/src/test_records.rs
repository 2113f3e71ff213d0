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

use chrono::{TimeZone, Utc};
use rabbitmq_destination::{Error, LogRecord, LogType, RecordSerializer, Result};
use std::collections::HashSet;

/// Records with ids `"0"`, `"1"`, ... in order, all stamped with the same instant.
pub fn numbered_records(count: usize) -> Vec<LogRecord> {
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|index| {
            LogRecord::new(LogType::Info, format!("record {index}"))
                .with_id(index.to_string())
                .with_date(date)
        })
        .collect()
}

/// Serializes a record to its id.
pub struct IdSerializer;

impl RecordSerializer for IdSerializer {
    fn serialize(&self, record: &LogRecord) -> Result<Option<String>> {
        Ok(Some(record.id.clone()))
    }
}

/// Yields no text for the listed record ids and the id for every other record.
pub struct AbsentTextSerializer {
    absent_ids: HashSet<String>,
}

impl AbsentTextSerializer {
    pub fn for_ids(ids: &[&str]) -> Self {
        Self {
            absent_ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl RecordSerializer for AbsentTextSerializer {
    fn serialize(&self, record: &LogRecord) -> Result<Option<String>> {
        if self.absent_ids.contains(&record.id) {
            Ok(None)
        } else {
            Ok(Some(record.id.clone()))
        }
    }
}

/// Fails outright for one record id.
pub struct FailingSerializer {
    failing_id: String,
}

impl FailingSerializer {
    pub fn for_id(id: &str) -> Self {
        Self {
            failing_id: id.to_string(),
        }
    }
}

impl RecordSerializer for FailingSerializer {
    fn serialize(&self, record: &LogRecord) -> Result<Option<String>> {
        if record.id == self.failing_id {
            Err(Error::Serialization(format!(
                "cannot serialize record {}",
                record.id
            )))
        } else {
            Ok(Some(record.id.clone()))
        }
    }
}
