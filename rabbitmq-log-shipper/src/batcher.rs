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

//! Groups newline-delimited JSON records into batches.

use rabbitmq_destination::LogRecord;

pub(crate) struct RecordBatcher {
    batch_size: usize,
    pending: Vec<LogRecord>,
}

impl RecordBatcher {
    pub(crate) fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            pending: Vec::with_capacity(batch_size),
        }
    }

    /// Parses one input line. Returns a full batch once `batch_size` records are pending.
    /// Blank lines are ignored.
    pub(crate) fn push_line(
        &mut self,
        line: &str,
    ) -> Result<Option<Vec<LogRecord>>, serde_json::Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        self.pending.push(serde_json::from_str(line)?);
        if self.pending.len() >= self.batch_size {
            Ok(Some(self.take_pending()))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn take_pending(&mut self) -> Vec<LogRecord> {
        std::mem::replace(&mut self.pending, Vec::with_capacity(self.batch_size))
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
