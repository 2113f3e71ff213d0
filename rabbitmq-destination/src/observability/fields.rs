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

//! Value-format helpers for structured log fields.

use crate::address::PublicationAddress;
use crate::record::LogRecord;

/// Placeholder for a field that has no value.
pub const NONE: &str = "none";

pub fn format_record_id(record: &LogRecord) -> String {
    if record.id.is_empty() {
        NONE.to_string()
    } else {
        record.id.clone()
    }
}

pub fn format_address(address: &PublicationAddress) -> String {
    let routing_key = address.routing_key.as_deref().unwrap_or(NONE);
    format!(
        "{}:{}/{}",
        address.exchange_kind, address.exchange_name, routing_key
    )
}
