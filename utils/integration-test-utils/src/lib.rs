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

mod in_memory_broker;
pub use in_memory_broker::{InMemoryChannel, InMemoryConnection, PublishedMessage};

mod test_records;
pub use test_records::{
    numbered_records, AbsentTextSerializer, FailingSerializer, IdSerializer,
};

use tracing_subscriber::EnvFilter;

/// Installs a test-friendly `tracing` subscriber once per process.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
