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

//! Publication addresses and the strategies that pick one per record.

mod computed;
mod fixed;

pub use computed::{AddressFn, ComputedAddressResolver};
pub use fixed::FixedAddressResolver;

use crate::record::LogRecord;
use std::fmt;

/// Where a serialized record is delivered: exchange identity plus routing key.
///
/// `routing_key` is `None` only when a caller explicitly asked for an unset key;
/// resolvers that are simply not given a key use the empty string.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PublicationAddress {
    pub exchange_name: String,
    pub exchange_kind: String,
    pub routing_key: Option<String>,
}

impl PublicationAddress {
    pub fn new(
        exchange_name: impl Into<String>,
        exchange_kind: impl Into<String>,
        routing_key: impl Into<String>,
    ) -> Self {
        Self {
            exchange_name: exchange_name.into(),
            exchange_kind: exchange_kind.into(),
            routing_key: Some(routing_key.into()),
        }
    }

    /// Routing key as sent on the wire, where an unset key becomes empty.
    pub fn wire_routing_key(&self) -> &str {
        self.routing_key.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for PublicationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}/{}",
            self.exchange_kind,
            self.exchange_name,
            self.wire_routing_key()
        )
    }
}

/// Chooses the [`PublicationAddress`] for one record.
///
/// Implementations must not depend on channel state; the destination may call
/// `resolve` before or after acquiring a channel.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, record: &LogRecord) -> PublicationAddress;
}

impl<F> AddressResolver for F
where
    F: Fn(&LogRecord) -> PublicationAddress + Send + Sync,
{
    fn resolve(&self, record: &LogRecord) -> PublicationAddress {
        self(record)
    }
}
