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

use super::{AddressResolver, PublicationAddress};
use crate::error::{Error, Result};
use crate::record::LogRecord;

/// Resolver that returns the same address for every record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FixedAddressResolver {
    address: PublicationAddress,
}

impl FixedAddressResolver {
    /// Fixed address with an empty routing key.
    pub fn new(exchange_name: impl Into<String>, exchange_kind: impl Into<String>) -> Self {
        Self::with_routing_key(exchange_name, exchange_kind, Some(String::new()))
    }

    /// Fixed address with an explicit routing key. `None` is kept as an unset key.
    pub fn with_routing_key(
        exchange_name: impl Into<String>,
        exchange_kind: impl Into<String>,
        routing_key: Option<String>,
    ) -> Self {
        Self {
            address: PublicationAddress {
                exchange_name: exchange_name.into(),
                exchange_kind: exchange_kind.into(),
                routing_key,
            },
        }
    }

    /// Builds a resolver from optional parts.
    ///
    /// The outer `Option` of `routing_key` tells an omitted key (`None`, becomes `""`) apart
    /// from one explicitly supplied as unset (`Some(None)`, kept as `None`).
    pub fn try_from_parts(
        exchange_name: Option<&str>,
        exchange_kind: Option<&str>,
        routing_key: Option<Option<&str>>,
    ) -> Result<Self> {
        let exchange_name = exchange_name.ok_or(Error::InvalidArgument("exchange_name"))?;
        let exchange_kind = exchange_kind.ok_or(Error::InvalidArgument("exchange_kind"))?;
        let routing_key = match routing_key {
            None => Some(String::new()),
            Some(explicit) => explicit.map(str::to_string),
        };

        Ok(Self::with_routing_key(
            exchange_name,
            exchange_kind,
            routing_key,
        ))
    }

    pub fn address(&self) -> &PublicationAddress {
        &self.address
    }
}

impl AddressResolver for FixedAddressResolver {
    fn resolve(&self, _record: &LogRecord) -> PublicationAddress {
        self.address.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::FixedAddressResolver;
    use crate::address::{AddressResolver, PublicationAddress};
    use crate::error::Error;
    use crate::record::{LogRecord, LogType};

    #[test]
    fn omitted_routing_key_becomes_empty() {
        let resolver = FixedAddressResolver::try_from_parts(Some("logs"), Some("direct"), None)
            .expect("resolver should build");

        assert_eq!(resolver.address().routing_key.as_deref(), Some(""));
        assert_eq!(
            FixedAddressResolver::new("logs", "direct"),
            resolver,
            "shorthand constructor should match omitted key"
        );
    }

    #[test]
    fn explicit_unset_routing_key_is_preserved() {
        let resolver =
            FixedAddressResolver::try_from_parts(Some("logs"), Some("direct"), Some(None))
                .expect("resolver should build");

        assert_eq!(resolver.address().routing_key, None);
    }

    #[test]
    fn supplied_routing_key_is_kept() {
        let resolver =
            FixedAddressResolver::try_from_parts(Some("logs"), Some("direct"), Some(Some("R")))
                .expect("resolver should build");

        assert_eq!(resolver.address().routing_key.as_deref(), Some("R"));
    }

    #[test]
    fn missing_exchange_name_is_invalid_argument() {
        let err = FixedAddressResolver::try_from_parts(None, Some("direct"), None)
            .expect_err("exchange name is mandatory");

        assert!(matches!(err, Error::InvalidArgument("exchange_name")));
    }

    #[test]
    fn missing_exchange_kind_is_invalid_argument() {
        let err = FixedAddressResolver::try_from_parts(Some("logs"), None, Some(Some("R")))
            .expect_err("exchange kind is mandatory");

        assert!(matches!(err, Error::InvalidArgument("exchange_kind")));
    }

    #[test]
    fn resolves_same_address_for_any_record() {
        let resolver =
            FixedAddressResolver::with_routing_key("X", "direct", Some("R".to_string()));
        let expected = PublicationAddress::new("X", "direct", "R");
        let info = LogRecord::new(LogType::Info, "started").with_context("boot");
        let critical = LogRecord::new(LogType::Critical, "out of memory").with_tag("oom");

        assert_eq!(resolver.resolve(&info), expected);
        assert_eq!(resolver.resolve(&critical), expected);
    }

    #[test]
    fn repeated_resolution_is_stable() {
        let resolver = FixedAddressResolver::new("X", "fanout");
        let record = LogRecord::new(LogType::Event, "tick");

        assert_eq!(resolver.resolve(&record), resolver.resolve(&record));
    }
}
