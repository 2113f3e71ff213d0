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

//! Set-once assembly of a [`RabbitMqDestination`].

use crate::address::{
    AddressResolver, ComputedAddressResolver, FixedAddressResolver, PublicationAddress,
};
use crate::broker::BrokerConnection;
use crate::destination::RabbitMqDestination;
use crate::error::{Error, Result};
use crate::properties::MessageProperties;
use crate::publisher::{BasicPublisher, MessagePublisher};
use crate::record::LogRecord;
use crate::serializer::{
    JsonRecordSerializer, RecordSerializer, TemplateRecordSerializer, DEFAULT_TEMPLATE,
};
use std::sync::Arc;

/// Collects the destination's dependencies, each of which may be set only once.
///
/// Connection and address resolver are mandatory. Publisher defaults to a
/// [`BasicPublisher`] without properties, serializer to [`JsonRecordSerializer`].
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use rabbitmq_destination::{
///     BrokerChannel, BrokerConnection, Error, LogRecord, LogType, RabbitMqDestinationBuilder,
/// };
///
/// # struct NoopConnection;
/// #
/// # #[async_trait]
/// # impl BrokerConnection for NoopConnection {
/// #     async fn create_channel(&self) -> Result<Arc<dyn BrokerChannel>, Error> {
/// #         Err(Error::transport("not used in builder doctest"))
/// #     }
/// # }
/// #
/// let destination = RabbitMqDestinationBuilder::new()
///     .with_connection(Arc::new(NoopConnection))?
///     .with_address_fn(|record: &LogRecord| {
///         let exchange = if record.log_type_is_in(&[LogType::Error, LogType::Critical]) {
///             "error-logs"
///         } else {
///             "info-logs"
///         };
///         rabbitmq_destination::PublicationAddress::new(exchange, "direct", "")
///     })?
///     .with_template_serializer("[{type}] {description}")?
///     .build()?;
///
/// // Configuring the same dependency twice is rejected.
/// assert!(RabbitMqDestinationBuilder::new()
///     .with_address("logs", "fanout", None)
///     .and_then(|builder| builder.with_address("other", "fanout", None))
///     .is_err());
/// # drop(destination);
/// # Ok::<(), Error>(())
/// ```
#[derive(Default)]
pub struct RabbitMqDestinationBuilder {
    connection: Option<Arc<dyn BrokerConnection>>,
    address_resolver: Option<Arc<dyn AddressResolver>>,
    serializer: Option<Arc<dyn RecordSerializer>>,
    publisher: Option<Arc<dyn MessagePublisher>>,
}

impl RabbitMqDestinationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_once<T: ?Sized>(slot: &mut Option<Arc<T>>, value: Arc<T>, what: &str) -> Result<()> {
        if slot.is_some() {
            return Err(Error::Configuration(format!(
                "{what} has already been set during this build"
            )));
        }
        *slot = Some(value);
        Ok(())
    }

    pub fn with_connection(mut self, connection: Arc<dyn BrokerConnection>) -> Result<Self> {
        Self::set_once(&mut self.connection, connection, "broker connection")?;
        Ok(self)
    }

    pub fn with_address_resolver(
        mut self,
        address_resolver: Arc<dyn AddressResolver>,
    ) -> Result<Self> {
        Self::set_once(
            &mut self.address_resolver,
            address_resolver,
            "address resolver",
        )?;
        Ok(self)
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn RecordSerializer>) -> Result<Self> {
        Self::set_once(&mut self.serializer, serializer, "record serializer")?;
        Ok(self)
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn MessagePublisher>) -> Result<Self> {
        Self::set_once(&mut self.publisher, publisher, "message publisher")?;
        Ok(self)
    }

    /// Fixed exchange address. A `None` routing key means the empty routing key.
    pub fn with_address(
        self,
        exchange_name: &str,
        exchange_kind: &str,
        routing_key: Option<&str>,
    ) -> Result<Self> {
        let resolver = FixedAddressResolver::try_from_parts(
            Some(exchange_name),
            Some(exchange_kind),
            routing_key.map(Some),
        )?;
        self.with_address_resolver(Arc::new(resolver))
    }

    pub fn with_address_fn<F>(self, address_fn: F) -> Result<Self>
    where
        F: Fn(&LogRecord) -> PublicationAddress + Send + Sync + 'static,
    {
        self.with_address_resolver(Arc::new(ComputedAddressResolver::new(address_fn)))
    }

    pub fn with_basic_publisher(self, properties: Option<MessageProperties>) -> Result<Self> {
        self.with_publisher(Arc::new(BasicPublisher::new(properties)))
    }

    pub fn with_json_serializer(self) -> Result<Self> {
        self.with_serializer(Arc::new(JsonRecordSerializer::new()))
    }

    pub fn with_pretty_json_serializer(self) -> Result<Self> {
        self.with_serializer(Arc::new(JsonRecordSerializer::new().pretty()))
    }

    pub fn with_json_converter<F>(self, converter: F) -> Result<Self>
    where
        F: Fn(&LogRecord) -> serde_json::Value + Send + Sync + 'static,
    {
        self.with_serializer(Arc::new(JsonRecordSerializer::with_converter(converter)))
    }

    pub fn with_pretty_json_converter<F>(self, converter: F) -> Result<Self>
    where
        F: Fn(&LogRecord) -> serde_json::Value + Send + Sync + 'static,
    {
        self.with_serializer(Arc::new(
            JsonRecordSerializer::with_converter(converter).pretty(),
        ))
    }

    pub fn with_template_serializer(self, template: &str) -> Result<Self> {
        self.with_serializer(Arc::new(TemplateRecordSerializer::new(template)))
    }

    pub fn with_default_template_serializer(self) -> Result<Self> {
        self.with_serializer(Arc::new(TemplateRecordSerializer::default()))
    }

    /// Template serializer writing `{tags}` and `{items}` as JSON.
    pub fn with_extended_template_serializer(self, template: &str) -> Result<Self> {
        self.with_serializer(Arc::new(TemplateRecordSerializer::extended(template)))
    }

    pub fn with_default_extended_template_serializer(self) -> Result<Self> {
        self.with_serializer(Arc::new(TemplateRecordSerializer::extended(
            DEFAULT_TEMPLATE,
        )))
    }

    pub fn build(self) -> Result<RabbitMqDestination> {
        let connection = self.connection.ok_or_else(|| {
            Error::Configuration("broker connection was not specified during the build".into())
        })?;
        let address_resolver = self.address_resolver.ok_or_else(|| {
            Error::Configuration("address resolver was not specified during the build".into())
        })?;

        let serializer = self
            .serializer
            .unwrap_or_else(|| Arc::new(JsonRecordSerializer::new()));
        let publisher = self
            .publisher
            .unwrap_or_else(|| Arc::new(BasicPublisher::default()));

        Ok(RabbitMqDestination::new(
            connection,
            address_resolver,
            serializer,
            publisher,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::RabbitMqDestinationBuilder;
    use crate::address::PublicationAddress;
    use crate::broker::{BrokerChannel, BrokerConnection};
    use crate::error::{Error, Result};
    use crate::publisher::BasicPublisher;
    use crate::record::{LogRecord, LogType};
    use crate::record::LogItem;
    use crate::serializer::{JsonRecordSerializer, RecordSerializer};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct UnusedConnection;

    #[async_trait]
    impl BrokerConnection for UnusedConnection {
        async fn create_channel(&self) -> Result<Arc<dyn BrokerChannel>> {
            Err(Error::transport("not used in builder tests"))
        }
    }

    fn expect_configuration_error(result: Result<RabbitMqDestinationBuilder>, needle: &str) {
        match result {
            Err(Error::Configuration(message)) => {
                assert!(message.contains(needle), "unexpected message: {message}")
            }
            Err(other) => panic!("expected configuration error, got {other:?}"),
            Ok(_) => panic!("expected configuration error, got a builder"),
        }
    }

    #[test]
    fn build_requires_connection() {
        let err = RabbitMqDestinationBuilder::new()
            .with_address("logs", "direct", None)
            .and_then(RabbitMqDestinationBuilder::build)
            .err()
            .expect("connection is mandatory");

        assert!(matches!(err, Error::Configuration(message) if message.contains("connection")));
    }

    #[test]
    fn build_requires_address_resolver() {
        let err = RabbitMqDestinationBuilder::new()
            .with_connection(Arc::new(UnusedConnection))
            .and_then(RabbitMqDestinationBuilder::build)
            .err()
            .expect("address resolver is mandatory");

        assert!(matches!(err, Error::Configuration(message) if message.contains("address")));
    }

    #[test]
    fn duplicate_connection_is_rejected() {
        let builder = RabbitMqDestinationBuilder::new()
            .with_connection(Arc::new(UnusedConnection))
            .expect("first set succeeds");

        expect_configuration_error(
            builder.with_connection(Arc::new(UnusedConnection)),
            "already been set",
        );
    }

    #[test]
    fn duplicate_serializer_is_rejected_across_shorthands() {
        let builder = RabbitMqDestinationBuilder::new()
            .with_json_serializer()
            .expect("first set succeeds");

        expect_configuration_error(
            builder.with_template_serializer("{id}"),
            "record serializer",
        );
    }

    #[test]
    fn duplicate_publisher_is_rejected() {
        let builder = RabbitMqDestinationBuilder::new()
            .with_basic_publisher(None)
            .expect("first set succeeds");

        expect_configuration_error(
            builder.with_publisher(Arc::new(BasicPublisher::default())),
            "message publisher",
        );
    }

    #[test]
    fn duplicate_address_is_rejected_across_variants() {
        let builder = RabbitMqDestinationBuilder::new()
            .with_address("logs", "direct", Some("app"))
            .expect("first set succeeds");

        expect_configuration_error(
            builder.with_address_fn(|_: &LogRecord| PublicationAddress::new("x", "direct", "")),
            "address resolver",
        );
    }

    #[test]
    fn omitted_optional_dependencies_get_defaults() {
        let destination = RabbitMqDestinationBuilder::new()
            .with_connection(Arc::new(UnusedConnection))
            .and_then(|builder| builder.with_address("logs", "direct", None))
            .and_then(RabbitMqDestinationBuilder::build)
            .expect("build should succeed");

        let record = LogRecord::new(LogType::Info, "x");
        assert_eq!(
            destination.address_resolver().resolve(&record),
            PublicationAddress::new("logs", "direct", "")
        );
        assert_eq!(
            destination.serializer().serialize(&record).expect("json"),
            JsonRecordSerializer::new().serialize(&record).expect("json")
        );
    }

    #[test]
    fn shorthand_address_keeps_supplied_routing_key() {
        let destination = RabbitMqDestinationBuilder::new()
            .with_connection(Arc::new(UnusedConnection))
            .and_then(|builder| builder.with_address("logs", "topic", Some("app.audit")))
            .and_then(RabbitMqDestinationBuilder::build)
            .expect("build should succeed");

        let address = destination
            .address_resolver()
            .resolve(&LogRecord::new(LogType::Event, "login"));
        assert_eq!(address.routing_key.as_deref(), Some("app.audit"));
    }

    fn build_with<F>(configure: F) -> crate::destination::RabbitMqDestination
    where
        F: FnOnce(RabbitMqDestinationBuilder) -> Result<RabbitMqDestinationBuilder>,
    {
        RabbitMqDestinationBuilder::new()
            .with_connection(Arc::new(UnusedConnection))
            .and_then(|builder| builder.with_address("logs", "direct", None))
            .and_then(configure)
            .and_then(RabbitMqDestinationBuilder::build)
            .expect("build should succeed")
    }

    #[test]
    fn pretty_json_converter_is_indented() {
        let destination = build_with(|builder| {
            builder.with_pretty_json_converter(|record: &LogRecord| json!({ "id": record.id }))
        });

        let text = destination
            .serializer()
            .serialize(&LogRecord::new(LogType::Info, "x").with_id("a"))
            .expect("json");

        assert_eq!(text.as_deref(), Some("{\n  \"id\": \"a\"\n}"));
    }

    #[test]
    fn extended_template_shorthand_renders_items_as_json() {
        let destination =
            build_with(|builder| builder.with_extended_template_serializer("{id} {items}"));

        let record = LogRecord::new(LogType::Info, "x")
            .with_id("a")
            .with_item(LogItem::new("user", "u-1"));
        let text = destination.serializer().serialize(&record).expect("template");

        assert_eq!(
            text.as_deref(),
            Some(r#"a [{"name":"user","value":"u-1"}]"#)
        );
    }

    #[test]
    fn extended_template_counts_as_the_serializer() {
        let builder = RabbitMqDestinationBuilder::new()
            .with_default_extended_template_serializer()
            .expect("first set succeeds");

        expect_configuration_error(builder.with_json_serializer(), "record serializer");
    }
}
