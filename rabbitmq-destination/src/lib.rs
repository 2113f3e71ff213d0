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

//! # rabbitmq-destination
//!
//! `rabbitmq-destination` delivers batches of structured log records to a RabbitMQ
//! exchange.
//!
//! Each record of a batch is serialized to UTF-8 text, given a [`PublicationAddress`] by an
//! [`AddressResolver`], and handed to a [`MessagePublisher`] together with a broker channel.
//! Channels are drawn from a shared [`BrokerConnection`]; one channel is reused across a
//! batch and transparently replaced when it reports closed.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use async_trait::async_trait;
//! use rabbitmq_destination::{
//!     BrokerChannel, BrokerConnection, Error, LogRecord, LogType, MessageProperties,
//!     PublicationAddress, RabbitMqDestination,
//! };
//!
//! # #[derive(Default)]
//! # struct MemoryChannel {
//! #     sent: Mutex<Vec<(String, Vec<u8>)>>,
//! # }
//! #
//! # #[async_trait]
//! # impl BrokerChannel for MemoryChannel {
//! #     fn channel_id(&self) -> u16 { 1 }
//! #     fn is_closed(&self) -> bool { false }
//! #     async fn basic_publish(
//! #         &self,
//! #         address: &PublicationAddress,
//! #         _properties: Option<&MessageProperties>,
//! #         payload: &[u8],
//! #     ) -> Result<(), Error> {
//! #         self.sent.lock().unwrap().push((address.to_string(), payload.to_vec()));
//! #         Ok(())
//! #     }
//! # }
//! #
//! # #[derive(Default)]
//! # struct MemoryConnection {
//! #     channel: Arc<MemoryChannel>,
//! # }
//! #
//! # #[async_trait]
//! # impl BrokerConnection for MemoryConnection {
//! #     async fn create_channel(&self) -> Result<Arc<dyn BrokerChannel>, Error> {
//! #         Ok(self.channel.clone())
//! #     }
//! # }
//! #
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let connection = Arc::new(MemoryConnection::default());
//! let destination =
//!     RabbitMqDestination::for_exchange(connection.clone(), "logs", "direct", "app");
//!
//! destination
//!     .send(&[
//!         LogRecord::new(LogType::Info, "service started"),
//!         LogRecord::new(LogType::Error, "upstream timed out"),
//!     ])
//!     .await
//!     .unwrap();
//! # assert_eq!(connection.channel.sent.lock().unwrap().len(), 2);
//! # });
//! ```
//!
//! ## Assembling a destination
//!
//! [`RabbitMqDestinationBuilder`] validates the configuration once, up front: the
//! connection and address resolver are mandatory, every dependency may be set only once,
//! and the serializer / publisher fall back to [`JsonRecordSerializer`] and
//! [`BasicPublisher`].
//!
//! ## Failure model
//!
//! `send` either publishes every record in order or returns the first error after a
//! prefix of the batch has been published. A serializer that produces no text is not an
//! error; the record goes out with an empty payload. The only automatic recovery is
//! replacing a channel that reports closed before the next record is published.
//!
//! ## Broker adapters
//!
//! With the `lapin-transport` feature, `LapinConnection` implements the broker seam on
//! top of the `lapin` AMQP client.
//!
//! ## Observability model
//!
//! The crate emits `tracing` events whose names live in [`observability::events`].
//! Library code never installs a global subscriber; binaries and tests do that.

mod address;
pub use address::{
    AddressFn, AddressResolver, ComputedAddressResolver, FixedAddressResolver,
    PublicationAddress,
};

mod broker;
pub use broker::{BrokerChannel, BrokerConnection};
#[cfg(feature = "lapin-transport")]
pub use broker::{LapinChannel, LapinConnection};

mod builder;
pub use builder::RabbitMqDestinationBuilder;

mod destination;
pub use destination::{LogDestination, RabbitMqDestination};

mod error;
pub use error::{Error, Result};

#[doc(hidden)]
pub mod observability;

mod properties;
pub use properties::{DeliveryMode, MessageProperties};

mod publisher;
pub use publisher::{BasicPublisher, MessagePublisher};

mod record;
pub use record::{LogItem, LogRecord, LogType};

mod serializer;
pub use serializer::{
    JsonConverter, JsonRecordSerializer, RecordSerializer, TemplateRecordSerializer,
    DEFAULT_TEMPLATE,
};

pub use tokio_util::sync::CancellationToken;
