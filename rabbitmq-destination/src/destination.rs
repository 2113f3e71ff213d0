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

//! The destination: serializes, addresses and publishes each record of a batch.

use crate::address::{AddressResolver, FixedAddressResolver};
use crate::broker::{BrokerChannel, BrokerConnection};
use crate::error::{Error, Result};
use crate::observability::{events, fields};
use crate::publisher::{BasicPublisher, MessagePublisher};
use crate::record::LogRecord;
use crate::serializer::{JsonRecordSerializer, RecordSerializer};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Level};

const COMPONENT: &str = "destination";

/// Interface the logging framework drives: one call per batch of records.
#[async_trait]
pub trait LogDestination: Send + Sync {
    async fn send(&self, records: &[LogRecord]) -> Result<()>;

    /// Like [`LogDestination::send`], but gives up with [`Error::Cancelled`] when
    /// `cancellation` has already fired. Once started, the batch runs to completion.
    async fn send_cancellable(
        &self,
        records: &[LogRecord],
        cancellation: &CancellationToken,
    ) -> Result<()> {
        if cancellation.is_cancelled() {
            debug!(
                event = events::SEND_CANCELLED,
                component = COMPONENT,
                batch_len = records.len(),
                "send cancelled before start"
            );
            return Err(Error::Cancelled);
        }
        self.send(records).await
    }
}

/// Delivers log records to a RabbitMQ exchange.
///
/// The broker connection is shared and outlives every send. Channels are drawn from it
/// per send call: the first record opens one, later records reuse it, and a channel that
/// reports closed is replaced before the next record is published.
///
/// Concurrent sends on one destination each use their own channel; the connection is the
/// only state they share.
#[derive(Clone)]
pub struct RabbitMqDestination {
    connection: Arc<dyn BrokerConnection>,
    address_resolver: Arc<dyn AddressResolver>,
    serializer: Arc<dyn RecordSerializer>,
    publisher: Arc<dyn MessagePublisher>,
}

impl RabbitMqDestination {
    pub fn new(
        connection: Arc<dyn BrokerConnection>,
        address_resolver: Arc<dyn AddressResolver>,
        serializer: Arc<dyn RecordSerializer>,
        publisher: Arc<dyn MessagePublisher>,
    ) -> Self {
        Self {
            connection,
            address_resolver,
            serializer,
            publisher,
        }
    }

    /// JSON serializer and a basic publisher without message properties.
    pub fn with_defaults(
        connection: Arc<dyn BrokerConnection>,
        address_resolver: Arc<dyn AddressResolver>,
    ) -> Self {
        Self::with_serializer(
            connection,
            address_resolver,
            Arc::new(JsonRecordSerializer::new()),
        )
    }

    pub fn with_serializer(
        connection: Arc<dyn BrokerConnection>,
        address_resolver: Arc<dyn AddressResolver>,
        serializer: Arc<dyn RecordSerializer>,
    ) -> Self {
        Self::new(
            connection,
            address_resolver,
            serializer,
            Arc::new(BasicPublisher::default()),
        )
    }

    /// Every record goes to one exchange with one routing key.
    pub fn for_exchange(
        connection: Arc<dyn BrokerConnection>,
        exchange_name: &str,
        exchange_kind: &str,
        routing_key: &str,
    ) -> Self {
        Self::with_defaults(
            connection,
            Arc::new(FixedAddressResolver::with_routing_key(
                exchange_name,
                exchange_kind,
                Some(routing_key.to_string()),
            )),
        )
    }

    pub fn connection(&self) -> &Arc<dyn BrokerConnection> {
        &self.connection
    }

    pub fn address_resolver(&self) -> &Arc<dyn AddressResolver> {
        &self.address_resolver
    }

    pub fn serializer(&self) -> &Arc<dyn RecordSerializer> {
        &self.serializer
    }

    pub fn publisher(&self) -> &Arc<dyn MessagePublisher> {
        &self.publisher
    }

    /// Publishes `records` in order, one message per record.
    ///
    /// On error the records before the failing one have been published and the rest,
    /// including the failing one, have not. The failing record is not retried.
    pub async fn send(&self, records: &[LogRecord]) -> Result<()> {
        debug!(
            event = events::SEND_START,
            component = COMPONENT,
            batch_len = records.len(),
            "send started"
        );

        let mut channel: Option<Arc<dyn BrokerChannel>> = None;

        for (index, record) in records.iter().enumerate() {
            if let Err(err) = self.send_record(index, record, &mut channel).await {
                warn!(
                    event = events::SEND_FAILED,
                    component = COMPONENT,
                    batch_len = records.len(),
                    record_index = index,
                    record_id = fields::format_record_id(record).as_str(),
                    err = %err,
                    "send aborted; remaining records not published"
                );
                return Err(err);
            }
        }

        debug!(
            event = events::SEND_DONE,
            component = COMPONENT,
            batch_len = records.len(),
            "send finished"
        );
        Ok(())
    }

    /// [`RabbitMqDestination::send`] with a cancellation check before any work starts.
    pub async fn send_with_cancellation(
        &self,
        records: &[LogRecord],
        cancellation: &CancellationToken,
    ) -> Result<()> {
        LogDestination::send_cancellable(self, records, cancellation).await
    }

    /// Runs [`RabbitMqDestination::send`] to completion on the calling thread.
    ///
    /// Must not be called from inside an async task.
    pub fn send_blocking(&self, records: &[LogRecord]) -> Result<()> {
        futures::executor::block_on(self.send(records))
    }

    async fn send_record(
        &self,
        index: usize,
        record: &LogRecord,
        channel_slot: &mut Option<Arc<dyn BrokerChannel>>,
    ) -> Result<()> {
        let payload = self.payload_for(record)?;
        let address = self.address_resolver.resolve(record);
        let channel = self.ensure_channel(channel_slot).await?;

        if tracing::enabled!(Level::DEBUG) {
            debug!(
                event = events::PUBLISH_ATTEMPT,
                component = COMPONENT,
                record_index = index,
                record_id = fields::format_record_id(record).as_str(),
                address = fields::format_address(&address).as_str(),
                channel_id = channel.channel_id(),
                payload_len = payload.len(),
                "publishing record"
            );
        }

        if let Err(err) = self
            .publisher
            .publish(channel.as_ref(), &address, &payload)
            .await
        {
            warn!(
                event = events::PUBLISH_FAILED,
                component = COMPONENT,
                record_index = index,
                channel_id = channel.channel_id(),
                address = fields::format_address(&address).as_str(),
                err = %err,
                "publish failed"
            );
            return Err(err);
        }

        debug!(
            event = events::PUBLISH_OK,
            component = COMPONENT,
            record_index = index,
            channel_id = channel.channel_id(),
            "publish succeeded"
        );
        Ok(())
    }

    /// Serializes a record to UTF-8 bytes; an absent result becomes an empty payload.
    fn payload_for(&self, record: &LogRecord) -> Result<Vec<u8>> {
        match self.serializer.serialize(record) {
            Ok(Some(text)) => Ok(text.into_bytes()),
            Ok(None) => {
                debug!(
                    event = events::SERIALIZE_EMPTY,
                    component = COMPONENT,
                    record_id = fields::format_record_id(record).as_str(),
                    "serializer produced no text; publishing empty payload"
                );
                Ok(Vec::new())
            }
            Err(err) => {
                warn!(
                    event = events::SERIALIZE_FAILED,
                    component = COMPONENT,
                    record_id = fields::format_record_id(record).as_str(),
                    err = %err,
                    "serializer failed"
                );
                Err(err)
            }
        }
    }

    /// Returns the channel for the next publish, opening one when the slot is empty or
    /// holds a closed channel. A freshly opened channel is not probed.
    async fn ensure_channel(
        &self,
        channel_slot: &mut Option<Arc<dyn BrokerChannel>>,
    ) -> Result<Arc<dyn BrokerChannel>> {
        let replacing = match channel_slot {
            Some(channel) if !channel.is_closed() => return Ok(Arc::clone(channel)),
            Some(closed) => Some(closed.channel_id()),
            None => None,
        };

        let channel = match self.connection.create_channel().await {
            Ok(channel) => channel,
            Err(err) => {
                warn!(
                    event = events::CHANNEL_CREATE_FAILED,
                    component = COMPONENT,
                    err = %err,
                    "unable to open broker channel"
                );
                return Err(err);
            }
        };

        match replacing {
            Some(closed_id) => debug!(
                event = events::CHANNEL_REPLACE,
                component = COMPONENT,
                closed_channel_id = closed_id,
                channel_id = channel.channel_id(),
                "replaced closed channel"
            ),
            None => debug!(
                event = events::CHANNEL_CREATE,
                component = COMPONENT,
                channel_id = channel.channel_id(),
                "opened channel"
            ),
        }

        *channel_slot = Some(Arc::clone(&channel));
        Ok(channel)
    }
}

#[async_trait]
impl LogDestination for RabbitMqDestination {
    async fn send(&self, records: &[LogRecord]) -> Result<()> {
        RabbitMqDestination::send(self, records).await
    }
}
