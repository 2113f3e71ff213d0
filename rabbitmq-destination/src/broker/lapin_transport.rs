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

//! `lapin`-backed implementation of the broker seam.

use super::{BrokerChannel, BrokerConnection};
use crate::address::PublicationAddress;
use crate::error::{Error, Result};
use crate::observability::events;
use crate::properties::MessageProperties;
use async_trait::async_trait;
use lapin::options::BasicPublishOptions;
use lapin::types::{AMQPValue, FieldTable, LongString, ShortString};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use std::sync::Arc;
use tracing::{debug, info};

const COMPONENT: &str = "lapin_transport";

/// Shared AMQP connection. Cloning shares the underlying socket.
#[derive(Clone)]
pub struct LapinConnection {
    connection: Arc<Connection>,
}

impl LapinConnection {
    pub async fn connect(uri: &str) -> Result<Self> {
        let connection = Connection::connect(uri, ConnectionProperties::default())
            .await
            .map_err(Error::transport)?;
        info!(
            event = events::BROKER_CONNECTED,
            component = COMPONENT,
            "connected to broker"
        );
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Arc::new(connection),
        }
    }

    pub fn inner(&self) -> &Connection {
        &self.connection
    }
}

#[async_trait]
impl BrokerConnection for LapinConnection {
    async fn create_channel(&self) -> Result<Arc<dyn BrokerChannel>> {
        let channel = self
            .connection
            .create_channel()
            .await
            .map_err(Error::transport)?;
        debug!(
            event = events::BROKER_CHANNEL_OPENED,
            component = COMPONENT,
            channel_id = channel.id(),
            "broker channel opened"
        );
        Ok(Arc::new(LapinChannel { channel }))
    }
}

pub struct LapinChannel {
    channel: Channel,
}

impl LapinChannel {
    /// Exchange and routing key as sent on the wire; an unset routing key goes out empty.
    fn publish_target(address: &PublicationAddress) -> (&str, &str) {
        (&address.exchange_name, address.wire_routing_key())
    }

    fn basic_properties_for(properties: Option<&MessageProperties>) -> BasicProperties {
        properties
            .map(Self::to_basic_properties)
            .unwrap_or_default()
    }

    fn to_basic_properties(properties: &MessageProperties) -> BasicProperties {
        let mut basic = BasicProperties::default();
        if let Some(content_type) = &properties.content_type {
            basic = basic.with_content_type(ShortString::from(content_type.as_str()));
        }
        if let Some(content_encoding) = &properties.content_encoding {
            basic = basic.with_content_encoding(ShortString::from(content_encoding.as_str()));
        }
        if let Some(delivery_mode) = properties.delivery_mode {
            basic = basic.with_delivery_mode(delivery_mode.as_amqp());
        }
        if let Some(priority) = properties.priority {
            basic = basic.with_priority(priority);
        }
        if let Some(correlation_id) = &properties.correlation_id {
            basic = basic.with_correlation_id(ShortString::from(correlation_id.as_str()));
        }
        if let Some(reply_to) = &properties.reply_to {
            basic = basic.with_reply_to(ShortString::from(reply_to.as_str()));
        }
        if let Some(expiration) = &properties.expiration {
            basic = basic.with_expiration(ShortString::from(expiration.as_str()));
        }
        if let Some(message_id) = &properties.message_id {
            basic = basic.with_message_id(ShortString::from(message_id.as_str()));
        }
        if let Some(message_kind) = &properties.message_kind {
            basic = basic.with_type(ShortString::from(message_kind.as_str()));
        }
        if let Some(user_id) = &properties.user_id {
            basic = basic.with_user_id(ShortString::from(user_id.as_str()));
        }
        if let Some(app_id) = &properties.app_id {
            basic = basic.with_app_id(ShortString::from(app_id.as_str()));
        }
        if !properties.headers.is_empty() {
            let mut headers = FieldTable::default();
            for (name, value) in &properties.headers {
                headers.insert(
                    ShortString::from(name.as_str()),
                    AMQPValue::LongString(LongString::from(value.as_str())),
                );
            }
            basic = basic.with_headers(headers);
        }
        basic
    }
}

#[async_trait]
impl BrokerChannel for LapinChannel {
    fn channel_id(&self) -> u16 {
        self.channel.id()
    }

    fn is_closed(&self) -> bool {
        !self.channel.status().connected()
    }

    async fn basic_publish(
        &self,
        address: &PublicationAddress,
        properties: Option<&MessageProperties>,
        payload: &[u8],
    ) -> Result<()> {
        let (exchange, routing_key) = Self::publish_target(address);

        self.channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                payload,
                Self::basic_properties_for(properties),
            )
            .await
            .map_err(Error::transport)?;

        Ok(())
    }
}
