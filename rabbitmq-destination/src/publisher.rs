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

//! Publishing strategies: how a payload is put on a channel.

use crate::address::PublicationAddress;
use crate::broker::BrokerChannel;
use crate::error::Result;
use crate::properties::MessageProperties;
use async_trait::async_trait;

/// Transmits one payload over a channel handed in by the caller.
///
/// A publisher never opens or closes channels.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(
        &self,
        channel: &dyn BrokerChannel,
        address: &PublicationAddress,
        payload: &[u8],
    ) -> Result<()>;
}

/// Publishes with an optional, fixed set of message properties.
#[derive(Clone, Debug, Default)]
pub struct BasicPublisher {
    properties: Option<MessageProperties>,
}

impl BasicPublisher {
    pub fn new(properties: Option<MessageProperties>) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> Option<&MessageProperties> {
        self.properties.as_ref()
    }
}

#[async_trait]
impl MessagePublisher for BasicPublisher {
    async fn publish(
        &self,
        channel: &dyn BrokerChannel,
        address: &PublicationAddress,
        payload: &[u8],
    ) -> Result<()> {
        channel
            .basic_publish(address, self.properties.as_ref(), payload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::{BasicPublisher, MessagePublisher};
    use crate::address::PublicationAddress;
    use crate::broker::BrokerChannel;
    use crate::error::{Error, Result};
    use crate::properties::MessageProperties;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Sent = (PublicationAddress, Option<MessageProperties>, Vec<u8>);

    #[derive(Default)]
    struct CapturingChannel {
        sent: Mutex<Vec<Sent>>,
        fail_with: Option<&'static str>,
    }

    #[async_trait]
    impl BrokerChannel for CapturingChannel {
        fn channel_id(&self) -> u16 {
            1
        }

        fn is_closed(&self) -> bool {
            false
        }

        async fn basic_publish(
            &self,
            address: &PublicationAddress,
            properties: Option<&MessageProperties>,
            payload: &[u8],
        ) -> Result<()> {
            if let Some(reason) = self.fail_with {
                return Err(Error::transport(reason));
            }
            self.sent
                .lock()
                .unwrap()
                .push((address.clone(), properties.cloned(), payload.to_vec()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn publishes_without_properties_by_default() {
        let channel = CapturingChannel::default();
        let address = PublicationAddress::new("logs", "direct", "app");

        BasicPublisher::default()
            .publish(&channel, &address, b"hello")
            .await
            .expect("publish should succeed");

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], (address, None, b"hello".to_vec()));
    }

    #[tokio::test]
    async fn attaches_configured_properties() {
        let channel = CapturingChannel::default();
        let properties = MessageProperties::new()
            .with_content_type("application/json")
            .with_app_id("billing");
        let publisher = BasicPublisher::new(Some(properties.clone()));

        publisher
            .publish(&channel, &PublicationAddress::new("logs", "topic", ""), b"{}")
            .await
            .expect("publish should succeed");

        assert_eq!(channel.sent.lock().unwrap()[0].1, Some(properties));
    }

    #[tokio::test]
    async fn publishes_empty_payload() {
        let channel = CapturingChannel::default();

        BasicPublisher::default()
            .publish(&channel, &PublicationAddress::new("logs", "direct", ""), b"")
            .await
            .expect("empty payload is still a message");

        assert!(channel.sent.lock().unwrap()[0].2.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let channel = CapturingChannel {
            fail_with: Some("channel closed by broker"),
            ..Default::default()
        };

        let err = BasicPublisher::default()
            .publish(&channel, &PublicationAddress::new("logs", "direct", ""), b"x")
            .await
            .expect_err("failure should surface");

        assert!(matches!(err, Error::Transport(reason) if reason == "channel closed by broker"));
    }
}
