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

//! Broker seam: the connection and channel primitives the destination draws on.
//!
//! A [`BrokerConnection`] is long-lived and shared; the destination only ever asks it for
//! new channels and never closes it. A [`BrokerChannel`] is either open or permanently
//! closed, and a closed channel must never be used again.

#[cfg(feature = "lapin-transport")]
mod lapin_transport;
#[cfg(feature = "lapin-transport")]
pub use lapin_transport::{LapinChannel, LapinConnection};

use crate::address::PublicationAddress;
use crate::error::Result;
use crate::properties::MessageProperties;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait BrokerConnection: Send + Sync {
    /// Opens a new channel multiplexed over this connection.
    async fn create_channel(&self) -> Result<Arc<dyn BrokerChannel>>;
}

#[async_trait]
pub trait BrokerChannel: Send + Sync {
    /// Broker-assigned channel number, used for correlation in logs.
    fn channel_id(&self) -> u16;

    fn is_closed(&self) -> bool;

    /// Transmits `payload` to `address`. `properties` are omitted from the frame when `None`.
    async fn basic_publish(
        &self,
        address: &PublicationAddress,
        properties: Option<&MessageProperties>,
        payload: &[u8],
    ) -> Result<()>;
}
