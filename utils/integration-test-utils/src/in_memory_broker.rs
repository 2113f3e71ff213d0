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

//! Broker connection and channel that live entirely in memory.
//!
//! Every publish attempt gets a zero-based sequence number across all channels of a
//! connection. Tests script channel closures and publish failures by that number.

use async_trait::async_trait;
use rabbitmq_destination::{
    BrokerChannel, BrokerConnection, Error, MessageProperties, PublicationAddress, Result,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct PublishedMessage {
    pub sequence: usize,
    pub channel_id: u16,
    pub address: PublicationAddress,
    pub properties: Option<MessageProperties>,
    pub payload: Vec<u8>,
}

#[derive(Default)]
struct BrokerState {
    attempts: usize,
    published: Vec<PublishedMessage>,
    close_after: HashSet<usize>,
    fail_at: HashMap<usize, (String, bool)>,
}

#[derive(Default)]
pub struct InMemoryConnection {
    state: Arc<Mutex<BrokerState>>,
    channels: Mutex<Vec<Arc<InMemoryChannel>>>,
    refuse_channels: AtomicBool,
}

impl InMemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the publishing channel right after publish attempt `sequence` succeeds.
    pub fn close_channel_after_publish(&self, sequence: usize) {
        self.state.lock().unwrap().close_after.insert(sequence);
    }

    /// Makes publish attempt `sequence` fail with a transport error. With
    /// `closes_channel` the broker also closes the channel, as RabbitMQ does on a
    /// channel-level exception.
    pub fn fail_publish(&self, sequence: usize, reason: &str, closes_channel: bool) {
        self.state
            .lock()
            .unwrap()
            .fail_at
            .insert(sequence, (reason.to_string(), closes_channel));
    }

    /// Makes every later `create_channel` call fail.
    pub fn refuse_channels(&self) {
        self.refuse_channels.store(true, Ordering::Relaxed);
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.state.lock().unwrap().published.clone()
    }

    pub fn publish_attempts(&self) -> usize {
        self.state.lock().unwrap().attempts
    }

    pub fn channels(&self) -> Vec<Arc<InMemoryChannel>> {
        self.channels.lock().unwrap().clone()
    }

    pub fn channels_created(&self) -> usize {
        self.channels.lock().unwrap().len()
    }
}

#[async_trait]
impl BrokerConnection for InMemoryConnection {
    async fn create_channel(&self) -> Result<Arc<dyn BrokerChannel>> {
        if self.refuse_channels.load(Ordering::Relaxed) {
            return Err(Error::transport("connection refuses new channels"));
        }

        let mut channels = self.channels.lock().unwrap();
        let id = u16::try_from(channels.len() + 1).map_err(Error::transport)?;
        let channel = Arc::new(InMemoryChannel {
            id,
            closed: AtomicBool::new(false),
            probes: AtomicUsize::new(0),
            state: self.state.clone(),
        });
        channels.push(channel.clone());
        debug!(channel_id = id, "in-memory channel created");

        Ok(channel)
    }
}

pub struct InMemoryChannel {
    id: u16,
    closed: AtomicBool,
    probes: AtomicUsize,
    state: Arc<Mutex<BrokerState>>,
}

impl InMemoryChannel {
    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Relaxed);
    }

    /// Number of `is_closed` checks made against this channel.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BrokerChannel for InMemoryChannel {
    fn channel_id(&self) -> u16 {
        self.id
    }

    fn is_closed(&self) -> bool {
        self.probes.fetch_add(1, Ordering::Relaxed);
        self.closed.load(Ordering::Relaxed)
    }

    async fn basic_publish(
        &self,
        address: &PublicationAddress,
        properties: Option<&MessageProperties>,
        payload: &[u8],
    ) -> Result<()> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(Error::transport(format!(
                "channel {} is closed",
                self.id
            )));
        }

        let mut state = self.state.lock().unwrap();
        let sequence = state.attempts;
        state.attempts += 1;

        if let Some((reason, closes_channel)) = state.fail_at.remove(&sequence) {
            if closes_channel {
                self.close();
            }
            return Err(Error::Transport(reason));
        }

        state.published.push(PublishedMessage {
            sequence,
            channel_id: self.id,
            address: address.clone(),
            properties: properties.cloned(),
            payload: payload.to_vec(),
        });

        if state.close_after.remove(&sequence) {
            self.close();
        }

        Ok(())
    }
}
