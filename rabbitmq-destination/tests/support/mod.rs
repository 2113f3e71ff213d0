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

use integration_test_utils::{IdSerializer, InMemoryConnection};
use rabbitmq_destination::{
    AddressResolver, FixedAddressResolver, PublicationAddress, RabbitMqDestination,
    RecordSerializer,
};
use std::sync::Arc;

pub(crate) const EXCHANGE: &str = "X";
pub(crate) const EXCHANGE_KIND: &str = "direct";
pub(crate) const ROUTING_KEY: &str = "R";

pub(crate) fn fixed_address() -> PublicationAddress {
    PublicationAddress::new(EXCHANGE, EXCHANGE_KIND, ROUTING_KEY)
}

#[allow(dead_code)]
pub(crate) fn fixed_resolver() -> Arc<dyn AddressResolver> {
    Arc::new(FixedAddressResolver::with_routing_key(
        EXCHANGE,
        EXCHANGE_KIND,
        Some(ROUTING_KEY.to_string()),
    ))
}

#[allow(dead_code)]
pub(crate) fn make_destination(
    connection: Arc<InMemoryConnection>,
    serializer: Arc<dyn RecordSerializer>,
) -> RabbitMqDestination {
    RabbitMqDestination::with_serializer(connection, fixed_resolver(), serializer)
}

#[allow(dead_code)]
pub(crate) fn make_id_destination() -> (Arc<InMemoryConnection>, RabbitMqDestination) {
    integration_test_utils::init_logging();

    let connection = Arc::new(InMemoryConnection::new());
    let destination = make_destination(connection.clone(), Arc::new(IdSerializer));
    (connection, destination)
}

#[allow(dead_code)]
pub(crate) fn payloads(connection: &InMemoryConnection) -> Vec<Vec<u8>> {
    connection
        .published()
        .into_iter()
        .map(|message| message.payload)
        .collect()
}

#[allow(dead_code)]
pub(crate) fn channel_ids(connection: &InMemoryConnection) -> Vec<u16> {
    connection
        .published()
        .into_iter()
        .map(|message| message.channel_id)
        .collect()
}
