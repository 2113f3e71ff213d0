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

mod batcher;
mod config;

use crate::batcher::RecordBatcher;
use crate::config::Config;
use clap::Parser;
use rabbitmq_destination::{
    CancellationToken, LapinConnection, LogRecord, RabbitMqDestination,
    RabbitMqDestinationBuilder,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Ships newline-delimited JSON log records to a RabbitMQ exchange")]
struct ShipperArgs {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
}

/// Sends one batch. Returns `false` once shutdown was requested and the batch was dropped.
async fn ship(
    destination: &RabbitMqDestination,
    batch: &[LogRecord],
    shutdown: &CancellationToken,
) -> bool {
    match destination.send_with_cancellation(batch, shutdown).await {
        Ok(()) => {
            info!(records = batch.len(), "batch shipped");
            true
        }
        Err(err) if err.is_cancelled() => {
            warn!(records = batch.len(), "shutdown requested; batch dropped");
            false
        }
        Err(err) => {
            warn!(records = batch.len(), err = %err, "batch delivery failed");
            true
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = ShipperArgs::parse();
    let config = Config::load(&args.config)?;

    let connection = Arc::new(LapinConnection::connect(&config.amqp_uri).await?);
    let destination = config
        .apply(RabbitMqDestinationBuilder::new().with_connection(connection)?)?
        .build()?;

    let shutdown = CancellationToken::new();
    let shutdown_on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_on_signal.cancel();
        }
    });

    let mut batcher = RecordBatcher::new(config.batch_size);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };

        match batcher.push_line(&line) {
            Ok(Some(batch)) => {
                if !ship(&destination, &batch, &shutdown).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => warn!(err = %err, "skipping malformed record line"),
        }
    }

    if batcher.pending_len() > 0 {
        let remaining = batcher.take_pending();
        ship(&destination, &remaining, &shutdown).await;
    }

    Ok(())
}
