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

//! Error type shared by every layer of the destination.

use thiserror::Error;

/// Failure modes surfaced by resolvers, serializers, publishers and the destination.
#[derive(Debug, Error)]
pub enum Error {
    /// A required value was absent at call time. Nothing is published for the current record.
    #[error("invalid argument: {0} must be provided")]
    InvalidArgument(&'static str),

    /// The destination was assembled incorrectly (missing or duplicated dependency).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The broker connection or channel rejected an operation.
    #[error("broker transport error: {0}")]
    Transport(String),

    /// The record serializer failed outright (as opposed to yielding no text).
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Cancellation was already requested when a send was started.
    #[error("send was cancelled before it started")]
    Cancelled,
}

impl Error {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization(err.to_string())
    }

    /// Returns `true` for the pre-flight cancellation outcome of a send.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
