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

use super::{AddressResolver, PublicationAddress};
use crate::error::{Error, Result};
use crate::record::LogRecord;
use std::fmt;
use std::sync::Arc;

/// Per-record address function used by [`ComputedAddressResolver`].
pub type AddressFn = Arc<dyn Fn(&LogRecord) -> PublicationAddress + Send + Sync>;

/// Resolver that delegates every record to a caller-supplied function.
///
/// The function's output is used as-is; unset or empty fields are not validated.
#[derive(Clone)]
pub struct ComputedAddressResolver {
    address_fn: AddressFn,
}

impl ComputedAddressResolver {
    pub fn new<F>(address_fn: F) -> Self
    where
        F: Fn(&LogRecord) -> PublicationAddress + Send + Sync + 'static,
    {
        Self {
            address_fn: Arc::new(address_fn),
        }
    }

    pub fn try_new(address_fn: Option<AddressFn>) -> Result<Self> {
        let address_fn = address_fn.ok_or(Error::InvalidArgument("address_fn"))?;
        Ok(Self { address_fn })
    }

    pub fn address_fn(&self) -> &AddressFn {
        &self.address_fn
    }
}

impl AddressResolver for ComputedAddressResolver {
    fn resolve(&self, record: &LogRecord) -> PublicationAddress {
        (self.address_fn)(record)
    }
}

impl fmt::Debug for ComputedAddressResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedAddressResolver").finish_non_exhaustive()
    }
}
