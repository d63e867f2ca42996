//! Owner set of a threshold account.

use std::num::NonZero;

use alloy_primitives::Address;

use crate::CollectorError;

/// Owners of a threshold account and how many of them must sign.
///
/// Owners are kept sorted by address. The threshold is stored as `NonZero<u8>` so it can never be
/// zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerConfig {
    owners: Vec<Address>,
    threshold: NonZero<u8>,
}

impl OwnerConfig {
    /// Creates a new owner configuration.
    ///
    /// # Errors
    ///
    /// - `EmptyOwners`: no owners were given
    /// - `DuplicateOwner`: an address is listed more than once
    /// - `InvalidThreshold`: the threshold exceeds the number of owners
    pub fn try_new(
        mut owners: Vec<Address>,
        threshold: NonZero<u8>,
    ) -> Result<Self, CollectorError> {
        if owners.is_empty() {
            return Err(CollectorError::EmptyOwners);
        }

        owners.sort_unstable();
        if let Some(pair) = owners.windows(2).find(|w| w[0] == w[1]) {
            return Err(CollectorError::DuplicateOwner(pair[0]));
        }

        if threshold.get() as usize > owners.len() {
            return Err(CollectorError::InvalidThreshold {
                threshold: threshold.get(),
                owners: owners.len(),
            });
        }

        Ok(Self { owners, threshold })
    }

    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub fn threshold(&self) -> u8 {
        self.threshold.get()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.binary_search(address).is_ok()
    }
}
