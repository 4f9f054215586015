// crates/iotlab-deploy/src/types.rs

//! Resolved deployment data derived from the raw node records.

use crate::error::DeployError;
use crate::model::NodeRecord;
use core::fmt;

/// Size of a Contiki-NG link-layer address in bytes.
pub const LINK_LAYER_ADDRESS_SIZE: usize = 8;

/// Fixed prefix of every testbed node address. The last two bytes come from the uid.
const LINK_LAYER_PREFIX: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x00];

// --- LinkLayerAddress ---

/// An 8-byte link-layer address as used by Contiki-NG on IoT-LAB nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkLayerAddress(pub [u8; LINK_LAYER_ADDRESS_SIZE]);

impl LinkLayerAddress {
    /// Creates a new `LinkLayerAddress` from an 8-byte array.
    pub const fn new(bytes: [u8; LINK_LAYER_ADDRESS_SIZE]) -> Self {
        LinkLayerAddress(bytes)
    }

    /// Builds the address `02:00:00:00:00:00:<uid hi>:<uid lo>`.
    ///
    /// # Errors
    /// Returns `DeployError::InvalidUid` if `uid` is not exactly two bytes of hex.
    pub fn from_uid(uid: &str, node_id: u32) -> Result<Self, DeployError> {
        let invalid = || DeployError::InvalidUid {
            node_id,
            uid: uid.to_string(),
        };
        let decoded = hex::decode(uid).map_err(|_| invalid())?;
        let [hi, lo]: [u8; 2] = decoded.try_into().map_err(|_| invalid())?;

        let mut bytes = [0u8; LINK_LAYER_ADDRESS_SIZE];
        bytes[..LINK_LAYER_PREFIX.len()].copy_from_slice(&LINK_LAYER_PREFIX);
        bytes[6] = hi;
        bytes[7] = lo;
        Ok(LinkLayerAddress(bytes))
    }

    pub fn bytes(&self) -> &[u8; LINK_LAYER_ADDRESS_SIZE] {
        &self.0
    }
}

impl fmt::Display for LinkLayerAddress {
    /// Formats the address as a C initializer list: "0x02,0x00,...,0x93,0x78".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "0x{:02x}", byte)?;
        }
        Ok(())
    }
}

// --- Node ---

/// A requested testbed node that was matched to a metadata record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node number as requested by the caller (e.g. 358 for `m3-358`).
    pub id: u32,
    /// Compact id assigned for this deployment, in `1..=N`.
    pub deployment_id: u16,
    pub link_layer_address: LinkLayerAddress,
}

impl Node {
    /// Derives a node from its resolved record.
    ///
    /// # Errors
    /// Returns `DeployError::InvalidUid` if the record's uid is malformed.
    pub fn new(record: &NodeRecord, id: u32, deployment_id: u16) -> Result<Self, DeployError> {
        Ok(Node {
            id,
            deployment_id,
            link_layer_address: LinkLayerAddress::from_uid(&record.uid, id)?,
        })
    }
}
