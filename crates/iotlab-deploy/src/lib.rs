// crates/iotlab-deploy/src/lib.rs

#![doc = "Turns a FIT IoT-LAB node metadata export into Contiki-NG deployment data."]
#![doc = ""]
#![doc = "Given the JSON export of the testbed inventory, a site, an architecture and"]
#![doc = "a list of requested node numbers, this library produces:"]
#![doc = "- `Testbed::deployment_struct_string`: the `deployment_fit[]` C table mapping"]
#![doc = "  compact deployment ids to link-layer addresses."]
#![doc = "- `Testbed::argument_string`: the `+`-joined node list for the IoT-LAB CLI."]

// --- Crate Modules ---

mod builder;
mod config;
mod error;
mod model;
mod parser;
mod testbed;
mod types;

// --- Public API Re-exports ---

pub use builder::{argument_string, deployment_struct_string};
pub use config::{TestbedConfig, parse_node_ids};
pub use error::DeployError;
pub use model::NodeRecord;
pub use parser::{load_records_from_path, load_records_from_reader, load_records_from_str};
pub use testbed::{
    Testbed, available_node_numbers, deployment_permutation, filter_records, find_record,
};
pub use types::{LinkLayerAddress, Node};
