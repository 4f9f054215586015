// crates/iotlab-deploy/src/testbed.rs

//! Filters the testbed inventory down to the requested nodes and assigns
//! deployment ids.
//!
//! Matching happens in two passes:
//! 1. `filter_records` keeps every record of the right site and architecture
//!    whose address contains any requested id as a plain substring.
//! 2. `find_record` then looks for the exact `-<id>.` pattern, so that
//!    node `1` never resolves to `m3-10` or `m3-11`.

use crate::builder;
use crate::config::TestbedConfig;
use crate::error::DeployError;
use crate::model::NodeRecord;
use crate::parser;
use crate::types::Node;
use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;

/// The requested subset of the testbed, resolved to deployment nodes.
#[derive(Debug, Clone)]
pub struct Testbed {
    node_ids: Vec<u32>,
    site: String,
    archi: String,
    /// Every record that was loaded, kept for `available_node_numbers`.
    records: Vec<NodeRecord>,
    filtered: Vec<NodeRecord>,
    nodes: Vec<Node>,
    unresolved: Vec<u32>,
}

impl Testbed {
    /// Builds a testbed from already loaded records.
    ///
    /// `rng` is only consulted when `randomize` is set.
    ///
    /// # Errors
    /// Returns `DeployError::InvalidUid` if a resolved record has a malformed uid
    /// and `DeployError::TooManyNodes` if more nodes resolve than a `u16` id can number.
    pub fn new<R: Rng + ?Sized>(
        node_ids: Vec<u32>,
        site: impl Into<String>,
        archi: impl Into<String>,
        records: Vec<NodeRecord>,
        randomize: bool,
        rng: &mut R,
    ) -> Result<Self, DeployError> {
        let site = site.into();
        let archi = archi.into();

        let filtered: Vec<NodeRecord> = filter_records(&records, &site, &archi, &node_ids)
            .into_iter()
            .cloned()
            .collect();
        debug!(
            "{} of {} records kept for site={} archi={}",
            filtered.len(),
            records.len(),
            site,
            archi
        );

        // Pass 2: exact match, in request order.
        let mut resolved = Vec::with_capacity(node_ids.len());
        let mut unresolved = Vec::new();
        for &id in &node_ids {
            match find_record(&filtered, id) {
                Some(record) => {
                    if record.is_degraded() {
                        warn!(
                            "Node {} ({}) is in state {:?}",
                            id,
                            record.network_address,
                            record.state.as_deref().unwrap_or_default()
                        );
                    }
                    resolved.push((id, record));
                }
                None => {
                    warn!("Unable to find node {} at {} ({}), skipping", id, site, archi);
                    unresolved.push(id);
                }
            }
        }

        let permutation = deployment_permutation(resolved.len(), randomize.then_some(rng))?;
        let nodes = resolved
            .into_iter()
            .zip(permutation)
            .map(|((id, record), deployment_id)| Node::new(record, id, deployment_id))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Resolved {} of {} requested nodes",
            nodes.len(),
            node_ids.len()
        );

        Ok(Testbed {
            node_ids,
            site,
            archi,
            records,
            filtered,
            nodes,
            unresolved,
        })
    }

    /// Loads the export named in `config` and builds the testbed from it.
    ///
    /// # Errors
    /// Returns `DeployError::Io` or `DeployError::Json` if the export cannot
    /// be read, and `DeployError::InvalidUid` as for `Testbed::new`.
    pub fn from_config(config: &TestbedConfig) -> Result<Self, DeployError> {
        let records = parser::load_records_from_path(&config.nodes_json)?;
        let mut rng = config.rng();
        Self::new(
            config.node_ids.clone(),
            config.site.as_str(),
            config.archi.as_str(),
            records,
            config.randomize,
            &mut rng,
        )
    }

    /// The `deployment_fit[]` C table for the resolved nodes.
    pub fn deployment_struct_string(&self) -> Result<String, DeployError> {
        builder::deployment_struct_string(&self.nodes)
    }

    /// All requested ids joined by `+`, resolved or not.
    pub fn argument_string(&self) -> String {
        builder::argument_string(&self.node_ids)
    }

    /// Node numbers of every loaded record at this site and architecture,
    /// sorted and without duplicates.
    pub fn available_node_numbers(&self) -> Vec<u32> {
        available_node_numbers(&self.records, &self.site, &self.archi)
    }

    pub fn node_ids(&self) -> &[u32] {
        &self.node_ids
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn archi(&self) -> &str {
        &self.archi
    }

    /// Resolved nodes, in request order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Requested ids that matched no record.
    pub fn unresolved(&self) -> &[u32] {
        &self.unresolved
    }

    /// Records that passed the site/architecture/substring filter.
    pub fn filtered_records(&self) -> &[NodeRecord] {
        &self.filtered
    }
}

/// Keeps the records at `site` with architecture `archi` whose network
/// address contains any of `node_ids` as a substring.
///
/// This is intentionally loose: `m3-10` passes when `1` is requested.
/// Records keep their input order and appear at most once.
pub fn filter_records<'a>(
    records: &'a [NodeRecord],
    site: &str,
    archi: &str,
    node_ids: &[u32],
) -> Vec<&'a NodeRecord> {
    let needles: Vec<String> = node_ids.iter().map(u32::to_string).collect();
    records
        .iter()
        .filter(|r| r.site == site && r.archi == archi)
        .filter(|r| needles.iter().any(|n| r.network_address.contains(n.as_str())))
        .collect()
}

/// Node numbers of the records at `site` with architecture `archi`, sorted
/// and without duplicates. Nothing is resolved, so uids are not checked.
pub fn available_node_numbers(records: &[NodeRecord], site: &str, archi: &str) -> Vec<u32> {
    let mut numbers: Vec<u32> = records
        .iter()
        .filter(|r| r.site == site && r.archi == archi)
        .filter_map(NodeRecord::node_number)
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

/// Finds the first record whose network address contains `-<node_id>.`.
pub fn find_record(records: &[NodeRecord], node_id: u32) -> Option<&NodeRecord> {
    let pattern = format!("-{}.", node_id);
    records.iter().find(|r| r.network_address.contains(&pattern))
}

/// Returns the deployment ids `1..=count`, shuffled when `rng` is given.
///
/// The i-th resolved node receives the i-th value.
///
/// # Errors
/// Returns `DeployError::TooManyNodes` if `count` exceeds `u16::MAX`.
pub fn deployment_permutation<R: Rng + ?Sized>(
    count: usize,
    rng: Option<&mut R>,
) -> Result<Vec<u16>, DeployError> {
    let last = u16::try_from(count).map_err(|_| DeployError::TooManyNodes { count })?;
    let mut ids: Vec<u16> = (1..=last).collect();
    if let Some(rng) = rng {
        ids.shuffle(rng);
    }
    Ok(ids)
}
