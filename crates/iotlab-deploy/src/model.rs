// crates/iotlab-deploy/src/model.rs

//! Typed view of one entry of the IoT-LAB node metadata export.
//!
//! A record looks like:
//! `{"uid":"9378","archi":"m3:at86rf231","x":"62.26","y":"0.94","z":"-0.04",
//!   "mobile":0,"camera":0,"site":"grenoble","state":"Busy",
//!   "network_address":"m3-358.grenoble.iot-lab.info","mobility_type":" "}`
//!
//! Only the fields needed for a deployment are mandatory, plus the optional
//! `state`. Coordinates, mobility and camera flags are not used and are
//! skipped by serde.

use serde::Deserialize;

/// Domain suffix shared by every IoT-LAB network address.
const IOTLAB_DOMAIN: &str = ".iot-lab.info";

/// State reported by the testbed for a node that is ready to be used.
pub(crate) const STATE_ALIVE: &str = "Alive";

/// One node of the testbed inventory, as found in the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeRecord {
    /// Hardware unique id, as hex (e.g. `"9378"`).
    pub uid: String,
    /// Site name (e.g. `"grenoble"`).
    pub site: String,
    /// Architecture descriptor (e.g. `"m3:at86rf231"`).
    pub archi: String,
    /// Fully qualified host name (e.g. `"m3-358.grenoble.iot-lab.info"`).
    pub network_address: String,

    /// Testbed state (`Alive`, `Busy`, `Suspected`, ...), if exported.
    #[serde(default)]
    pub state: Option<String>,
}

impl NodeRecord {
    /// Extracts the node number embedded in the network address.
    ///
    /// `m3-358.grenoble.iot-lab.info` yields `Some(358)`. Addresses that do
    /// not follow the `<name>-<number>.<site>.iot-lab.info` layout yield `None`.
    pub fn node_number(&self) -> Option<u32> {
        let (host, rest) = self.network_address.split_once('.')?;
        if !rest.ends_with(IOTLAB_DOMAIN) {
            return None;
        }
        let (_, number) = host.rsplit_once('-')?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        number.parse().ok()
    }

    /// Returns `true` if the record carries a state other than `Alive`.
    /// Records without a state are not considered degraded.
    pub fn is_degraded(&self) -> bool {
        self.state.as_deref().is_some_and(|s| s != STATE_ALIVE)
    }
}

#[cfg(test)]
mod tests {
    use super::NodeRecord;

    fn record(address: &str) -> NodeRecord {
        NodeRecord {
            uid: "9378".into(),
            site: "grenoble".into(),
            archi: "m3:at86rf231".into(),
            network_address: address.into(),
            state: None,
        }
    }

    #[test]
    fn test_node_number_from_address() {
        assert_eq!(record("m3-358.grenoble.iot-lab.info").node_number(), Some(358));
        assert_eq!(record("a8-1.saclay.iot-lab.info").node_number(), Some(1));
    }

    #[test]
    fn test_node_number_rejects_foreign_addresses() {
        assert_eq!(record("m3-358.example.org").node_number(), None);
        assert_eq!(record("m3.grenoble.iot-lab.info").node_number(), None);
        assert_eq!(record("m3-.grenoble.iot-lab.info").node_number(), None);
        assert_eq!(record("m3-3a.grenoble.iot-lab.info").node_number(), None);
    }

    #[test]
    fn test_deserialize_full_export_entry() {
        let json = r#"{"uid":"9378","archi":"m3:at86rf231","x":"62.26","y":"0.94","z":"-0.04",
            "mobile":0,"camera":0,"site":"grenoble","state":"Busy",
            "network_address":"m3-358.grenoble.iot-lab.info","mobility_type":" "}"#;
        let rec: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.uid, "9378");
        assert_eq!(rec.state.as_deref(), Some("Busy"));
        assert!(rec.is_degraded());
    }

    /// Coordinates and flags are skipped whatever their JSON type.
    #[test]
    fn test_unused_export_fields_are_ignored() {
        let json = r#"{"uid":"9378","archi":"m3:at86rf231","x":62.26,"y":null,
            "mobile":"no","camera":[],"site":"grenoble",
            "network_address":"m3-358.grenoble.iot-lab.info","mobility_type":{"kind":"fixed"}}"#;
        let rec: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec, record("m3-358.grenoble.iot-lab.info"));
    }

    #[test]
    fn test_missing_state_is_not_degraded() {
        let mut rec = record("m3-1.lille.iot-lab.info");
        assert!(!rec.is_degraded());
        rec.state = Some("Alive".into());
        assert!(!rec.is_degraded());
    }
}
