// crates/iotlab-deploy/src/parser.rs

use crate::error::DeployError;
use crate::model::NodeRecord;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parses the IoT-LAB node export from a string slice.
///
/// # Arguments
/// * `json_content` - The full JSON array as downloaded from the testbed status page.
///
/// # Errors
/// Returns `DeployError::Json` if the input is not a JSON array of node
/// objects or if any entry lacks `uid`, `site`, `archi` or `network_address`.
pub fn load_records_from_str(json_content: &str) -> Result<Vec<NodeRecord>, DeployError> {
    let records: Vec<NodeRecord> = serde_json::from_str(json_content)?;
    debug!("Parsed {} node records", records.len());
    Ok(records)
}

/// Parses the IoT-LAB node export from any reader.
///
/// # Errors
/// Same as `load_records_from_str`; I/O failures surface as `DeployError::Json`
/// since `serde_json` wraps them.
pub fn load_records_from_reader<R: Read>(reader: R) -> Result<Vec<NodeRecord>, DeployError> {
    let records: Vec<NodeRecord> = serde_json::from_reader(reader)?;
    debug!("Parsed {} node records", records.len());
    Ok(records)
}

/// Opens and parses the export file at `path`.
///
/// The file handle is dropped when this function returns, on success and
/// on parse failure alike.
///
/// # Errors
/// Returns `DeployError::Io` if the file cannot be opened and
/// `DeployError::Json` if its content is invalid.
pub fn load_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NodeRecord>, DeployError> {
    let path = path.as_ref();
    debug!("Loading node records from {}", path.display());
    let file = File::open(path)?;
    load_records_from_reader(BufReader::new(file))
}
