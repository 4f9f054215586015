// crates/iotlab-deploy/src/builder.rs

use crate::error::DeployError;
use crate::types::Node;
use core::fmt::Write;

/// Declaration line opening the Contiki-NG deployment table.
const TABLE_HEADER: &str = "const struct id_mac deployment_fit[] = {";
/// All-zero entry that terminates the table.
const TABLE_SENTINEL: &str = "  { 0,    {{0}}}";
const TABLE_FOOTER: &str = "};";

/// Renders the `deployment_fit[]` table for the given nodes.
///
/// The output looks like:
/// ```text
/// const struct id_mac deployment_fit[] = {
///   { 0x01, {{0x02,0x00,0x00,0x00,0x00,0x00,0x93,0x78}}}, // 358
///   { 0,    {{0}}}
/// };
/// ```
/// One line is written per node, in slice order, and the string does not
/// end with a newline.
///
/// # Errors
/// Returns `DeployError::FmtError` if writing to the buffer fails.
pub fn deployment_struct_string(nodes: &[Node]) -> Result<String, DeployError> {
    let mut buffer = String::new();
    writeln!(&mut buffer, "{}", TABLE_HEADER)?;
    for node in nodes {
        writeln!(
            &mut buffer,
            "  {{ 0x{:02x}, {{{{{}}}}}}}, // {}",
            node.deployment_id, node.link_layer_address, node.id
        )?;
    }
    writeln!(&mut buffer, "{}", TABLE_SENTINEL)?;
    buffer.push_str(TABLE_FOOTER);
    Ok(buffer)
}

/// Joins node ids with `+`, the node list syntax of the IoT-LAB CLI
/// (e.g. `iotlab-experiment submit -l grenoble,m3,1+4+5`).
pub fn argument_string(node_ids: &[u32]) -> String {
    node_ids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("+")
}
