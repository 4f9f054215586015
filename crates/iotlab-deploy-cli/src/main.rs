// crates/iotlab-deploy-cli/src/main.rs
//! Prints the Contiki-NG `deployment_fit[]` table and the IoT-LAB CLI node
//! list for an experiment.
//!
//! Configuration comes from built-in defaults, an optional JSON file given on
//! the command line, and `IOTLAB_*` environment variables (highest priority).
//! Diagnostics go to stderr through `env_logger`; set `RUST_LOG=debug` for
//! filter details.

use iotlab_deploy::{
    DeployError, Testbed, TestbedConfig, available_node_numbers, load_records_from_path,
};
use log::{error, info};
use std::{env, process};

fn print_help(program: &str) {
    println!("{} - Contiki-NG deployment helper for FIT IoT-LAB", program);
    println!("Usage:");
    println!(
        "  {} [render] [CONFIG.json]  Print the deployment struct and the nodes argument (default)",
        program
    );
    println!(
        "  {} list [CONFIG.json]      List node numbers available for the site and architecture",
        program
    );
    println!("  {} help                    Show this help", program);
    println!();
    println!("Environment overrides:");
    println!("  IOTLAB_NODE_IDS    Node list, e.g. \"1-5+8+11\"");
    println!("  IOTLAB_SITE        Site name, e.g. \"grenoble\"");
    println!("  IOTLAB_ARCHI       Architecture, e.g. \"m3:at86rf231\"");
    println!(
        "  IOTLAB_NODES_JSON  Node metadata export from https://www.iot-lab.info/testbed/status"
    );
    println!("  IOTLAB_RANDOMIZE   Shuffle deployment ids (true/false)");
    println!("  IOTLAB_SEED        Seed for the shuffle");
}

/// Builds the effective configuration: defaults, then the optional file, then env.
fn load_config(config_path: Option<&str>) -> Result<TestbedConfig, DeployError> {
    let mut config = match config_path {
        Some(path) => {
            info!("Reading configuration from {}", path);
            TestbedConfig::from_path(path)?
        }
        None => TestbedConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn run_render(config: &TestbedConfig) -> Result<(), DeployError> {
    println!("Operating on {} nodes", config.node_ids.len());

    let testbed = Testbed::from_config(config)?;
    let table = testbed.deployment_struct_string()?;

    println!("\nContiki-ng deployment struct:");
    println!("{}", table);
    println!("\nIoT-LAB CLI nodes argument:");
    println!("{}", testbed.argument_string());
    Ok(())
}

/// Lists node numbers straight from the export; requested ids are not resolved.
fn run_list(config: &TestbedConfig) -> Result<(), DeployError> {
    let records = load_records_from_path(&config.nodes_json)?;
    let numbers = available_node_numbers(&records, &config.site, &config.archi);
    println!(
        "{} nodes available at {} ({}):",
        numbers.len(),
        config.site,
        config.archi
    );
    println!("{}", iotlab_deploy::argument_string(&numbers));
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(|s| s.as_str()).unwrap_or("iotlab-deploy");

    // First argument is either a mode or, when it looks like a file, the config path.
    let (mode, config_path) = match args.get(1).map(|s| s.as_str()) {
        None => ("render".to_string(), None),
        Some(arg) if arg.ends_with(".json") => ("render".to_string(), Some(arg)),
        Some(arg) => (arg.to_ascii_lowercase(), args.get(2).map(|s| s.as_str())),
    };

    if matches!(mode.as_str(), "help" | "-h" | "--help") {
        print_help(program);
        return;
    }

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let result = match mode.as_str() {
        "render" => run_render(&config),
        "list" => run_list(&config),
        other => {
            error!("Unknown mode '{}'", other);
            print_help(program);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
