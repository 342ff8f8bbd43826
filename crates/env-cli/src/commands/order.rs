//! The `order` command

use std::path::PathBuf;

use crate::error::Result;

/// Resolve `layers` and print stack names in deployment order, one per line.
pub fn run_order(layers: &[PathBuf], base_url: &str, json: bool) -> Result<()> {
    let env = super::resolve_layers(layers, base_url)?;
    let order = env.stack_order()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        for stack in &order {
            println!("{stack}");
        }
    }
    Ok(())
}
