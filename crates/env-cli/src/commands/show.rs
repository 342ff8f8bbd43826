//! The `show` command

use std::path::PathBuf;

use colored::Colorize;
use env_model::{Environment, Parameters};

use crate::error::Result;

/// Resolve `layers` and print the merged environment.
pub fn run_show(layers: &[PathBuf], base_url: &str, json: bool) -> Result<()> {
    let env = super::resolve_layers(layers, base_url)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&env)?);
    } else {
        print_summary(&env);
    }
    Ok(())
}

fn print_summary(env: &Environment) {
    println!(
        "{} {} ({})",
        "Environment".bold(),
        env.qualified_name().as_str().cyan(),
        env.descriptor
    );
    if !env.description.is_empty() {
        println!("  {}", env.description.dimmed());
    }
    println!();

    let platform = env.platform();
    if !platform.parent_ids().is_empty() {
        println!("{}: {}", "Parents".bold(), platform.parent_ids().join(" <- "));
    }
    println!("{}:", "Components".bold());
    for component in platform.components().values() {
        if component.repository.is_empty() {
            println!("  {} ({})", component.id.cyan(), component.kind);
        } else {
            println!(
                "  {} {}@{} ({})",
                component.id.cyan(),
                component.repository.location,
                component.repository.reference,
                component.kind
            );
        }
    }
    println!();

    println!("{}:", "Providers".bold());
    for provider in env.providers().values() {
        println!(
            "  {} component={}{}",
            provider.name.cyan(),
            provider.component.id,
            describe(&provider.parameters)
        );
    }
    println!();

    println!("{}:", "Node sets".bold());
    for node_set in env.nodes().values() {
        let effective = node_set
            .provider
            .resolve(env)
            .map(|p| describe(&p.parameters))
            .unwrap_or_else(|| format!(" {}", "(unknown provider)".yellow()));
        println!(
            "  {} x{} on {}{}",
            node_set.name.cyan(),
            node_set.instances,
            node_set.provider.name,
            effective
        );
    }
    println!();

    match env.stack_order() {
        Ok(order) => println!("{}: {}", "Stacks".bold(), order.join(", ")),
        Err(e) => println!("{}: {}", "Stacks".bold(), e.to_string().yellow()),
    }

    if !env.tasks().is_empty() {
        println!("{}:", "Tasks".bold());
        for task in env.tasks().values() {
            let schedule = if task.cron.is_empty() {
                String::new()
            } else {
                format!(" [{}]", task.cron)
            };
            println!("  {} {}{}", task.name.cyan(), task.playbook, schedule);
        }
    }
}

/// Render parameters as ` key=value ...`, empty when there are none.
fn describe(parameters: &Parameters) -> String {
    parameters
        .iter()
        .map(|(key, value)| {
            let rendered = serde_json::to_string(value).unwrap_or_default();
            format!(" {key}={rendered}")
        })
        .collect()
}
