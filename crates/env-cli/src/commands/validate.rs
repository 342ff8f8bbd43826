//! The `validate` command

use std::path::PathBuf;

use colored::Colorize;
use env_model::{ErrorType, ValidationError, ValidationErrors};

use crate::error::{CliError, Result};

/// Resolve `layers` and print the validation report.
///
/// Fails with [`CliError::Invalid`] when the report holds errors.
pub fn run_validate(layers: &[PathBuf], base_url: &str, json: bool) -> Result<()> {
    let env = super::resolve_layers(layers, base_url)?;
    let report = env.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(env.qualified_name().as_str(), &report);
    }

    let count = report.errors().count();
    if count > 0 {
        return Err(CliError::Invalid { count });
    }
    Ok(())
}

fn print_report(name: &str, report: &ValidationErrors) {
    for issue in report {
        println!("{}", format_issue(issue));
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if report.is_empty() {
        println!("{} environment {} is valid", "OK".green().bold(), name.cyan());
    } else if errors == 0 {
        println!(
            "{} environment {} is valid with {} warning(s)",
            "OK".green().bold(),
            name.cyan(),
            warnings
        );
    } else {
        println!(
            "{} {} error(s), {} warning(s)",
            "FAILED".red().bold(),
            errors,
            warnings
        );
    }
}

fn format_issue(issue: &ValidationError) -> String {
    let severity = match issue.error_type {
        ErrorType::Error => "error".red().bold(),
        ErrorType::Warning => "warning".yellow().bold(),
    };
    let mut line = format!("{}: {} @{}", severity, issue.message, issue.location.path.cyan());
    if !issue.location.descriptor.is_empty() {
        line.push_str(&format!(" in {}", issue.location.descriptor.dimmed()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_model::DescriptorLocation;

    #[test]
    fn test_format_issue_mentions_path_and_descriptor() {
        colored::control::set_override(false);
        let mut report = ValidationErrors::new();
        report.add_error(&DescriptorLocation::new("root").appending("nodes"), "no node specified");

        let line = format_issue(report.iter().next().unwrap());

        assert_eq!(line, "error: no node specified @nodes in root");
    }
}
