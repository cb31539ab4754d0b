use anyhow::{Context, Result};
use colored::Colorize;
use home_price_estimator::config;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Prints the effective configuration (file plus environment overrides)
pub fn show(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", toml::to_string_pretty(&cfg)?);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());

    let cfg = config::load_config(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    if !config_path.exists() {
        println!(
            "  {} {} not found, using defaults and environment",
            "note:".dimmed(),
            config_path.display()
        );
    }

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Artifact root: {}", cfg.artifacts.root.display());
    println!(
        "  Search order: {}/, then {}/",
        cfg.artifacts.preferred_dir, cfg.artifacts.legacy_dir
    );
    println!("  Model candidates: {}", cfg.artifacts.model_files.join(", "));

    info!("Configuration validation successful");
    Ok(())
}

#[cfg(test)]
mod tests {
    use home_price_estimator::config::Config;

    #[test]
    fn test_effective_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("port = 5000"));

        // Output parses back into the same settings
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.artifacts.model_prefix, Config::default().artifacts.model_prefix);
    }
}
