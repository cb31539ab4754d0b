use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Execute the locations command
///
/// Prints every location column of the loaded schema, in file order
pub fn execute(config_path: &Path) -> Result<()> {
    let (_, store) = super::load_store(config_path)?;
    let estimator = store.current();

    println!(
        "{} {}",
        "Locations".green().bold(),
        format!("({})", estimator.locations().len()).dimmed()
    );
    for location in estimator.locations() {
        println!("  {}", location);
    }

    Ok(())
}
