use super::config::{default_config_path, VotebookConfig};
use std::path::PathBuf;

/// Write the default commented configuration file
///
/// Refuses to overwrite an existing file unless `force` is set.
pub async fn execute(path: Option<String>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

    if config_path.exists() && !force {
        return Err(format!(
            "Config file '{}' already exists (use --force to overwrite)",
            config_path.display()
        )
        .into());
    }

    VotebookConfig::create_default(&config_path)?;
    println!("📝 Created: {}", config_path.display());

    Ok(())
}
