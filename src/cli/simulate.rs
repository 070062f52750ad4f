use super::config::{default_config_path, VotebookConfig};
use super::logging::init_logging;
use std::path::{Path, PathBuf};
use votebook::clock::{Clock, SystemClock};
use votebook::scenario::{run_scenario, Scenario, ScenarioReport, StepOutcome};

/// Replay a scenario file against a fresh in-memory ledger
///
/// ## Configuration Loading
///
/// Configuration is loaded from one of these sources (in order of precedence):
/// 1. `--config` flag if provided
/// 2. Default config at `~/.config/votebook/config.toml` if it exists
/// 3. Built-in defaults
///
/// The simulated clock starts at the scenario's `start`, then the configured
/// `[clock] start`, then the current wall time.
pub async fn execute(
    scenario_path: String,
    config_path: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => VotebookConfig::load(Path::new(&path))?,
        None => VotebookConfig::load_or_default(&default_config_path())?,
    };
    init_logging(&config.logging)?;

    let scenario = Scenario::load(&PathBuf::from(&scenario_path))?;
    let default_start = config.clock.start.unwrap_or_else(|| SystemClock.now());
    let report = run_scenario(&scenario, default_start)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

/// Human-readable rendering of a scenario report
pub fn render_report(report: &ScenarioReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Scenario started at {}\n\n", report.start));

    for step in &report.steps {
        let line = match &step.outcome {
            StepOutcome::Ok { summary, .. } => format!("✅ {}", summary),
            StepOutcome::Rejected { kind, message } => format!("❌ {}: {}", kind, message),
        };
        out.push_str(&format!(
            "[{:>3}] t={} {:<9} {}\n",
            step.index, step.at, step.action, line
        ));
    }

    out.push_str(&format!(
        "\n{} step(s), {} rejected, {} event(s), clock at {}\n",
        report.steps.len(),
        report.rejected_count(),
        report.events.len(),
        report.final_time
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SCENARIO: &str = r#"
start = 1700000000

[[step]]
action = "propose"
as = "owner"
description = "Test Proposal"
expires_in = "1h"

[[step]]
action = "propose"
as = "owner"
description = "Expired Proposal"
expires_ago = "1h"
"#;

    #[test]
    fn test_render_report() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let report = run_scenario(&scenario, 0).unwrap();

        let rendered = render_report(&report);
        assert!(rendered.contains("Scenario started at 1700000000"));
        assert!(rendered.contains("owner created proposal #1"));
        assert!(rendered.contains("InvalidExpiration"));
        assert!(rendered.contains("2 step(s), 1 rejected, 1 event(s)"));
    }

    #[tokio::test]
    async fn test_execute_with_explicit_config() {
        let temp_dir = TempDir::new().unwrap();
        let scenario_path = temp_dir.path().join("scenario.toml");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&scenario_path, SCENARIO).unwrap();
        VotebookConfig::create_default(&config_path).unwrap();

        let result = execute(
            scenario_path.display().to_string(),
            Some(config_path.display().to_string()),
            true,
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_missing_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        VotebookConfig::create_default(&config_path).unwrap();

        let result = execute(
            temp_dir.path().join("missing.toml").display().to_string(),
            Some(config_path.display().to_string()),
            false,
        )
        .await;
        assert!(result.is_err());
    }
}
