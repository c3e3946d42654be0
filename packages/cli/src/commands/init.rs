use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::Path;

const SCHEMA_FILE: &str = "schema.json";
const DATA_FILE: &str = "data.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "!".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "Initializing survey dashboard...".bright_blue().bold());

    // Starter schema and data are never overwritten
    let schema_path = cwd.join(SCHEMA_FILE);
    if !schema_path.exists() {
        fs::write(&schema_path, serde_json::to_string_pretty(&example_schema())?)?;
        println!("  {} Created {}", "✓".green(), SCHEMA_FILE);
    }
    let data_path = cwd.join(DATA_FILE);
    if !data_path.exists() {
        fs::write(&data_path, serde_json::to_string_pretty(&example_data())?)?;
        println!("  {} Created {}", "✓".green(), DATA_FILE);
    }

    let config = Config {
        schema_path: Some(SCHEMA_FILE.to_string()),
        data_path: Some(DATA_FILE.to_string()),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "Dashboard initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} and {}", SCHEMA_FILE, DATA_FILE);
    println!("  2. Run: survey-dash lint");
    println!("  3. Run: survey-dash render --pretty");

    Ok(())
}

fn example_schema() -> serde_json::Value {
    json!({
        "sections": [{
            "id": "overview",
            "title": "{{survey.name}}",
            "components": [
                { "type": "metric", "dataPath": "survey.nps", "title": "NPS", "index": 0,
                  "cardStyle": "highlight", "config": { "decimals": 0 } },
                { "type": "barChart", "dataPath": "charts.regions", "title": "Responses by region", "index": 1 },
                { "type": "filterPills", "config": { "options": ["all", "praise", "issue"] }, "index": 2 },
                { "type": "list", "dataPath": "comments", "index": 3,
                  "config": { "itemTemplate": "{{item.text}}", "filterField": "kind" } }
            ]
        }]
    })
}

fn example_data() -> serde_json::Value {
    json!({
        "survey": { "name": "Customer pulse", "nps": 32 },
        "charts": { "regions": [
            { "label": "North", "value": 120 },
            { "label": "South", "value": 86 }
        ] },
        "comments": [
            { "text": "Support was quick", "kind": "praise" },
            { "text": "Invoices are confusing", "kind": "issue" }
        ]
    })
}
