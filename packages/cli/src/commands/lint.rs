use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use survey_dash_evaluator::Registry;
use survey_dash_linter::{lint_schema, Diagnostic, DiagnosticLevel, LintOptions};
use survey_dash_schema::SchemaDocument;

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Schema document to lint (overrides config)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn lint(args: LintArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let schema_path = Config::resolve_input(cwd, args.schema.as_deref(), config.schema_path.as_deref())
        .ok_or_else(|| anyhow!("No schema given. Pass --schema or set schemaPath in the config"))?;

    let diagnostics = lint_file(&schema_path)?;
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics
        .iter()
        .filter(|d| matches!(d.level, DiagnosticLevel::Warning))
        .count();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        println!("{}", schema_path.display());
        for diagnostic in &diagnostics {
            let level_str = match diagnostic.level {
                DiagnosticLevel::Error => "error".red().bold(),
                DiagnosticLevel::Warning => "warning".yellow().bold(),
                DiagnosticLevel::Info => "info".blue().bold(),
            };
            println!(
                "  {} [{}] {} {}",
                level_str,
                diagnostic.rule,
                diagnostic.path().dimmed(),
                diagnostic.message
            );
            if let Some(suggestion) = &diagnostic.suggestion {
                println!("    {} {}", "hint:".dimmed(), suggestion.dimmed());
            }
        }
        println!();
        if errors > 0 {
            println!("   {} {}", "Errors:".red(), errors);
        }
        if warnings > 0 {
            println!("   {} {}", "Warnings:".yellow(), warnings);
        }
        if diagnostics.is_empty() {
            println!("   {} No issues found!", "✓".green());
        }
    }

    // Exit with error code if there are errors
    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Lint a schema file against the built-in component types
pub fn lint_file(path: &Path) -> Result<Vec<Diagnostic>> {
    let document = SchemaDocument::load(path)
        .with_context(|| format!("Failed to load schema {}", path.display()))?;
    Ok(lint_schema(
        &document,
        LintOptions {
            known_types: Some(Registry::new().type_tags()),
            ..Default::default()
        },
    ))
}
