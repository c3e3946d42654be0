use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use survey_dash_evaluator::path::resolve;
use survey_dash_evaluator::{
    spawn_poller, DiagnosticLevel, FilterControl, RenderOutput, Renderer, SectionInputs,
    SharedChannel, ToggleControl,
};
use survey_dash_schema::SchemaDocument;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;
use tracing::{debug, error, info};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Schema document (overrides config)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Data file (overrides config)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Section id (defaults to the first section)
    #[arg(long)]
    pub section: Option<String>,

    /// Path in the data to the entity the user selected
    #[arg(long)]
    pub selected: Option<String>,

    /// Path in the data to the item on display
    #[arg(long)]
    pub item: Option<String>,

    /// Initial shared filter, as if chosen from filter pills
    #[arg(long)]
    pub filter: Option<String>,

    /// Start with the word cloud toggled off
    #[arg(long)]
    pub hide_word_cloud: bool,

    /// Keep reading filter selections from stdin and re-render on every change
    #[arg(long)]
    pub follow: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub fn render(args: RenderArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let session = Session::load(&args, &config, cwd)?;
    let pretty = args.pretty;

    if !args.follow {
        print_output(&session.render()?, pretty);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let input = BufReader::new(tokio::io::stdin());
    LocalSet::new().block_on(
        &runtime,
        follow(Rc::new(session), input, config.poll_interval(), move |output| {
            print_output(output, pretty)
        }),
    )
}

/// Load inputs and render the requested section
pub fn render_output(args: &RenderArgs, config: &Config, cwd: &Path) -> Result<RenderOutput> {
    Session::load(args, config, cwd)?.render()
}

/// Loaded inputs of a render, reusable across passes that share one channel
pub struct Session {
    document: SchemaDocument,
    data: Value,
    section: Option<String>,
    selected: Option<Value>,
    item: Option<Value>,
    channel: SharedChannel,
    renderer: Renderer,
    _filter: Option<FilterControl>,
    _toggle: Option<ToggleControl>,
}

impl Session {
    pub fn load(args: &RenderArgs, config: &Config, cwd: &Path) -> Result<Self> {
        let schema_path = Config::resolve_input(cwd, args.schema.as_deref(), config.schema_path.as_deref())
            .ok_or_else(|| anyhow!("No schema given. Pass --schema or set schemaPath in the config"))?;
        let document = SchemaDocument::load(&schema_path)
            .with_context(|| format!("Failed to load schema {}", schema_path.display()))?;
        info!(schema = %schema_path.display(), "Loaded schema");

        let data = match Config::resolve_input(cwd, args.data.as_deref(), config.data_path.as_deref()) {
            Some(path) => {
                let source = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read data {}", path.display()))?;
                serde_json::from_str(&source)
                    .with_context(|| format!("Invalid JSON in {}", path.display()))?
            }
            None => {
                debug!("No data file, rendering against an empty context");
                Value::Object(Default::default())
            }
        };

        let channel = SharedChannel::new();
        let filter = args.filter.as_ref().map(|value| {
            let control = FilterControl::attach(&channel);
            control.select(value.clone());
            control
        });
        let toggle = args.hide_word_cloud.then(|| {
            let control = ToggleControl::attach(&channel);
            control.set(false);
            control
        });

        Ok(Self {
            selected: lookup(&data, args.selected.as_deref(), "--selected")?,
            item: lookup(&data, args.item.as_deref(), "--item")?,
            document,
            data,
            section: args.section.clone(),
            channel,
            renderer: Renderer::new().with_rules(config.visibility.clone()),
            _filter: filter,
            _toggle: toggle,
        })
    }

    pub fn channel(&self) -> &SharedChannel {
        &self.channel
    }

    /// One render pass of the section against the session's channel
    pub fn render(&self) -> Result<RenderOutput> {
        let inputs = SectionInputs {
            selected: self.selected.clone(),
            item: self.item.clone(),
            channel: Some(self.channel.clone()),
        };
        let output = self
            .renderer
            .render_section(&self.document, self.section.as_deref(), self.data.clone(), inputs)?;
        Ok(output)
    }
}

/// Render once, then again every time a poll observes a channel change.
///
/// Each input line acts as a writer: `toggle` flips the word cloud, any other
/// non-blank line selects that filter value. Returns at end of input, after
/// giving the poller time to observe the last change.
pub async fn follow<R, F>(session: Rc<Session>, input: R, interval: Duration, emit: F) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Fn(&RenderOutput) + 'static,
{
    emit(&session.render()?);

    let filter = FilterControl::attach(session.channel());
    let toggle = ToggleControl::attach(session.channel());
    let poller = {
        let session = Rc::clone(&session);
        spawn_poller(session.channel().clone(), interval, move |snapshot| {
            debug!(filter = %snapshot.filter_value, toggle = snapshot.toggle_value, "Channel changed");
            match session.render() {
                Ok(output) => emit(&output),
                Err(err) => error!(error = %err, "Re-render failed"),
            }
        })
    };

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match line.trim() {
            "" => {}
            "toggle" => toggle.toggle(),
            value => filter.select(value),
        }
    }

    tokio::time::sleep(interval * 2).await;
    poller.stop();
    Ok(())
}

fn lookup(data: &Value, path: Option<&str>, flag: &str) -> Result<Option<Value>> {
    match path {
        None => Ok(None),
        Some(path) => resolve(data, path)
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow!("{} path '{}' not found in data", flag, path)),
    }
}

fn print_output(output: &RenderOutput, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(err) => error!(error = %err, "Failed to serialize render output"),
    }
    print_summary(output);
}

fn print_summary(output: &RenderOutput) {
    eprintln!(
        "{} section {} ({} nodes)",
        "✓".green(),
        output.section.bright_white(),
        output.nodes.len()
    );
    for diagnostic in &output.diagnostics {
        let level = match diagnostic.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
            DiagnosticLevel::Info => "info".blue().bold(),
        };
        let at = match (&diagnostic.component_type, &diagnostic.data_path) {
            (Some(kind), Some(path)) => format!(" {} @ {}", kind, path),
            (Some(kind), None) => format!(" {}", kind),
            _ => String::new(),
        };
        eprintln!("  {} [{}]{} {}", level, diagnostic.code, at.dimmed(), diagnostic.message);
    }
}
