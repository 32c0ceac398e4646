//! Minimal CLI: load → (routes file | diagnostics | runtime helper)
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, Args};
use colored::Colorize;

use routes_ts::routes::RouteTable;
use routes_ts::signatures::SignatureEnvironment;
use routes_ts::{Diagnostic, Generated, emit, generate, load};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate typed TypeScript route bindings from a route table dump and action signatures
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log filter used when RUST_LOG is unset (e.g. `info`, `routes_ts=debug`)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit the routes file (type aliases + resource descriptors)
    Generate(GenerateOut),
    /// run the pipeline and report skipped actions and routes without writing anything
    Check(CheckOut),
    /// emit the runtime request helper the resources are shaped for
    Runtime(RuntimeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// route table dump (JSON: an array of routes or `{ "routes": [...] }`)
    #[arg(long, short)]
    routes: PathBuf,

    /// One or more signature documents. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    signatures: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// also write the runtime helper here
    #[arg(long)]
    runtime_out: Option<PathBuf>,

    /// fail (and write nothing) if any action was skipped
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// evaluate the path of this route (name as in the route table)
    #[arg(long)]
    eval: Option<String>,

    /// JSON object of params for `--eval`
    #[arg(long, default_value = "{}")]
    params: String,

    /// exit non-zero if any action was skipped
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(clap::Parser, Debug)]
struct RuntimeOut {
    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<(SignatureEnvironment, RouteTable)> {
        let signature_paths = load::resolve_file_path_patterns(&self.signatures)
            .context("failed to resolve signature file paths")?;
        let env = load::load_signatures(&signature_paths)?;
        let table = load::load_route_table(&self.routes)?;
        Ok((env, table))
    }

    fn generate(&self) -> Result<Generated> {
        let (env, table) = self.load()?;
        let generated = generate(&env, &table).context("generation aborted")?;
        Ok(generated)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS)
                }

                let generated = target.input_settings.generate()?;
                report(&generated);
                if target.strict && !generated.diagnostics.is_empty() {
                    return Ok(ExitCode::FAILURE)
                }
                write_output(target.out.as_deref(), &generated.text)?;
                if let Some(runtime_out) = target.runtime_out.as_deref() {
                    write_output(Some(runtime_out), emit::RUNTIME_HELPER)?;
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Check(target) => {
                let generated = target.input_settings.generate()?;
                report(&generated);
                if let Some(name) = target.eval.as_deref() {
                    let params = parse_params(&target.params)?;
                    match routes_ts::generate::evaluate_route(&generated, name, &params) {
                        None => anyhow::bail!("no resource was emitted for route `{name}`"),
                        Some(Ok(path)) => println!("{path}"),
                        Some(Err(error)) => {
                            eprintln!("{}: {error}", "error".red().bold());
                            return Ok(ExitCode::FAILURE)
                        }
                    }
                }
                if target.strict && !generated.diagnostics.is_empty() {
                    return Ok(ExitCode::FAILURE)
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Runtime(target) => {
                write_output(target.out.as_deref(), emit::RUNTIME_HELPER)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn report(generated: &Generated) {
    for diagnostic in &generated.diagnostics {
        print_diagnostic("skipped".yellow().bold(), diagnostic);
    }
    for diagnostic in &generated.skipped_routes {
        print_diagnostic("omitted".dimmed(), diagnostic);
    }
    eprintln!(
        "{} {} action signature(s), {} resource(s), {} action(s) skipped",
        "routes-ts:".green().bold(),
        generated.signatures.len(),
        generated.descriptors.len(),
        generated.diagnostics.len(),
    );
}

fn print_diagnostic(label: colored::ColoredString, diagnostic: &Diagnostic) {
    eprintln!("{label} {}: {}", diagnostic.subject.bold(), diagnostic.reason);
}

/// `--params` must be a JSON object; anything else is rejected before evaluation.
fn parse_params(src: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(src).context("--params must be a JSON object")? {
        serde_json::Value::Object(params) => Ok(params),
        other => anyhow::bail!("--params must be a JSON object, got `{other}`"),
    }
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => print!("{text}"),
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
