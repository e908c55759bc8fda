use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tag_args_core::{ArgumentParser, ParsedArguments};
use tag_args_registry::{ProxyCatalog, RegistryFile, validate_registry};
use tracing::debug;

/// Output format for parsed arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    /// The parsed structure as JSON.
    Json,
    /// The parsed structure as YAML.
    Yaml,
    /// The rendered HTML attribute string.
    Html,
}

/// Output format for registry listings.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ListFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "tag-args")]
#[command(about = "Parse template tag argument strings")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. debug, tag_args_core=trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one tag invocation's arguments.
    Parse(ParseArgs),
    /// List the proxies known to a registry.
    Proxies(ProxiesArgs),
    /// Validate one or more registry files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct RegistryArgs {
    /// Registry file; repeat to build a fallback chain.
    #[arg(long = "registry")]
    registries: Vec<PathBuf>,
    /// Do not fall back to the built-in registry.
    #[arg(long)]
    no_builtin: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Tag name the arguments belong to (e.g. img, css, js).
    #[arg(long)]
    tag: String,
    /// Raw argument string. Read from stdin when omitted.
    raw: Option<String>,
    #[command(flatten)]
    registry: RegistryArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ProxiesArgs {
    #[command(flatten)]
    registry: RegistryArgs,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: ListFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Registry files to validate.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Proxies(args) => run_proxies(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_catalog(args: &RegistryArgs) -> Result<ProxyCatalog, String> {
    let mut builder = ProxyCatalog::builder();
    for path in &args.registries {
        builder = builder.from_file(path);
    }
    if !args.no_builtin {
        builder = builder.with_builtin();
    }
    builder
        .build()
        .map_err(|err| format!("Failed to load proxy registry: {err}"))
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let raw = match args.raw {
        Some(raw) => raw,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            raw.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let catalog = load_catalog(&args.registry)?;
    debug!(source = ?catalog.source(), "Using proxy catalog");

    let parsed = ArgumentParser::new(&catalog)
        .parse(&raw, &args.tag)
        .map_err(|err| format!("Failed to parse '{raw}': {err}"))?;

    print!("{}", format_parsed(&parsed, args.format)?);
    Ok(())
}

fn format_parsed(parsed: &ParsedArguments, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(parsed)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("Failed to serialize output: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(parsed).map_err(|e| format!("Failed to serialize output: {e}"))
        }
        CliOutputFormat::Html => Ok(format!("{}\n", parsed.to_html())),
    }
}

fn run_proxies(args: ProxiesArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.registry)?;
    let file = catalog.to_registry_file();

    match args.format {
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&file)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        ListFormat::Yaml => {
            let yaml = serde_yaml::to_string(&file)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            print!("{yaml}");
        }
        ListFormat::Table => {
            for proxy in catalog.proxies() {
                let tags = if proxy.tags.is_empty() {
                    "*".to_string()
                } else {
                    proxy.tags.join(",")
                };
                println!("{}\t{}\t{}", proxy.name, tags, proxy.args.join(" "));
            }
        }
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failures = 0usize;
    for path in &args.inputs {
        let file = RegistryFile::load(path)
            .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
        let errors = validate_registry(&file);
        if errors.is_empty() {
            println!("{}: ok ({} proxies)", path.display(), file.proxies.len());
        } else {
            failures += 1;
            for error in errors {
                eprintln!("{}: {error}", path.display());
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} invalid registry file(s)"));
    }
    Ok(())
}
