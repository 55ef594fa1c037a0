use clap::Parser;
use osrc_netconv::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

/// Converts node-graph editor networks into the control runtime's node configuration
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the editor's network JSON file
    #[arg(short, long, default_value = "node_network.json")]
    input: PathBuf,

    /// Path of the runtime configuration to write
    #[arg(short, long, default_value = "node_config.json")]
    output: PathBuf,

    /// Spaces per indentation level in the written JSON
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Convert and report, but do not write anything
    #[arg(long, conflicts_with = "stdout")]
    check: bool,

    /// Print the converted document to stdout instead of writing the output file
    #[arg(long)]
    stdout: bool,

    /// Accept an extra editor type name, e.g. `--alias OldConstant=Constant`
    #[arg(long = "alias", value_name = "NAME=TAG", value_parser = parse_alias)]
    aliases: Vec<(String, NodeTag)>,

    /// Log per-node translation and folding details
    #[arg(short, long)]
    verbose: bool,
}

fn parse_alias(raw: &str) -> std::result::Result<(String, NodeTag), String> {
    let (name, tag) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TAG, got '{}'", raw))?;
    if name.is_empty() {
        return Err("alias name must not be empty".to_string());
    }
    Ok((name.to_string(), tag.parse::<NodeTag>()?))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let start = Instant::now();
    let converter = cli
        .aliases
        .iter()
        .fold(Converter::builder(), |builder, (name, tag)| {
            builder.with_tag_alias(name, *tag)
        })
        .with_indent(cli.indent)
        .build();

    if cli.check || cli.stdout {
        let document = load_document(&cli.input).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load network document: {}", e))
        });
        let converted = converter
            .convert(&document)
            .unwrap_or_else(|e| exit_with_error(&format!("Conversion failed: {}", e)));

        if cli.stdout {
            let json = to_pretty_json(&converted, converter.options().indent)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to render output: {}", e)));
            println!("{}", json);
        } else {
            report(&converted, start);
        }
        return;
    }

    let converted = converter
        .convert_file(&cli.input, &cli.output)
        .unwrap_or_else(|e| exit_with_error(&format!("Conversion failed: {}", e)));
    report(&converted, start);
    eprintln!("Wrote {}", cli.output.display());
}

fn report(converted: &OutputDocument, start: Instant) {
    eprintln!("\n--- Conversion Summary ---");
    for (name, network) in &converted.networks {
        eprintln!(
            "  {:<24} {:>4} nodes {:>4} connections",
            name,
            network.nodes.len(),
            network.connections.len()
        );
    }
    eprintln!("  Global variables: {}", converted.user_node_vars.len());
    eprintln!("  Completed in {:?}", start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
