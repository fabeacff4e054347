use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use hv_core::core_api::{Engine, ExtractOptions};
use hv_render::{
    JsonStyle, SectionSelection, TextRenderOptions, render_json_full, render_json_selected,
    render_selected_pairs, render_text_with_options,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_STRICT_WARNINGS: i32 = 3;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "CAPTURE.htm")]
    path: PathBuf,
    #[arg(long)]
    json: bool,
    /// Single-line JSON instead of pretty-printed.
    #[arg(long, requires = "json")]
    compact: bool,
    #[arg(long)]
    player: bool,
    #[arg(long)]
    abilities: bool,
    #[arg(long)]
    monsters: bool,
    #[arg(long)]
    log: bool,
    #[arg(long)]
    items: bool,
    #[arg(long)]
    warnings: bool,
    /// Exit with status 3 when the capture produced any warning.
    #[arg(long)]
    strict: bool,
    #[arg(
        long = "quickbar-slots",
        value_name = "N",
        default_value_t = ExtractOptions::default().quickbar_slots,
        value_parser = clap::value_parser!(u32).range(1..=64)
    )]
    quickbar_slots: u32,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn sections_from_cli(cli: &Cli) -> SectionSelection {
    SectionSelection {
        player: cli.player,
        abilities: cli.abilities,
        monsters: cli.monsters,
        log: cli.log,
        items: cli.items,
        warnings: cli.warnings,
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let sections = sections_from_cli(&cli);

    let engine = Engine::with_options(ExtractOptions {
        quickbar_slots: cli.quickbar_slots,
        ..ExtractOptions::default()
    });
    let session = engine.open_path(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading capture: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });
    let snapshot = session.snapshot();
    debug!(
        path = %cli.path.display(),
        warnings = snapshot.warnings.len(),
        "capture parsed"
    );

    if cli.json {
        let json = if sections.is_any_selected() {
            render_json_selected(snapshot, &sections, JsonStyle::CanonicalV1)
        } else {
            render_json_full(snapshot, JsonStyle::CanonicalV1)
        };
        let rendered = if cli.compact {
            serde_json::to_string(&json)
        } else {
            serde_json::to_string_pretty(&json)
        }
        .unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
    } else if sections.is_any_selected() {
        for (key, value) in render_selected_pairs(snapshot, &sections) {
            println!("{key}={value}");
        }
    } else {
        let options = TextRenderOptions {
            verbose: cli.verbose > 0,
        };
        print!("{}", render_text_with_options(snapshot, options));
    }

    if cli.strict && !session.is_complete() {
        eprintln!(
            "{} warning(s) while extracting {}",
            session.warnings().len(),
            cli.path.display()
        );
        process::exit(EXIT_STRICT_WARNINGS);
    }
}
