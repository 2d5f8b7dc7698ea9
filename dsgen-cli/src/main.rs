mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // Show dsgen info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("dsgen", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Generate {
            path,
            namespace,
            language,
            hierarchical_update,
            linq,
            out,
        } => commands::generate::run(
            path,
            commands::generate::GenerateArgs {
                namespace,
                language,
                hierarchical_update: *hierarchical_update,
                linq: *linq,
                output: out.as_deref(),
            },
            &cli.global,
        ),
        Command::Info { path } => commands::info::run(path, &cli.global),
        Command::Provider { path, table } => {
            commands::provider::run(path, table.as_deref(), &cli.global)
        }
        Command::Signature {
            path,
            table,
            query,
            get,
            paging,
            container,
            language,
        } => commands::signature::run(
            path,
            commands::signature::SignatureArgs {
                table: table.as_deref(),
                query: query.as_deref(),
                get: *get,
                paging: *paging,
                container,
                language,
            },
            &cli.global,
        ),
        Command::RefEncode { expression } => commands::refs::encode(expression, &cli.global),
        Command::RefDecode { text } => commands::refs::decode(text, &cli.global),
    }
}
