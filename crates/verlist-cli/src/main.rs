//! # verlist CLI
//!
//! Walks through the registry's retention policies.

use anyhow::Result;
use std::env;
use tracing_subscriber::EnvFilter;

mod config;
mod demos;

use config::DemoConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    run(&args[1])
}

/// Dispatch a subcommand. Configuration is read only by commands that use it.
fn run(command: &str) -> Result<()> {
    match command {
        "plain" | "replace" => demos::plain(&load_config()?),
        "keep-old" => demos::keep_old(&load_config()?),
        "no-delete" => demos::no_delete(&load_config()?),
        "all" => {
            let config = load_config()?;
            demos::plain(&config);
            demos::keep_old(&config);
            demos::no_delete(&config);
        }
        "replay" => demos::replay(&load_config()?),
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn load_config() -> Result<DemoConfig> {
    let config = DemoConfig::from_env()?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), ?config, "Loaded configuration");
    Ok(config)
}

fn print_help() {
    println!(
        r#"verlist

USAGE:
    verlist <COMMAND>

COMMANDS:
    plain       Replace policy: the new entry replaces the old one
    keep-old    Keep-old policy: the first entry wins, sweeps still remove
    no-delete   No-delete policy: the callback copies into the original entry
    all         Run the three walkthroughs in order
    replay      Apply VERLIST_GENERATIONS under VERLIST_POLICY
    help        Show this help message

ENVIRONMENT:
    VERLIST_POLICY          replace | keep-old | no-delete (replay only)
    VERLIST_KEY             key used by the walkthroughs (default "123")
    VERLIST_INITIAL_VALUE   first payload (default 123)
    VERLIST_UPDATE_VALUE    colliding payload (default 456)
    VERLIST_GENERATIONS     JSON array of {{"key": value}} objects
    RUST_LOG                log filter (default "info")

EXAMPLES:
    verlist keep-old
    VERLIST_POLICY=no-delete VERLIST_GENERATIONS='[{{"a":1}},{{"b":2}}]' verlist replay
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_ignores_invalid_configuration() {
        std::env::set_var("VERLIST_POLICY", "bogus");
        let help = run("help");
        let demo = run("plain");
        std::env::remove_var("VERLIST_POLICY");

        assert!(help.is_ok());
        assert!(demo.is_err());
    }
}
