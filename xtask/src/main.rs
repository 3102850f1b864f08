//! Workspace tasks for the connection routing crates.
//!
//! Run with `cargo xtask <command>`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

/// Library crates checked one by one, in dependency order.
const CRATES: &[&str] = &["rdbms-balancer", "rdbms-testing", "rdbms-connection-manager"];

/// Fuzz targets under `fuzz/fuzz_targets`.
const FUZZ_TARGETS: &[&str] = &["settings_string", "config_json"];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace tasks for rdbms-connection-manager")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format check, clippy, tests and docs for every crate
    Ci,
    /// Check formatting
    Fmt,
    /// Run clippy on each crate with warnings denied
    Lint,
    /// Run the tests of one crate, or of all of them
    Test {
        /// Crate to test (e.g. rdbms-balancer)
        #[arg(short, long)]
        package: Option<String>,
    },
    /// Build the public API docs with warnings denied
    Doc,
    /// Run the domain and routing property tests with more cases
    Proptest {
        /// Cases per property
        #[arg(long, default_value_t = 4096)]
        cases: u32,
    },
    /// Fuzz one config parser (needs nightly and cargo-fuzz)
    Fuzz {
        /// Fuzz target name
        #[arg(default_value = "settings_string")]
        target: String,
        /// Stop after this many seconds
        #[arg(long, default_value_t = 60)]
        seconds: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .context("xtask must live inside the workspace")?;
    sh.change_dir(root);

    match cli.command {
        Command::Ci => {
            fmt(&sh)?;
            for krate in CRATES {
                lint(&sh, krate)?;
                test(&sh, krate)?;
            }
            doc(&sh)?;
            println!("ci: ok");
        }
        Command::Fmt => fmt(&sh)?,
        Command::Lint => {
            for krate in CRATES {
                lint(&sh, krate)?;
            }
        }
        Command::Test { package } => match package {
            Some(krate) => test(&sh, &krate)?,
            None => {
                for krate in CRATES {
                    test(&sh, krate)?;
                }
            }
        },
        Command::Doc => doc(&sh)?,
        Command::Proptest { cases } => proptest(&sh, cases)?,
        Command::Fuzz { target, seconds } => fuzz(&sh, &target, seconds)?,
    }

    Ok(())
}

fn fmt(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo fmt --all -- --check").run()?;
    Ok(())
}

fn lint(sh: &Shell, krate: &str) -> Result<()> {
    println!("clippy: {krate}");
    cmd!(sh, "cargo clippy -p {krate} --all-targets -- -D warnings").run()?;
    Ok(())
}

fn test(sh: &Shell, krate: &str) -> Result<()> {
    if !CRATES.contains(&krate) {
        bail!("unknown crate {krate}, expected one of {CRATES:?}");
    }
    println!("test: {krate}");
    cmd!(sh, "cargo test -p {krate}").run()?;
    Ok(())
}

fn doc(sh: &Shell) -> Result<()> {
    let _deny = sh.push_env("RUSTDOCFLAGS", "-D warnings");
    cmd!(sh, "cargo doc --no-deps -p rdbms-balancer -p rdbms-connection-manager").run()?;
    Ok(())
}

fn proptest(sh: &Shell, cases: u32) -> Result<()> {
    let _cases = sh.push_env("PROPTEST_CASES", cases.to_string());
    cmd!(sh, "cargo test -p rdbms-balancer prop_").run()?;
    cmd!(sh, "cargo test -p rdbms-connection-manager --test properties").run()?;
    Ok(())
}

fn fuzz(sh: &Shell, target: &str, seconds: u64) -> Result<()> {
    if !FUZZ_TARGETS.contains(&target) {
        bail!("unknown fuzz target {target}, expected one of {FUZZ_TARGETS:?}");
    }
    let max_time = format!("-max_total_time={seconds}");
    let _dir = sh.push_dir("fuzz");
    cmd!(sh, "cargo +nightly fuzz run {target} -- {max_time}").run()?;
    Ok(())
}
