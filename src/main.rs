use std::io::Write;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use cutil::{
    command,
    utils::{self, LogLevel},
    PwhashConfig, Value,
};

#[derive(Parser)]
#[command(name = "cutil", version, about = "Percent-encoding and password hashing utilities")]
struct Cli {
    /// debug, info, warn or error
    #[arg(long, global = true, default_value = "error")]
    log_level: LogLevel,

    #[command(subcommand)]
    group: Group,
}

#[derive(Subcommand)]
enum Group {
    /// Percent-encoding
    #[command(subcommand)]
    Url(UrlCommand),

    /// Password hashing and random bytes
    Crypto {
        #[command(flatten)]
        cost: CostArgs,

        #[command(subcommand)]
        command: CryptoCommand,
    },
}

#[derive(Subcommand)]
enum UrlCommand {
    Encode { input: String },
    Decode { input: String },
}

#[derive(Subcommand)]
enum CryptoCommand {
    Pwhash { password: String },
    PwhashVerify { hash: String, password: String },
    RandomBytes {
        /// May be negative, which is rejected with an argument error
        #[arg(allow_hyphen_values = true)]
        count: String,

        /// Write the raw bytes instead of hex
        #[arg(long)]
        raw: bool,
    },
}

/// Overrides for the interactive Argon2id preset.
#[derive(Args)]
struct CostArgs {
    #[arg(long)]
    memory_kib: Option<u32>,
    #[arg(long)]
    iterations: Option<u32>,
    #[arg(long)]
    lanes: Option<u32>,
}

impl CostArgs {
    fn to_config(&self) -> PwhashConfig {
        let defaults = PwhashConfig::default();
        PwhashConfig {
            memory_kib: self.memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.iterations.unwrap_or(defaults.iterations),
            lanes: self.lanes.unwrap_or(defaults.lanes),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    utils::set_global_log_level(cli.log_level);

    let (words, config, hex_output) = match &cli.group {
        Group::Url(cmd) => {
            let words = match cmd {
                UrlCommand::Encode { input } => vec!["url", "encode", input.as_str()],
                UrlCommand::Decode { input } => vec!["url", "decode", input.as_str()],
            };
            (words, PwhashConfig::default(), false)
        }
        Group::Crypto { cost, command: cmd } => {
            let (words, hex_output) = match cmd {
                CryptoCommand::Pwhash { password } => {
                    (vec!["crypto", "pwhash", password.as_str()], false)
                }
                CryptoCommand::PwhashVerify { hash, password } => (
                    vec!["crypto", "pwhash_verify", hash.as_str(), password.as_str()],
                    false,
                ),
                CryptoCommand::RandomBytes { count, raw } => {
                    (vec!["crypto", "random_bytes", count.as_str()], !raw)
                }
            };
            (words, cost.to_config(), hex_output)
        }
    };

    let words: Vec<&[u8]> = words.iter().map(|w| w.as_bytes()).collect();
    let value = command::dispatch(&words, &config)
        .with_context(|| format!("{} {} failed", cli_word(&words, 0), cli_word(&words, 1)))?;

    let mut output = match value {
        Value::Bytes(bytes) if hex_output => hex::encode(bytes).into_bytes(),
        other => other.to_bytes(),
    };
    output.push(b'\n');

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output).context("failed to write output")?;
    stdout.flush().context("failed to flush output")?;
    Ok(())
}

fn cli_word(words: &[&[u8]], index: usize) -> String {
    words
        .get(index)
        .map(|w| String::from_utf8_lossy(w).into_owned())
        .unwrap_or_default()
}
