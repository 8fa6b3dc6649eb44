use std::{fs, path::Path, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use hypercat_sig::{
    envelope,
    signer::{Rs256Signer, Rs256Verifier},
    Catalogue, Config,
};

/// Sign and verify Hypercat catalogues with RS256.
#[derive(Parser, Debug)]
#[command(name = "hypercat-sig", version)]
#[command(group(ArgGroup::new("mode").required(true).args(["sign", "verify"])))]
struct Cli {
    /// Produce debug output
    #[arg(short, long)]
    verbose: bool,

    /// Sign FILE, requires --privkey and --pubkey
    #[arg(long, value_name = "FILE", requires = "privkey", requires = "pubkey")]
    sign: Option<PathBuf>,

    /// Verify FILE, requires --pubkey
    #[arg(long, value_name = "FILE", requires = "pubkey")]
    verify: Option<PathBuf>,

    /// Public key .pem
    #[arg(long, value_name = "PEM")]
    pubkey: Option<PathBuf>,

    /// Private key .pem
    #[arg(long, value_name = "PEM")]
    privkey: Option<PathBuf>,

    /// JSON file with canonicalization settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let config = serde_json::from_str(&read_file(path)?)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // signing and verification inputs are logged at trace level
    let level = if cli.verbose { "hypercat_sig=trace" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(cli.config.as_deref())?;

    let verifier = match &cli.pubkey {
        Some(path) => Some(
            Rs256Verifier::from_pem(&read_file(path)?)
                .with_context(|| format!("Failed to read pubkey {}", path.display()))?,
        ),
        None => None,
    };

    if let (Some(path), Some(privkey), Some(verifier)) = (&cli.sign, &cli.privkey, &verifier) {
        let signer = Rs256Signer::from_pem(&read_file(privkey)?)
            .with_context(|| format!("Failed to read privkey {}", privkey.display()))?;

        let catalogue = Catalogue::from_json_str(&read_file(path)?)
            .with_context(|| format!("Invalid Hypercat {}", path.display()))?;
        let signed = envelope::sign_with_config(&catalogue, &signer, verifier, &config)
            .with_context(|| format!("Failed to sign {}", path.display()))?;
        println!("{}", signed.to_json_string_pretty());

        return Ok(ExitCode::SUCCESS);
    }

    if let (Some(path), Some(verifier)) = (&cli.verify, &verifier) {
        let catalogue = Catalogue::from_json_str(&read_file(path)?)
            .with_context(|| format!("Invalid Hypercat {}", path.display()))?;
        if envelope::verify_with_config(&catalogue, verifier, &config)? {
            println!("Verify OK");
            return Ok(ExitCode::SUCCESS);
        }
        println!("Verify failed");
    }

    Ok(ExitCode::FAILURE)
}
