use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use movekey_account::account::{Account, Ed25519Account, SingleKeyAccount};
use movekey_account::auth_key::domain_abstraction_address;
use movekey_account::crypto::decode_hex;
use movekey_account::crypto::ed25519::Ed25519PrivateKey;
use movekey_account::crypto::private_key::PrivateKey;
use movekey_account::crypto::secp256k1::Secp256k1PrivateKey;
use movekey_account::keyless::{EphemeralKeyPair, Jwt};
use movekey_account::{AccountConfig, VERSION};

/// Key generation, address derivation and signing for Move-based chains
#[derive(Parser, Debug)]
#[command(name = "movekey")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Curve {
    Ed25519,
    Secp256k1,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new private key and print its account
    Generate {
        /// Curve of the new key
        #[arg(long, value_enum, default_value = "ed25519")]
        curve: Curve,

        /// Use the legacy Ed25519 scheme instead of single-key
        #[arg(long)]
        legacy: bool,
    },
    /// Print the address of an AIP-80 private key
    Address {
        /// AIP-80 private key, e.g. ed25519-priv-0x...
        #[arg(long)]
        private_key: String,

        /// Use the legacy Ed25519 scheme instead of single-key
        #[arg(long)]
        legacy: bool,
    },
    /// Print the address of a domain-abstracted account
    DeriveDomainAddress {
        /// Authentication function, address::module::function
        #[arg(long)]
        function: String,

        /// Account identity, hex
        #[arg(long)]
        identity: String,
    },
    /// Sign a hex message and print the BCS account authenticator
    Sign {
        /// AIP-80 private key
        #[arg(long)]
        private_key: String,

        /// Message, hex
        #[arg(long)]
        message: String,

        /// Use the legacy Ed25519 scheme instead of single-key
        #[arg(long)]
        legacy: bool,
    },
    /// Decode a persisted account and print its scheme and address
    DecodeAccount {
        /// Account bytes, hex
        bytes: String,
    },
    /// Generate an ephemeral key pair for a keyless login
    Ephemeral {
        /// JSON account configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the keyless address for a token and pepper
    KeylessAddress {
        /// Compact JWT
        #[arg(long)]
        jwt: String,

        /// 31-byte pepper, hex
        #[arg(long)]
        pepper: String,

        /// User id claim; defaults to the configured claim
        #[arg(long)]
        uid_key: Option<String>,

        /// JSON account configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();
    log::debug!("movekey {VERSION}");

    match cli.command {
        None => {
            Cli::command().print_help()?;
            std::process::exit(0);
        }
        Some(Commands::Generate { curve, legacy }) => {
            let key = match curve {
                Curve::Ed25519 => PrivateKey::Ed25519(Ed25519PrivateKey::generate()?),
                Curve::Secp256k1 => PrivateKey::Secp256k1(Secp256k1PrivateKey::generate()?),
            };
            let account = account_for(key.clone(), legacy)?;
            println!("Private key: {}", key.to_aip80_string());
            println!("Scheme:      {}", account.signing_scheme());
            println!("Address:     {}", account.address().to_string_long());
        }
        Some(Commands::Address {
            private_key,
            legacy,
        }) => {
            let account = account_for(PrivateKey::from_aip80(&private_key)?, legacy)?;
            println!("{}", account.address().to_string_long());
        }
        Some(Commands::DeriveDomainAddress { function, identity }) => {
            let identity = decode_hex(&identity)?;
            let address = domain_abstraction_address(&function, &identity)?;
            println!("{}", address.to_string_long());
        }
        Some(Commands::Sign {
            private_key,
            message,
            legacy,
        }) => {
            let account = account_for(PrivateKey::from_aip80(&private_key)?, legacy)?;
            let authenticator = account.sign_with_authenticator(&decode_hex(&message)?)?;
            println!("0x{}", hex::encode(movekey_bcs::to_bytes(&authenticator)));
        }
        Some(Commands::DecodeAccount { bytes }) => {
            let account = Account::from_bytes(&decode_hex(&bytes)?)?;
            println!("Scheme:  {}", account.signing_scheme());
            println!("Address: {}", account.address().to_string_long());
        }
        Some(Commands::Ephemeral { config }) => {
            let config = load_config(config.as_deref())?;
            let key_pair = EphemeralKeyPair::generate_with_config(&config)?;
            println!("Nonce:   {}", key_pair.nonce());
            println!("Expires: {}", key_pair.expiry_date_secs());
            println!("Bytes:   0x{}", hex::encode(key_pair.to_bytes()));
        }
        Some(Commands::KeylessAddress {
            jwt,
            pepper,
            uid_key,
            config,
        }) => {
            let config = load_config(config.as_deref())?;
            let uid_key = uid_key.unwrap_or(config.default_uid_key);
            let jwt = Jwt::parse(&jwt)?;
            let public_key = jwt.keyless_public_key(&decode_hex(&pepper)?, &uid_key)?;
            println!("{}", public_key.auth_key().derived_address().to_string_long());
        }
    }

    Ok(())
}

fn account_for(key: PrivateKey, legacy: bool) -> Result<Account> {
    match (key, legacy) {
        (PrivateKey::Ed25519(key), true) => Ok(Ed25519Account::new(key, None).into()),
        (PrivateKey::Secp256k1(_), true) => {
            anyhow::bail!("--legacy only applies to Ed25519 keys")
        }
        (key, false) => Ok(SingleKeyAccount::new(key, None).into()),
    }
}

fn load_config(path: Option<&Path>) -> Result<AccountConfig> {
    match path {
        Some(path) => AccountConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AccountConfig::default()),
    }
}
