mod audit;
mod backend;
mod cli;
mod config;
mod error;
mod feed;
mod identity;
mod messages;
mod mock;
mod remote;
mod storage;
mod store;
mod validation;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::cell::RefCell;
use std::path::PathBuf;

use crate::backend::IdentityBackend;
use crate::config::BackendKind;
use crate::messages::Locale;
use crate::mock::MockBackend;
use crate::remote::RemoteBackend;
use crate::storage::Storage;
use crate::store::SessionStore;

#[derive(Parser)]
#[command(name = "linkus", about = "LINK-US student community client")]
pub struct Args {
    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Identity backend: mock or remote")]
    pub backend: Option<String>,

    #[arg(long, env = "LINKUS_BASE_URL", help = "Remote service base URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "LINKUS_LOCALE", help = "Display locale: korean or english")]
    pub locale: Option<String>,

    #[arg(long, help = "Persisted storage directory")]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account (and sign in, on the mock backend)
    Signup {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        university: Option<String>,
        #[arg(long, help = "korean or foreigner")]
        nationality: Option<String>,
        #[arg(long)]
        major: Option<String>,
        #[arg(long)]
        year: Option<u32>,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Edit profile fields of the signed-in account
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        university: Option<String>,
        #[arg(long, help = "korean or foreigner")]
        nationality: Option<String>,
        #[arg(long)]
        major: Option<String>,
        #[arg(long)]
        year: Option<u32>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long, help = "Profile image URL")]
        avatar: Option<String>,
    },
    /// Browse community listings (all, events, or jobs)
    Feed {
        #[arg(default_value = "all", help = "all, events, or jobs")]
        what: String,
        #[arg(long, help = "Event category filter")]
        category: Option<String>,
        #[arg(long, help = "Only jobs with/without visa sponsorship")]
        visa_sponsorship: Option<bool>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load().unwrap_or_default()
    };

    // CLI and environment overrides.
    if let Some(kind_str) = &args.backend {
        match BackendKind::from_str(kind_str) {
            Some(kind) => cfg.backend = kind,
            None => {
                return Err(anyhow::anyhow!(
                    "Invalid backend: {}. Use: mock, remote",
                    kind_str
                ))
            }
        }
    }
    if let Some(base_url) = &args.base_url {
        cfg.remote.base_url = base_url.clone();
    }
    if let Some(locale_str) = &args.locale {
        match Locale::from_str(locale_str) {
            Some(locale) => cfg.locale = locale,
            None => {
                return Err(anyhow::anyhow!(
                    "Invalid locale: {}. Use: korean, english",
                    locale_str
                ))
            }
        }
    }
    if args.storage_dir.is_some() {
        cfg.storage_dir = args.storage_dir.clone();
    }

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("Config error {}", error);
        }
        return Err(anyhow::anyhow!("invalid configuration"));
    }

    let storage = Storage::open(&cfg.storage_dir())?;
    let identity_backend: Box<dyn IdentityBackend> = match cfg.backend {
        BackendKind::Mock => Box::new(MockBackend::new(storage)),
        BackendKind::Remote => Box::new(RemoteBackend::new(
            &cfg.remote.base_url,
            cfg.remote.timeout_ms,
            storage,
        )),
    };
    let store = SessionStore::open(identity_backend);

    let invocation_id = uuid::Uuid::new_v4().to_string();
    let mut audit = audit::AuditLog::new(&cfg.audit_log(), &invocation_id)?;
    if let Some(user) = store.user() {
        audit.session_restored(store.backend_name(), &user.email)?;
    }

    let mut ctx = cli::Context {
        config: cfg,
        store,
        audit: RefCell::new(audit),
    };

    let ok = match args.command {
        Command::Signup {
            email,
            password,
            name,
            university,
            nationality,
            major,
            year,
        } => cli::cmd_signup(
            &mut ctx,
            email,
            password,
            name,
            university,
            nationality,
            major,
            year,
        )?,
        Command::Login { email, password } => cli::cmd_login(&mut ctx, email, password)?,
        Command::Logout => cli::cmd_logout(&mut ctx)?,
        Command::Whoami => cli::cmd_whoami(&ctx)?,
        Command::Profile {
            name,
            university,
            nationality,
            major,
            year,
            bio,
            avatar,
        } => cli::cmd_profile(
            &mut ctx,
            name,
            university,
            nationality,
            major,
            year,
            bio,
            avatar,
        )?,
        Command::Feed {
            what,
            category,
            visa_sponsorship,
        } => cli::cmd_feed(&ctx, &what, category, visa_sponsorship)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
