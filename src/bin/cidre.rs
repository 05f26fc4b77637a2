//! cidre: pull RIR delegations, count addresses and apply country firewall rules.

use clap::{Parser, Subcommand, ValueEnum};
use cidre::countries::normalize_country_code;
use cidre::firewall::{DryRunRunner, SystemRunner};
use cidre::{
    Action, CidrCounter, Compiler, Config, Firewall, FirewallKind, FsCidrStore, LogReporter,
    PullMetadata, RirFetcher,
};
use num_bigint::BigUint;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cidre")]
#[command(author = "Vulnebify")]
#[command(version)]
#[command(about = "Country CIDR sets from RIR delegation files", long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for compiled CIDR files
    #[arg(long, global = true)]
    cidr_store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull delegation files from all RIRs and store per-country CIDRs
    Pull {
        /// Merge adjacent and contained blocks before saving
        #[arg(short, long)]
        merge: bool,

        /// Proxy URL for registry requests
        #[arg(short, long)]
        proxy: Option<String>,
    },

    /// Count addresses per country (all countries if none given)
    Count {
        /// ISO 3166-1 alpha-2 country codes
        countries: Vec<String>,
    },

    /// Allow traffic from countries
    Allow(FirewallArgs),

    /// Drop traffic from countries
    Deny(FirewallArgs),

    /// Reject traffic from countries
    Reject(FirewallArgs),
}

#[derive(clap::Args)]
struct FirewallArgs {
    /// ISO 3166-1 alpha-2 country codes
    #[arg(required = true)]
    countries: Vec<String>,

    /// Firewall to configure
    #[arg(short, long, value_enum, default_value_t = FirewallChoice::Ufw)]
    firewall: FirewallChoice,

    /// Print commands instead of running them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FirewallChoice {
    Ufw,
    Iptables,
}

impl From<FirewallChoice> for FirewallKind {
    fn from(choice: FirewallChoice) -> Self {
        match choice {
            FirewallChoice::Ufw => FirewallKind::Ufw,
            FirewallChoice::Iptables => FirewallKind::Iptables,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> cidre::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = cli.cidr_store {
        config.cidr_store = dir;
    }

    match cli.command {
        Commands::Pull { merge, proxy } => {
            if proxy.is_some() {
                config.proxy = proxy;
            }
            pull(&config, merge)
        }
        Commands::Count { countries } => count(&config, &countries),
        Commands::Allow(args) => apply(&config, Action::Allow, args),
        Commands::Deny(args) => apply(&config, Action::Deny, args),
        Commands::Reject(args) => apply(&config, Action::Reject, args),
    }
}

fn pull(config: &Config, merge: bool) -> cidre::Result<()> {
    let store = FsCidrStore::new(&config.cidr_store);
    if let Some(age) = store.load_metadata()?.age() {
        log::info!("Previous pull was {} minutes ago", age.as_secs() / 60);
    }

    let fetcher = RirFetcher::new(config)?;
    let sources = fetcher.fetch_all();
    let registries = sources
        .iter()
        .filter(|s| !s.lines.is_empty())
        .map(|s| s.registry.to_string())
        .collect();

    let reporter = LogReporter;
    let compiler = Compiler::new(&reporter).with_merge(merge);
    let set = compiler.compile(&sources);

    let written = store.save(&set)?;
    store.save_metadata(&PullMetadata::now(compiler.merge(), registries))?;

    println!(
        "Saved {} countries ({} files) into {}",
        set.len(),
        written,
        store.base().display()
    );
    Ok(())
}

fn count(config: &Config, countries: &[String]) -> cidre::Result<()> {
    let countries = countries
        .iter()
        .map(|c| normalize_country_code(c))
        .collect::<cidre::Result<Vec<_>>>()?;

    let store = FsCidrStore::new(&config.cidr_store);
    let counts = CidrCounter::new(&store).count(&countries)?;
    if counts.is_empty() {
        println!("No CIDR files found in {}", store.base().display());
        return Ok(());
    }

    let mut total = BigUint::default();
    for entry in &counts {
        println!("{}: {}", entry.country, entry.addresses);
        total += &entry.addresses;
    }
    println!("Total: {}", total);
    Ok(())
}

fn apply(config: &Config, action: Action, args: FirewallArgs) -> cidre::Result<()> {
    let countries = args
        .countries
        .iter()
        .map(|c| normalize_country_code(c))
        .collect::<cidre::Result<Vec<_>>>()?;

    let store = FsCidrStore::new(&config.cidr_store);
    let kind = FirewallKind::from(args.firewall);

    if args.dry_run {
        let runner = DryRunRunner::new();
        Firewall::new(kind.backend(), &runner, &store).apply(action, &countries)?;
        for command in runner.commands() {
            println!("{}", command);
        }
        return Ok(());
    }

    let executed =
        Firewall::new(kind.backend(), &SystemRunner, &store).apply(action, &countries)?;
    println!(
        "{}: {} {} ({} commands)",
        kind,
        action,
        countries.join(", "),
        executed
    );
    Ok(())
}
