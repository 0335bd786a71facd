//! Context First operator CLI
//!
//! `init-db` provisions the database, `check` probes connectivity, and
//! `serve` runs the HTTP surface. Connection settings come from flags
//! first, then the environment, then the local development defaults.

use anyhow::Context;
use cf_api::ApiConfig;
use cf_store::{MongoStore, ProvisionPlan, StoreConfig};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

fn db_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("uri")
                .long("uri")
                .help("MongoDB connection string (defaults to MONGODB_URI)"),
        )
        .arg(
            Arg::new("database")
                .long("database")
                .help("Database name (defaults to MONGODB_DATABASE)"),
        )
}

fn store_config(args: &ArgMatches) -> StoreConfig {
    let mut config = StoreConfig::from_env();
    if let Some(uri) = args.get_one::<String>("uri") {
        config.uri = uri.clone();
    }
    if let Some(database) = args.get_one::<String>("database") {
        config.database = database.clone();
    }
    config
}

async fn init_db(args: &ArgMatches) -> anyhow::Result<()> {
    let mut config = store_config(args);
    if let Some(user) = args.get_one::<String>("app-user") {
        config.app_user = user.clone();
    }
    if let Some(password) = args.get_one::<String>("app-password") {
        config.app_password = password.clone();
    }

    let store = MongoStore::connect(&config)
        .await
        .with_context(|| format!("connecting to {}", config.uri))?;

    let mut plan = ProvisionPlan::context_first(&config);
    if args.get_flag("skip-user") {
        plan = plan.without_app_user();
    }

    let report = plan
        .apply(store.database())
        .await
        .with_context(|| format!("provisioning database {}", config.database))?;

    println!("Database {} provisioned", config.database);
    println!("{report}");
    Ok(())
}

async fn check(args: &ArgMatches) -> anyhow::Result<()> {
    let config = store_config(args);
    let store = MongoStore::connect(&config)
        .await
        .with_context(|| format!("connecting to {}", config.uri))?;
    store.ping().await.context("ping failed")?;

    println!("Database {} reachable at {}", config.database, config.uri);
    Ok(())
}

async fn serve(args: &ArgMatches) -> anyhow::Result<()> {
    let mut config = ApiConfig::from_env().context("reading API configuration")?;
    if let Some(bind) = args.get_one::<String>("bind") {
        config.bind = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }

    cf_api::serve(config).await;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Command::new("context-first")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Context First platform operations")
        .arg_required_else_help(true)
        .subcommand(
            db_args(
                Command::new("init-db")
                    .about("Provision the database: collections, validators, indexes, app user"),
            )
            .arg(
                Arg::new("app-user")
                    .long("app-user")
                    .help("Application username (defaults to MONGODB_APP_USER)"),
            )
            .arg(
                Arg::new("app-password")
                    .long("app-password")
                    .help("Application password (defaults to MONGODB_APP_PASSWORD)"),
            )
            .arg(
                Arg::new("skip-user")
                    .long("skip-user")
                    .action(ArgAction::SetTrue)
                    .help("Do not create the application user"),
            ),
        )
        .subcommand(db_args(
            Command::new("check").about("Ping the database and report reachability"),
        ))
        .subcommand(
            Command::new("serve").about("Run the HTTP API").arg(
                Arg::new("bind")
                    .long("bind")
                    .help("Bind address (defaults to API_BIND)"),
            ),
        );

    let matches = cli.get_matches();

    let result = match matches.subcommand() {
        Some(("init-db", args)) => init_db(args).await,
        Some(("check", args)) => check(args).await,
        Some(("serve", args)) => serve(args).await,
        _ => unreachable!("subcommand required"),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
