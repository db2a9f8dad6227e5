use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use billflow::cli::{
    handle_bill_command, handle_categories_command, handle_config_command, handle_import_command,
    handle_insights_command, handle_plan_command, handle_project_command, handle_schedule_command,
    handle_subscription_command, BillCommands, ConfigCommands, ImportArgs, InsightsArgs, PlanArgs,
    PlanCommandArgs, ProjectArgs, SubscriptionCommands,
};
use billflow::config::{paths::BillflowPaths, settings::Settings};
use billflow::models::UserId;
use billflow::storage::{SessionChain, SessionProvider, Storage};

#[derive(Parser)]
#[command(
    name = "billflow",
    author = "Kaylee Beyene",
    version,
    about = "Bill and subscription tracker with a payment scheduler",
    long_about = "billflow keeps track of your bills and subscriptions, lays them out \
                  on a payment schedule for the month, and projects your day-by-day \
                  balance so you can see a shortfall before it happens."
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize billflow and create a default user
    Init,

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Bill management commands
    #[command(subcommand)]
    Bill(BillCommands),

    /// Subscription management commands
    #[command(subcommand, alias = "subscription")]
    Sub(SubscriptionCommands),

    /// Import bills or subscriptions from JSON or CSV
    Import(ImportArgs),

    /// Show the payment schedule for a month
    Schedule(PlanArgs),

    /// Project the daily balance for a month
    Project(ProjectArgs),

    /// Show scheduled spending by category
    Categories(PlanArgs),

    /// Full monthly plan (text, JSON or YAML)
    Plan(PlanCommandArgs),

    /// Duplicates, price increases and savings suggestions
    Insights(InsightsArgs),
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn current_user(settings: &Settings) -> Result<UserId> {
    SessionChain::standard(settings)
        .current_user()
        .context("No user selected. Run 'billflow init' or set BILLFLOW_USER")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let paths = BillflowPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing billflow at: {}", paths.base_dir().display());
            let user = match settings.default_user {
                Some(user) => user,
                None => {
                    let user = UserId::new();
                    settings.default_user = Some(user);
                    user
                }
            };
            settings.save(&paths)?;
            storage.save_all()?;

            println!("Initialization complete!");
            println!("  Default user: {}", user);
            println!("  Settings:     {}", paths.settings_file().display());
            println!();
            println!("Next: 'billflow bill add Rent 1200 --due 2024-03-01 --category Housing'");
        }
        Some(Commands::Config(cmd)) => {
            handle_config_command(&paths, &mut settings, cmd)?;
        }
        Some(Commands::Bill(cmd)) => {
            let user = current_user(&settings)?;
            handle_bill_command(&storage, user, cmd)?;
        }
        Some(Commands::Sub(cmd)) => {
            let user = current_user(&settings)?;
            handle_subscription_command(&storage, user, cmd)?;
        }
        Some(Commands::Import(args)) => {
            let user = current_user(&settings)?;
            handle_import_command(&storage, user, &args)?;
        }
        Some(Commands::Schedule(args)) => {
            let user = current_user(&settings)?;
            handle_schedule_command(&storage, &settings, user, &args)?;
        }
        Some(Commands::Project(args)) => {
            let user = current_user(&settings)?;
            handle_project_command(&storage, &settings, user, &args)?;
        }
        Some(Commands::Categories(args)) => {
            let user = current_user(&settings)?;
            handle_categories_command(&storage, &settings, user, &args)?;
        }
        Some(Commands::Plan(args)) => {
            let user = current_user(&settings)?;
            handle_plan_command(&storage, &settings, user, &args)?;
        }
        Some(Commands::Insights(args)) => {
            let user = current_user(&settings)?;
            handle_insights_command(&storage, &settings, user, &args)?;
        }
        None => {
            println!("billflow - bills, subscriptions and cash flow");
            println!();
            println!("Run 'billflow --help' for usage information.");
            println!("Run 'billflow init' to get started.");
        }
    }

    Ok(())
}
