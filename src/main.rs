use anyhow::Result;
use clap::{Parser, Subcommand};

use bankrec_match::cli::{handle_auto_command, handle_log_command, handle_session_command, MatchArgs};
use bankrec_match::config::{BankrecPaths, Settings};

#[derive(Parser)]
#[command(
    name = "bankrec",
    author = "Kaylee Beyene",
    version,
    about = "Match a bank statement line against open transactions",
    long_about = "bankrec finds the open invoices and bills that add up exactly to a \
                  bank statement line. It proposes a match automatically and lets you \
                  adjust the selection without ever overshooting the statement amount."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run auto-match once and print the result
    Auto(MatchArgs),

    /// Start an interactive matching session
    #[command(alias = "s")]
    Session(MatchArgs),

    /// Write default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent session events
    Log {
        /// Number of events to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BankrecPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Auto(args)) => {
            let stdout = std::io::stdout();
            handle_auto_command(&args, &settings, &paths, &mut stdout.lock())?;
        }
        Some(Commands::Session(args)) => {
            handle_session_command(&args, &settings, &paths)?;
        }
        Some(Commands::Init) => {
            println!("Initializing bankrec at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Settings written to {}", paths.settings_file().display());
        }
        Some(Commands::Config) => {
            println!("bankrec Configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Minor unit scale: {}", settings.minor_unit_scale);
            println!("  Audit enabled:    {}", settings.audit_enabled);
            println!("  Multi-item match: {}", settings.matching.multi_item_auto_match);
            println!("  Max combo size:   {}", settings.matching.max_combo_size);
            println!("  Search budget:    {}", settings.matching.search_budget);
            match settings.matching.time_budget_ms {
                Some(ms) => println!("  Time budget:      {} ms", ms),
                None => println!("  Time budget:      none"),
            }
        }
        Some(Commands::Log { count }) => {
            let stdout = std::io::stdout();
            handle_log_command(&paths, count, &mut stdout.lock())?;
        }
        None => {
            println!("bankrec - exact-sum statement line matching");
            println!();
            println!("Run 'bankrec --help' for usage information.");
            println!("Run 'bankrec auto --target 249.00' to try the sample catalog.");
        }
    }

    Ok(())
}
