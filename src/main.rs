use color_eyre::{eyre::eyre, Result};
use feedterm::adapters::TomlAccountStore;
use feedterm::cli::{parse_args, run_cli_command, version_line, CliCommand, USAGE};
use feedterm::config::AppConfig;
use feedterm::logger::init_tracing;
use feedterm::terminal::setup_panic_hook;

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args());

    // Version and help need neither config nor accounts
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            print!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    let config = AppConfig::load_default().map_err(|err| eyre!("{}", err.user_message()))?;

    match init_tracing(&config.log.dir) {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "tracing enabled"),
        Ok(None) => {}
        Err(err) => eprintln!("Warning: {}", err),
    }

    let accounts =
        TomlAccountStore::open_default().map_err(|err| eyre!("{}", err.user_message()))?;

    if matches!(command, CliCommand::Stream { .. }) {
        // Restore the terminal if the UI panics
        setup_panic_hook();
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_cli_command(command, &config, &accounts))
}
