use clap::Parser;
use color_eyre::Result;
use workflo::{
    Config, Database, Profile, SqliteNotesService,
    cli::{Cli, Commands},
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;

    // File logging; the handle must stay alive for buffered records to flush
    let _logger = workflo::logging::init(&config.get_log_dir(profile))?;

    // Initialize database
    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    // Dispatch to appropriate command handler
    match cli.command {
        None | Some(Commands::Board) => {
            let service = SqliteNotesService::new(db);
            let app = workflo::tui::App::new(config, service)?;
            workflo::tui::run_event_loop(app)?;
        }
        Some(Commands::AddNote {
            title,
            email,
            password,
            status,
            priority,
            due,
            description,
        }) => {
            workflo::cli::handle_add_note(
                title,
                email,
                password,
                status,
                priority,
                due,
                description,
                &db,
            )?;
        }
        Some(Commands::Signup {
            name,
            email,
            password,
        }) => {
            workflo::cli::handle_signup(name, email, password, &db)?;
        }
    }

    Ok(())
}
