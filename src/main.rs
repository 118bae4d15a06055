use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tagsmith::anthropic::AnthropicError;
use tagsmith::frontmatter::read_tags;
use tagsmith::review::{self, ReviewOutcome};
use tagsmith::settings::SettingsUpdate;
use tagsmith::utils::get_settings_path;
use tagsmith::{
    ConsoleNotifier, Language, NoteStore, Notifier, Settings, TaggingService, Vault, VaultError,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// tagsmith - suggest and apply note tags with Claude
#[derive(Parser)]
#[command(name = "tagsmith")]
#[command(about = "Suggest and apply tags to Markdown notes using Claude")]
#[command(version)]
struct Cli {
    /// Root directory of the note vault
    #[arg(
        long,
        global = true,
        env = "TAGSMITH_VAULT",
        value_name = "DIR",
        default_value = "."
    )]
    vault: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Suggest tags for one note and review them before applying
    Suggest(SuggestCommand),
    /// Suggest tags for every note in the vault
    TagAll,
    /// Print the tags recorded in a note's header
    Tags(TagsCommand),
    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Suggest tags for a single note
#[derive(Parser)]
struct SuggestCommand {
    /// Note to tag, relative to the vault or as a file path
    #[arg(value_name = "NOTE")]
    note: PathBuf,

    /// Apply every suggested tag without the review dialog
    #[arg(short, long)]
    yes: bool,
}

/// Print a note's tags
#[derive(Parser)]
struct TagsCommand {
    /// Note to inspect
    #[arg(value_name = "NOTE")]
    note: PathBuf,
}

/// Settings subcommands
#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the effective settings
    Show,
    /// Change and save settings
    Set(SetCommand),
}

/// Change settings
#[derive(Parser)]
struct SetCommand {
    /// Anthropic API key
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Maximum number of suggested tags
    #[arg(long, value_name = "N")]
    max_tags: Option<u32>,

    /// Write suggestions without review during tag-all
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    auto_apply: Option<bool>,

    /// Tag language: auto, en or ko
    #[arg(long, value_name = "LANG")]
    language: Option<Language>,
}

impl From<&SetCommand> for SettingsUpdate {
    fn from(cmd: &SetCommand) -> Self {
        SettingsUpdate {
            api_key: cmd.api_key.clone(),
            model: cmd.model.clone(),
            max_tags: cmd.max_tags,
            auto_apply: cmd.auto_apply,
            language: cmd.language,
        }
    }
}

fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Suggest(cmd) => handle_suggest(&cli.vault, cmd),
        Commands::TagAll => handle_tag_all(&cli.vault),
        Commands::Tags(cmd) => handle_tags(&cli.vault, cmd),
        Commands::Settings(SettingsCommand::Show) => handle_settings_show(),
        Commands::Settings(SettingsCommand::Set(cmd)) => handle_settings_set(cmd),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Logs go to stderr so stdout only carries user-facing output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tagsmith=warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are missing configuration, bad arguments and notes that do
/// not exist. Network, API and I/O failures are internal errors.
fn is_user_error(error: &anyhow::Error) -> bool {
    let caused_by_user = error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<AnthropicError>(),
            Some(AnthropicError::MissingApiKey)
        ) || matches!(
            cause.downcast_ref::<VaultError>(),
            Some(
                VaultError::NotADirectory(_)
                    | VaultError::OutsideVault(_)
                    | VaultError::NotFound(_)
            )
        )
    });

    let error_msg = error.to_string();
    caused_by_user || error_msg.contains("cannot be empty") || error_msg.contains("must be at least")
}

/// Loads settings, filling an empty API key from the environment.
fn load_settings() -> Result<Settings> {
    let path = get_settings_path()?;
    Ok(Settings::load(&path)?.with_env_api_key())
}

fn open_vault(dir: &Path) -> Result<Vault> {
    Vault::open(dir).context("Failed to open vault")
}

/// Handles the suggest command for a single note.
fn handle_suggest(vault_dir: &Path, cmd: &SuggestCommand) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(vault_dir)?;
    let path = vault.locate(&cmd.note)?;
    let service = TaggingService::connect(vault, settings)?;
    let notifier = ConsoleNotifier;

    let suggestion = service.suggest_for(&path)?;
    if suggestion.is_empty() {
        notifier.notice("No tags suggested");
        return Ok(());
    }

    let selection = if cmd.yes {
        suggestion.tags.clone()
    } else {
        match review::run_review(&suggestion)? {
            ReviewOutcome::Confirmed(tags) => tags,
            ReviewOutcome::Cancelled => {
                notifier.notice("Cancelled; note unchanged");
                return Ok(());
            }
        }
    };

    let tags = service.apply(&path, &selection)?;
    notifier.notice(&format!("Tagged {path}: {}", tags.join(", ")));
    Ok(())
}

/// Handles the tag-all command.
fn handle_tag_all(vault_dir: &Path) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(vault_dir)?;
    let service = TaggingService::connect(vault, settings)?;

    if !service.settings().auto_apply {
        eprintln!(
            "Note: autoApply is off, so suggestions are not written. \
             Enable it with `tagsmith settings set --auto-apply true`."
        );
    }

    let report = service.run_all(&ConsoleNotifier)?;

    if !report.failures.is_empty() {
        eprintln!("\nFailures:");
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.path, failure.message);
        }
    }

    Ok(())
}

/// Handles the tags command.
fn handle_tags(vault_dir: &Path, cmd: &TagsCommand) -> Result<()> {
    let vault = open_vault(vault_dir)?;
    let tags = execute_tags(&vault, &cmd.note)?;

    if tags.is_empty() {
        println!("(no tags)");
    } else {
        for tag in tags {
            println!("{tag}");
        }
    }
    Ok(())
}

/// Reads the tags of a note. Needs no API key.
fn execute_tags(vault: &Vault, note: &Path) -> Result<Vec<String>> {
    let path = vault.locate(note)?;
    let content = vault.read_note(&path)?;
    Ok(read_tags(&content))
}

/// Handles `settings show`.
fn handle_settings_show() -> Result<()> {
    let path = get_settings_path()?;
    let settings = Settings::load(&path)?.with_env_api_key();

    println!("Settings file: {}", path.display());
    print!("{}", format_settings(&settings));
    Ok(())
}

fn format_settings(settings: &Settings) -> String {
    format!(
        "apiKey:    {}\nmodel:     {}\nmaxTags:   {}\nautoApply: {}\nlanguage:  {}\n",
        settings.masked_api_key(),
        settings.model,
        settings.max_tags,
        settings.auto_apply,
        settings.language
    )
}

/// Handles `settings set`.
fn handle_settings_set(cmd: &SetCommand) -> Result<()> {
    let path = get_settings_path()?;
    let saved = execute_settings_set(&path, SettingsUpdate::from(cmd))?;

    println!("Settings saved to {}", path.display());
    print!("{}", format_settings(&saved));
    Ok(())
}

/// Applies `update` to the settings stored at `path` and saves the result.
///
/// Works on the stored values only, so a key taken from the environment is
/// never written to disk.
fn execute_settings_set(path: &Path, update: SettingsUpdate) -> Result<Settings> {
    if update.is_empty() {
        anyhow::bail!("Settings update cannot be empty; pass at least one option");
    }

    let stored = Settings::load(path)?;
    let updated = update.apply(&stored);
    updated.save(path)?;
    Ok(updated)
}
