use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use datacontract::config::AppConfig;
use datacontract::contract::{FieldStore, load_draft, save_draft};
use datacontract::logging;
use datacontract::shell::{Outcome, Session};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "datacontract",
    about = "Build data contracts and render contract documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty contract draft
    New {
        /// Path of the draft file to create
        draft: PathBuf,

        /// Contract name
        #[arg(long)]
        name: Option<String>,

        /// Domain tag
        #[arg(long)]
        domain: Option<String>,

        /// Subdomain tag
        #[arg(long)]
        subdomain: Option<String>,

        /// Data product name tag
        #[arg(long)]
        data_product: Option<String>,

        /// Overwrite an existing draft
        #[arg(short, long)]
        force: bool,
    },
    /// Render a draft as a contract document
    Generate {
        /// Draft file to render
        draft: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Edit a draft interactively. Defaults to the configured draft.
    Edit {
        /// Draft file to open (created on first `save` if missing)
        draft: Option<PathBuf>,
    },
    /// Show the configuration file location and effective settings
    Config,
}

/// Run `command`; no command opens the editor on the configured draft.
pub fn run_command(command: Option<Commands>, config: &AppConfig) -> Result<()> {
    match command.unwrap_or(Commands::Edit { draft: None }) {
        Commands::New {
            draft,
            name,
            domain,
            subdomain,
            data_product,
            force,
        } => handle_new(&draft, name, domain, subdomain, data_product, force),
        Commands::Generate { draft, output } => handle_generate(&draft, output),
        Commands::Edit { draft } => {
            handle_edit(draft.unwrap_or_else(|| config.default_draft.clone()))
        }
        Commands::Config => handle_config(config),
    }
}

fn handle_new(
    draft: &Path,
    name: Option<String>,
    domain: Option<String>,
    subdomain: Option<String>,
    data_product: Option<String>,
    force: bool,
) -> Result<()> {
    if draft.exists() && !force {
        anyhow::bail!(
            "Draft {} already exists (use --force to overwrite)",
            draft.display()
        );
    }

    let mut store = FieldStore::new();
    store.set_contract_name(name.unwrap_or_default());
    store.set_domain(domain.unwrap_or_default());
    store.set_subdomain(subdomain.unwrap_or_default());
    store.set_data_product_name(data_product.unwrap_or_default());

    save_draft(&store, draft).context("Failed to create draft")?;
    println!("Created draft {}", draft.display());
    Ok(())
}

fn handle_generate(draft: &Path, output: Option<PathBuf>) -> Result<()> {
    let store = load_draft(draft).context("Failed to load draft")?;
    let document = store.generate();

    if let Some(output) = output {
        std::fs::write(&output, &document)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        tracing::info!(path = %output.display(), "Wrote contract document");
        println!("Wrote {}", output.display());
    } else {
        println!("{document}");
    }
    Ok(())
}

fn handle_edit(draft: PathBuf) -> Result<()> {
    let store = if draft.exists() {
        load_draft(&draft).context("Failed to load draft")?
    } else {
        FieldStore::new()
    };

    let mut session = Session::new(store, Some(draft));
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_shell(&mut session, stdin.lock(), stdout.lock())
}

/// Read commands from `input` until `quit` or end of input.
///
/// Failed commands are reported on `output` and do not end the session.
pub fn run_shell(
    session: &mut Session,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    if let Some(path) = session.draft_path() {
        writeln!(output, "Editing {}. Type `help` for commands.", path.display())?;
    }

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read command")? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match session.execute_line(&line) {
            Ok(Outcome::Continue(text)) => writeln!(output, "{text}")?,
            Ok(Outcome::Quit) => break,
            Err(err) => {
                tracing::warn!(error = %err, command = line.trim(), "Command failed");
                writeln!(output, "error: {err}")?;
            }
        }
    }

    writeln!(output)?;
    Ok(())
}

fn handle_config(config: &AppConfig) -> Result<()> {
    let path = AppConfig::config_path()?;
    println!("Config file: {}", path.display());
    if config.file_logging {
        println!("Log file: {}", logging::get_current_log_path()?.display());
    }
    println!(
        "{}",
        serde_json::to_string_pretty(config).context("Failed to serialize config")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_shell_reports_errors_and_continues() {
        let temp_dir = TempDir::new().unwrap();
        let draft = temp_dir.path().join("orders.json");
        let mut session = Session::new(FieldStore::new(), Some(draft.clone()));
        let input = Cursor::new(
            "add\nset 0 name id\nadd\nset 1 name id\nset 1 name email\nsave\nquit\nadd\n",
        );
        let mut output = Vec::new();

        run_shell(&mut session, input, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(
            output.contains("error: Field name \"id\" for field 1 is already used by field 0")
        );
        assert!(output.contains("Saved draft to"));
        assert_eq!(session.store().len(), 2);

        let reloaded = load_draft(&draft).unwrap();
        let names: Vec<&str> = reloaded.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email"]);
    }

    #[test]
    fn test_generate_writes_document() {
        let temp_dir = TempDir::new().unwrap();
        let draft = temp_dir.path().join("empty.json");
        let output = temp_dir.path().join("contract.yaml");

        handle_new(&draft, None, Some("sales".to_owned()), None, None, false).unwrap();
        handle_generate(&draft, Some(output.clone())).unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "tags:\n  domain: sales\nname: MyDataContract\nfields:"
        );
    }

    #[test]
    fn test_config_reports_log_file_when_enabled() {
        let config = AppConfig {
            file_logging: true,
            ..AppConfig::default()
        };
        assert!(handle_config(&config).is_ok());

        let path = logging::get_current_log_path().unwrap();
        assert!(path.starts_with(logging::get_log_dir().unwrap()));
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let draft = temp_dir.path().join("draft.json");

        handle_new(&draft, None, None, None, None, false).unwrap();
        assert!(handle_new(&draft, None, None, None, None, false).is_err());
        assert!(handle_new(&draft, None, None, None, None, true).is_ok());
    }
}
