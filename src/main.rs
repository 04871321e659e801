use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use inquire::{Confirm, Editor, Text};
use tracing_subscriber::EnvFilter;

use invoice_sheet::ResolvedInvoice;
use invoice_sheet::render;
use invoice_sheet::session::{EditOutcome, EditSession};
use invoice_sheet::settings::{self, AppSettings};
use invoice_sheet::store::FileStore;

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "invoice-sheet", version, about = "Render an invoice from an editable JSON configuration")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved invoice
    Show,
    /// Write the invoice as an HTML document
    Render {
        /// Output file (defaults to <data root>/output/invoice-<n>-<company>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Open the document after writing it
        #[arg(long)]
        open: bool,
    },
    /// Edit the configuration in $EDITOR
    Edit,
    /// Replace the configuration with the contents of a file
    Import { path: PathBuf },
    /// Print the raw configuration text
    Dump,
    /// Restore the sample configuration
    Reset,
    /// Configure data directory
    Config,
}

// ==========================================
// Main Function
// ==========================================

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help().ok();
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    let settings = settings::load_settings()
        .context("failed to load settings")?
        .unwrap_or_default();
    let root = settings.root();

    match command {
        Commands::Show => {
            print_invoice(&open_session(&root).invoice());
        }
        Commands::Render { output, open } => {
            let invoice = open_session(&root).invoice();
            let path = output
                .unwrap_or_else(|| root.join("output").join(render::output_file_name(&invoice)));
            write_document(&root, &invoice, &path)?;
            if open {
                open_file(&path);
            }
        }
        Commands::Edit => {
            edit_loop(&mut open_session(&root))?;
        }
        Commands::Import { path } => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let mut session = open_session(&root);
            session.subscribe(print_invoice);
            match session.apply_edit(raw)? {
                EditOutcome::Accepted(_) => println!("✅ Imported {}", path.display()),
                EditOutcome::Rejected { reason } => {
                    anyhow::bail!("{} is not a valid configuration: {reason}", path.display())
                }
            }
        }
        Commands::Dump => {
            println!("{}", open_session(&root).raw());
        }
        Commands::Reset => {
            let confirmed = Confirm::new("Replace the current configuration with the sample invoice?")
                .with_default(false)
                .prompt()?;
            if confirmed {
                let invoice = open_session(&root).reset()?;
                print_invoice(&invoice);
                println!("✅ Configuration reset.");
            } else {
                println!("Operation cancelled.");
            }
        }
        Commands::Config => {
            setup_config_wizard(&settings)?;
        }
    }
    Ok(())
}

fn open_session(root: &Path) -> EditSession<FileStore> {
    EditSession::open(FileStore::new(root.join("data")))
}

// ==========================================
// Editing
// ==========================================

fn edit_loop(session: &mut EditSession<FileStore>) -> Result<()> {
    session.subscribe(print_invoice);

    loop {
        let raw = Editor::new("Invoice configuration (JSON):")
            .with_predefined_text(session.raw())
            .with_file_extension(".json")
            .prompt()?;

        match session.apply_edit(raw)? {
            EditOutcome::Accepted(_) => {
                println!("✅ Configuration saved.");
                return Ok(());
            }
            EditOutcome::Rejected { reason } => {
                println!("❌ Not valid JSON: {reason}");
                let again = Confirm::new("Edit again?").with_default(true).prompt()?;
                if !again {
                    println!("Previous configuration kept.");
                    return Ok(());
                }
            }
        }
    }
}

// ==========================================
// Output
// ==========================================

fn print_invoice(invoice: &ResolvedInvoice) {
    println!("\n--- {} ---", invoice.document_title());
    println!("From:   {}", invoice.issuer.name);
    if let Some(client) = invoice.billed_to.first() {
        println!("To:     {client}");
    }
    if let Some(date) = invoice.issue_date_label() {
        println!("Date:   {date}");
    }
    if let Some(due) = invoice.due_date_label() {
        println!("Due:    {due}");
    }
    println!("{}", render::render_table(invoice));
}

fn write_document(root: &Path, invoice: &ResolvedInvoice, path: &Path) -> Result<()> {
    let template_dir = root.join("templates");
    render::ensure_template(&template_dir)?;
    let tera = render::load_templates(&template_dir)?;
    let html = render::render_html(&tera, invoice)?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    println!("✅ Invoice written: {}", path.display());
    Ok(())
}

fn open_file(path: &Path) {
    #[cfg(target_os = "macos")]
    Command::new("open").arg(path).spawn().ok();

    #[cfg(target_os = "windows")]
    Command::new("explorer").arg(path).spawn().ok();

    #[cfg(target_os = "linux")]
    Command::new("xdg-open").arg(path).spawn().ok();
}

// ==========================================
// Settings
// ==========================================

fn setup_config_wizard(current: &AppSettings) -> Result<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let data_root = Text::new("Data directory:")
        .with_default(&current.data_root)
        .prompt()?;

    let settings = AppSettings { data_root };
    let path = settings::save_settings(&settings)?;
    println!("✅ Settings saved to {}", path.display());
    Ok(settings)
}
