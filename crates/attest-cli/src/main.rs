//! attest - product test report workbench
//!
//! Records product test entries from batch files and renders them into
//! PDF and CSV report artifacts. Settings, credentials and the session
//! live in a local SQLite database; entries are scoped to one export
//! run.

use anyhow::{bail, Context, Result};
use attest_config::{load_batch, FontFamily, TableTheme, UiTheme};
use attest_core::{Authenticator, EntryStore};
use attest_report::{render_csv, render_pdf, ThreadRandom};
use attest_store::{SqliteStore, Store};
use attest_util::UserId;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// attest - product test report workbench
#[derive(Parser, Debug)]
#[command(name = "attest")]
#[command(about = "Product test report workbench", long_about = None)]
struct Args {
    /// Data directory override (or set ATTEST_DATA_DIR env var)
    #[arg(short, long, env = "ATTEST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and record the session
    SignIn {
        user: String,
        #[arg(long)]
        password: String,
    },

    /// Register a new credential
    SignUp {
        user: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },

    /// Reset a credential back to the default password
    ResetPassword { user: String },

    /// Clear the current session
    SignOut,

    /// Show or change report settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Render report artifacts from an entry batch file
    Export {
        /// TOML batch file with the entries to report on
        batch: PathBuf,

        /// Render the PDF report
        #[arg(long)]
        pdf: bool,

        /// Render the CSV export
        #[arg(long)]
        csv: bool,

        /// Output directory for the artifacts
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the current settings
    Show,

    /// Change settings fields; unset fields keep their value
    Set {
        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        tester: Option<String>,

        /// Report number prefix, e.g. "RPT"
        #[arg(long)]
        prefix: Option<String>,

        /// striped, grid or plain
        #[arg(long)]
        table_theme: Option<TableTheme>,

        /// helvetica, times or courier
        #[arg(long)]
        font: Option<FontFamily>,

        /// light or dark
        #[arg(long)]
        ui_theme: Option<UiTheme>,

        /// Report issue date, YYYY-MM-DD
        #[arg(long)]
        report_date: Option<NaiveDate>,

        /// Logo image file to embed in the report header
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Remove the configured logo
        #[arg(long)]
        clear_logo: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(attest_util::default_data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = data_dir.join("attest.db");
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );
    info!(db_path = %db_path.display(), "Store opened");

    let auth = Authenticator::new(store.clone());

    match args.command {
        Commands::SignIn { user, password } => {
            let user = UserId::new(user);
            auth.sign_in(&user, &password)?;
            println!("Signed in as {}", user);
        }

        Commands::SignUp {
            user,
            password,
            confirm,
        } => {
            let user = UserId::new(user);
            auth.sign_up(&user, &password, &confirm)?;
            println!("Registered {}", user);
        }

        Commands::ResetPassword { user } => {
            let user = UserId::new(user);
            auth.reset_password(&user)?;
            println!("Password for {} reset to the default", user);
        }

        Commands::SignOut => {
            auth.sign_out()?;
            println!("Signed out");
        }

        Commands::Settings { action } => handle_settings(store.as_ref(), action)?,

        Commands::Export {
            batch,
            pdf,
            csv,
            out_dir,
        } => handle_export(store.as_ref(), &auth, &batch, pdf, csv, &out_dir)?,
    }

    Ok(())
}

fn handle_settings(store: &dyn Store, action: SettingsAction) -> Result<()> {
    let mut settings = store.load_settings()?.unwrap_or_default();

    match action {
        SettingsAction::Show => {
            println!("company:      {}", settings.company_name);
            println!("tester:       {}", settings.tester_name);
            println!("prefix:       {}", settings.report_prefix);
            println!("table theme:  {}", settings.table_theme);
            println!("font:         {}", settings.primary_font);
            println!("ui theme:     {}", settings.ui_theme);
            println!("report date:  {}", settings.report_date);
            println!(
                "logo:         {}",
                if settings.logo_data.is_some() {
                    "configured"
                } else {
                    "none"
                }
            );
        }

        SettingsAction::Set {
            company,
            tester,
            prefix,
            table_theme,
            font,
            ui_theme,
            report_date,
            logo,
            clear_logo,
        } => {
            if let Some(company) = company {
                settings.company_name = company;
            }
            if let Some(tester) = tester {
                settings.tester_name = tester;
            }
            if let Some(prefix) = prefix {
                settings.report_prefix = prefix;
            }
            if let Some(theme) = table_theme {
                settings.table_theme = theme;
            }
            if let Some(font) = font {
                settings.primary_font = font;
            }
            if let Some(theme) = ui_theme {
                settings.ui_theme = theme;
            }
            if let Some(date) = report_date {
                settings.report_date = date;
            }
            if clear_logo {
                settings.logo_data = None;
            } else if let Some(path) = logo {
                settings.logo_data = Some(logo_data_uri(&path)?);
            }

            // The record is replaced wholesale; the field merge above is
            // a CLI convenience, not a storage-layer feature.
            store.save_settings(&settings)?;
            println!("Settings saved");
        }
    }

    Ok(())
}

fn logo_data_uri(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read logo file {:?}", path))?;

    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "image/png",
    };

    Ok(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
}

fn handle_export(
    store: &dyn Store,
    auth: &Authenticator,
    batch: &Path,
    pdf: bool,
    csv: bool,
    out_dir: &Path,
) -> Result<()> {
    let Some(user) = auth.current_user()? else {
        bail!("Not signed in; run `attest sign-in` first");
    };
    info!(user_id = %user, "Export requested");

    let settings = store.load_settings()?.unwrap_or_default();

    let drafts =
        load_batch(batch).with_context(|| format!("Failed to load batch file {:?}", batch))?;
    if drafts.is_empty() {
        bail!("No entries to export");
    }

    let mut entries = EntryStore::new();
    for draft in drafts {
        entries.append(draft);
    }

    // Neither flag means both artifacts.
    let (pdf, csv) = if !pdf && !csv { (true, true) } else { (pdf, csv) };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    if pdf {
        let report = render_pdf(entries.list(), &settings, &mut ThreadRandom)?;
        let path = out_dir.join(&report.file_name);
        std::fs::write(&path, &report.bytes)
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!("Wrote {} ({} pages)", path.display(), report.pages);
    }

    if csv {
        let export = render_csv(entries.list(), &settings, attest_util::today())?;
        let path = out_dir.join(&export.file_name);
        std::fs::write(&path, &export.content)
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
