//! polocalize - gettext catalog maintenance
//!
//! Command-line entry point.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use polocalize::catalog::{entry_id, locale_info, split_entry_id, CatalogSet};
use polocalize::storage::{get_config_path, load_config, read_config, save_config, AppConfig};
use polocalize::sync::{project_dir, CatalogCompiler, Extractor, SynchronizationEngine};
use polocalize::translate::{
    BatchReport, CancellationToken, OpenAiOracle, TranslationEvent, TranslationOrchestrator,
};

/// Maintain gettext catalogs and fill missing translations.
#[derive(Parser, Debug)]
#[command(name = "polocalize", version)]
struct Cli {
    /// Locales directory holding `<code>/LC_MESSAGES/<domain>.po`.
    #[arg(long, value_name = "DIR", default_value = "locales", global = true)]
    locales: PathBuf,
    /// Config file (defaults to the user config directory).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the template and create catalogs for new locales.
    Init {
        /// Locale codes, e.g. `en fr de_AT`.
        #[arg(required = true, value_name = "LOCALE")]
        locales: Vec<String>,
    },
    /// Show per-locale entry counts and consistency.
    Status,
    /// Show the value of a key in every locale.
    Show {
        key: String,
        /// Message context (`msgctxt`) of the key.
        #[arg(long)]
        context: Option<String>,
    },
    /// Set the value of a key in one locale.
    Set {
        locale: String,
        key: String,
        value: String,
        /// Message context (`msgctxt`) of the key.
        #[arg(long)]
        context: Option<String>,
    },
    /// Rename a key in every locale.
    Rename {
        old: String,
        new: String,
        /// Message context (`msgctxt`) of the key, kept by the rename.
        #[arg(long)]
        context: Option<String>,
    },
    /// Re-extract keys and merge them into every catalog.
    Sync {
        /// Keep obsolete entries instead of purging them.
        #[arg(long)]
        keep_obsolete: bool,
    },
    /// Fill missing values through the translation service.
    Translate {
        /// Keys to translate; all keys when omitted.
        #[arg(value_name = "KEY")]
        keys: Vec<String>,
    },
    /// Save pending edits and compile catalogs.
    Compile,
    /// Print the effective configuration.
    Config {
        /// Write the config file with every setting spelled out.
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!("polocalize v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Init { locales } => init(&config, &cli.locales, &locales),
        Commands::Status => status(&open(&config, &cli.locales)?),
        Commands::Show { key, context } => show(
            &open(&config, &cli.locales)?,
            &entry_id(context.as_deref(), &key),
        ),
        Commands::Set {
            locale,
            key,
            value,
            context,
        } => {
            let key = entry_id(context.as_deref(), &key);
            let mut set = open(&config, &cli.locales)?;
            let file = set
                .file_mut(&locale)
                .ok_or_else(|| anyhow!("Unknown locale {:?}", locale))?;
            if !file.contains(&key) {
                bail!("Unknown key {} in {}", display_key(&key), locale);
            }
            if file.set(&key, &value) {
                save(&mut set)?;
            } else {
                println!("Unchanged");
            }
            Ok(())
        }
        Commands::Rename { old, new, context } => {
            let old = entry_id(context.as_deref(), &old);
            let new = entry_id(context.as_deref(), new.trim());
            let mut set = open(&config, &cli.locales)?;
            set.rename_key(&old, &new)
                .with_context(|| format!("Cannot rename {}", display_key(&old)))?;
            save(&mut set)?;
            println!("Renamed {} to {}", display_key(&old), display_key(&new));
            Ok(())
        }
        Commands::Sync { keep_obsolete } => {
            let mut set = open(&config, &cli.locales)?;
            sync(&config, &mut set, keep_obsolete)
        }
        Commands::Translate { keys } => {
            let mut set = open(&config, &cli.locales)?;
            translate(&config, &mut set, keys).await
        }
        Commands::Compile => {
            let mut set = open(&config, &cli.locales)?;
            save(&mut set)?;
            config
                .tools
                .pybabel()
                .compile(&project_dir(set.root()), set.root(), &set.layout().domain)
                .context("Compilation failed")?;
            println!("Compiled {} catalog(s)", set.locales().len());
            Ok(())
        }
        Commands::Config { write } => show_config(&config, cli.config.as_deref(), write),
    }
}

/// Readable form of an entry id: `msgid`, or `[context] msgid`.
fn display_key(id: &str) -> String {
    match split_entry_id(id) {
        (Some(context), key) => format!("[{}] {:?}", context, key),
        (None, key) => format!("{:?}", key),
    }
}

fn show_config(config: &AppConfig, path: Option<&Path>, write: bool) -> Result<()> {
    if write {
        // Environment overrides, the API key included, stay out of the file.
        let file_config = read_config(path).context("Failed to read configuration")?;
        save_config(&file_config, path).context("Failed to write configuration")?;
        let shown = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);
        println!("Wrote {}", shown.display());
        return Ok(());
    }

    let mut shown = config.clone();
    if shown.oracle.api_key.is_some() {
        shown.oracle.api_key = Some("<set>".to_string());
    }
    print!(
        "{}",
        toml::to_string_pretty(&shown).context("Failed to render configuration")?
    );
    Ok(())
}

fn open(config: &AppConfig, root: &Path) -> Result<CatalogSet> {
    CatalogSet::discover_with(root, config.catalog.layout())
        .with_context(|| format!("Failed to open catalogs in {}", root.display()))
}

fn save(set: &mut CatalogSet) -> Result<()> {
    let report = set.save_all();
    for locale in &report.saved {
        tracing::info!("Saved {}", locale);
    }
    if let Some((locale, err)) = report.failed.first() {
        bail!(
            "{} catalog(s) could not be saved ({}: {})",
            report.failed.len(),
            locale,
            err
        );
    }
    Ok(())
}

fn init(config: &AppConfig, root: &Path, locales: &[String]) -> Result<()> {
    let layout = config.catalog.layout();
    let template = config
        .tools
        .pybabel()
        .extract(&project_dir(root), &layout.template_path(root))
        .context("Key extraction failed")?;

    let set = CatalogSet::initialize(root, layout, locales, template.document())
        .context("Failed to create catalogs")?;
    println!(
        "{} key(s), locales: {}",
        set.keys().len(),
        set.locales().join(", ")
    );
    Ok(())
}

fn status(set: &CatalogSet) -> Result<()> {
    let reference = set.reference_locale();
    println!(
        "{} key(s), reference {}",
        set.keys().len(),
        set.language_display_name(reference, reference)
    );

    for locale in set.locales() {
        let Some(file) = set.file(locale) else {
            continue;
        };
        let info = locale_info(locale, reference);
        let region = if info.region.is_empty() {
            String::new()
        } else {
            format!(", {}", info.region)
        };
        println!(
            "  {:<8} {:<28} {:>5} entries {:>5} untranslated{}{}",
            locale,
            info.language,
            file.len(),
            file.untranslated().len(),
            region,
            if file.is_dirty() { " (unsaved)" } else { "" }
        );
    }

    let inconsistent = set.inconsistent_locales();
    if !inconsistent.is_empty() {
        println!("Out of sync with {}: {}", reference, inconsistent.join(", "));
    }
    Ok(())
}

fn show(set: &CatalogSet, key: &str) -> Result<()> {
    if !set.has_key(key) {
        bail!("Unknown key {}", display_key(key));
    }
    let reference = set.reference_locale();
    for locale in set.locales() {
        let value = set.file(locale).and_then(|f| f.get(key)).unwrap_or("");
        let shown = if value.trim().is_empty() {
            "<missing>".to_string()
        } else {
            format!("{:?}", value)
        };
        println!("{}: {}", set.language_display_name(locale, reference), shown);
    }
    Ok(())
}

fn sync(config: &AppConfig, set: &mut CatalogSet, keep_obsolete: bool) -> Result<()> {
    let engine = SynchronizationEngine::new(config.tools.pybabel())
        .with_purge(config.catalog.purge_obsolete && !keep_obsolete);
    let report = engine.synchronize(set).context("Synchronization failed")?;

    for merge in &report.merged {
        println!(
            "  {}: +{} new, {} obsolete, {} revived",
            merge.locale, merge.added, merge.obsoleted, merge.revived
        );
    }
    if report.purged > 0 {
        println!("Purged {} obsolete entries", report.purged);
    }
    for err in report.merge_errors.iter().chain(report.purge_errors.iter()) {
        eprintln!("  {}", err);
    }
    if report.purge_skipped {
        eprintln!("Obsolete entries kept because a merge failed");
    }

    if !report.is_clean() {
        bail!(
            "Catalogs out of sync after merge: {}",
            report.inconsistent.join(", ")
        );
    }
    println!("{} key(s) in {} locale(s)", report.template_keys, set.locales().len());
    Ok(())
}

async fn translate(config: &AppConfig, set: &mut CatalogSet, keys: Vec<String>) -> Result<()> {
    if let Some(unknown) = keys.iter().find(|k| !set.has_key(k)) {
        bail!("Unknown key {}", display_key(unknown));
    }

    let oracle =
        OpenAiOracle::new(&config.oracle).context("Failed to set up the translation client")?;
    tracing::info!("Translating with {}", oracle.model());
    let orchestrator = TranslationOrchestrator::new(oracle, config.translate.clone());
    let cancel = CancellationToken::new();

    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Interrupted, stopping after the current key");
                cancel.cancel();
            }
        })
    };

    let mut events = orchestrator.subscribe();
    let progress = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(TranslationEvent::KeyTranslated { key, filled, .. }) => {
                    println!("  {}: {}", display_key(&key), filled.join(", "));
                }
                Ok(TranslationEvent::KeyFailed { key, error, .. }) => {
                    eprintln!("  {}: {}", display_key(&key), error);
                }
                Ok(TranslationEvent::Progress { processed, total }) => {
                    tracing::debug!("{}/{}", processed, total);
                }
                Ok(TranslationEvent::Finished { .. }) | Err(RecvError::Closed) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Progress output skipped {} events", skipped);
                }
            }
        }
    });

    let report = if keys.is_empty() {
        orchestrator.translate_all(set, &cancel).await
    } else {
        orchestrator.translate_keys(set, &keys, &cancel).await
    };
    interrupt.abort();
    let _ = progress.await;

    // Completed work is kept even after a cancellation or failures.
    save(set)?;
    summarize(&report);
    if !report.failures.is_empty() {
        bail!("{} key(s) could not be translated", report.failures.len());
    }
    Ok(())
}

fn summarize(report: &BatchReport) {
    println!(
        "{}/{} keys: {} translated, {} partial, {} unanswered, {} failed, {} already complete",
        report.processed,
        report.total,
        report.translated.len(),
        report.partial.len(),
        report.untranslated.len(),
        report.failures.len(),
        report.skipped
    );
    if report.cancelled {
        println!("Cancelled before finishing");
    }
}
