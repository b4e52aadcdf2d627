//! Command-line client for a running binder server.
//!
//! `list` reconciles the catalogue with stored statuses locally, `toggle`
//! writes through a [`BinderSession`], and `sync`, `verify`, and `ping`
//! forward to the maintenance endpoints.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use binder::domain::ports::{
    CollectionAdmin as _, CollectionQuery as _, PingReport, SyncReport, VerifyReport,
};
use binder::domain::{
    BinderEntry, BinderSession, BinderSummary, BinderView, CardKey, StatusPatch, StatusSource,
    VariantFilter,
};
use binder::outbound::http_client::{BinderHttpClient, DEFAULT_CLIENT_TIMEOUT};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use reqwest::Url;
use tokio::runtime::Builder;

/// `binder-cli` arguments.
#[derive(Debug, Parser)]
#[command(
    name = "binder-cli",
    about = "Inspect and update a card collection through the binder API",
    version
)]
struct CliArgs {
    /// Base URL of the binder server.
    #[arg(
        long,
        env = "BINDER_SERVER_URL",
        default_value = "http://localhost:8080",
        value_name = "url"
    )]
    server: Url,
    /// Request timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "secs")]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the reconciled binder.
    List {
        /// Case-insensitive substring over name and number.
        #[arg(long, value_name = "query")]
        filter: Option<String>,
        /// Include variant and overnumbered printings.
        #[arg(long)]
        all: bool,
        /// Characters marking alternate-art numbers, as configured on the server.
        #[arg(long = "variant-glyphs", env = "BINDER_VARIANT_GLYPHS", value_name = "glyphs")]
        variant_glyphs: Option<String>,
        /// Comma-separated `PREFIX=COUNT` printed totals, as configured on the server.
        #[arg(long = "set-limits", env = "BINDER_SET_LIMITS", value_name = "limits")]
        set_limits: Option<String>,
    },
    /// Set one or more flags on a card.
    Toggle {
        /// Card name.
        name: String,
        /// Printed number; omit to write the name-level status.
        #[arg(long, value_name = "number")]
        number: Option<String>,
        /// New `owned` value.
        #[arg(long, value_name = "bool")]
        owned: Option<bool>,
        /// New `duplicate` value.
        #[arg(long, value_name = "bool")]
        duplicate: Option<bool>,
        /// New `foil` value.
        #[arg(long, value_name = "bool")]
        foil: Option<bool>,
    },
    /// Insert default rows for catalogue printings missing from the store.
    Sync,
    /// Compare the catalogue with the store.
    Verify,
    /// Check store connectivity.
    Ping,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build CLI runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let timeout = args
        .timeout_secs
        .map_or(DEFAULT_CLIENT_TIMEOUT, Duration::from_secs);
    let client = BinderHttpClient::new(args.server, timeout)
        .wrap_err("failed to build HTTP client")?;
    let mut stdout = io::stdout().lock();

    match args.command {
        Command::List {
            filter,
            all,
            variant_glyphs,
            set_limits,
        } => {
            let variants = default_view_filter(variant_glyphs.as_deref(), set_limits.as_deref())?;
            let (catalogue, statuses) = tokio::join!(client.fetch_catalogue(), client.status_map());
            let catalogue = catalogue.wrap_err("failed to fetch catalogue")?;
            let statuses = statuses.wrap_err("failed to fetch statuses")?;
            let view = BinderView::reconcile(&catalogue.references, &statuses);
            let view = if all {
                view
            } else {
                view.without_variants(&variants)
            };
            let entries: Vec<&BinderEntry> = view.filter(filter.as_deref().unwrap_or("")).collect();
            write_entries(&mut stdout, &entries)?;
            write_summary(&mut stdout, &BinderSummary::from_entries(entries.iter().copied()))?;
        }
        Command::Toggle {
            name,
            number,
            owned,
            duplicate,
            foil,
        } => {
            let patch = StatusPatch {
                owned,
                duplicate,
                foil,
            };
            if patch.is_empty() {
                return Err(eyre!("nothing to change: pass --owned, --duplicate, or --foil"));
            }
            let key = CardKey::new(&name, number.as_deref())?;
            let (catalogue, statuses) = tokio::join!(client.fetch_catalogue(), client.status_map());
            let catalogue = catalogue.wrap_err("failed to fetch catalogue")?;
            let statuses = statuses.wrap_err("failed to fetch statuses")?;
            let session = BinderSession::new(Arc::new(client), &catalogue.references, &statuses);
            let stored = session
                .toggle(key, patch)
                .await
                .wrap_err("status update failed")?;
            writeln!(
                stdout,
                "{} {}",
                flags_marker(stored.flags.owned, stored.flags.duplicate, stored.flags.foil),
                stored.key.encode()
            )?;
            write_summary(&mut stdout, &session.summary())?;
        }
        Command::Sync => write_sync(&mut stdout, &client.sync().await?)?,
        Command::Verify => write_verify(&mut stdout, &client.verify().await?)?,
        Command::Ping => write_ping(&mut stdout, &client.ping().await?)?,
    }
    Ok(())
}

fn default_view_filter(glyphs: Option<&str>, set_limits: Option<&str>) -> Result<VariantFilter> {
    VariantFilter::from_config(glyphs, set_limits).wrap_err("invalid variant filter settings")
}

fn flags_marker(owned: bool, duplicate: bool, foil: bool) -> String {
    let flag = |set: bool, glyph: char| if set { glyph } else { '.' };
    [flag(owned, 'O'), flag(duplicate, 'D'), flag(foil, 'F')]
        .into_iter()
        .collect()
}

const fn source_marker(source: StatusSource) -> &'static str {
    match source {
        StatusSource::Name => " (name)",
        StatusSource::Exact | StatusSource::Default => "",
    }
}

fn write_entries(out: &mut impl Write, entries: &[&BinderEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(
            out,
            "{} {:<12} {}{}",
            flags_marker(entry.flags.owned, entry.flags.duplicate, entry.flags.foil),
            entry.reference.number().unwrap_or("-"),
            entry.reference.name(),
            source_marker(entry.source)
        )?;
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &BinderSummary) -> io::Result<()> {
    writeln!(
        out,
        "total {} | unique {} | owned {} | duplicate {} | foil {}",
        summary.total, summary.unique, summary.owned, summary.duplicate, summary.foil
    )
}

fn write_sync(out: &mut impl Write, report: &SyncReport) -> io::Result<()> {
    writeln!(
        out,
        "catalogue {} | inserted {} | rows {}",
        report.catalogue_count, report.upserted, report.total
    )
}

fn write_verify(out: &mut impl Write, report: &VerifyReport) -> io::Result<()> {
    writeln!(
        out,
        "catalogue {} | rows {} | missing {} | orphans {}",
        report.catalogue_count, report.store_count, report.missing_count, report.orphan_count
    )?;
    for key in &report.missing {
        writeln!(out, "missing: {key}")?;
    }
    if !report.schema_checked {
        writeln!(out, "schema: not checked")?;
    } else if report.missing_columns.is_empty() {
        writeln!(out, "schema: ok")?;
    } else {
        writeln!(out, "schema: missing {}", report.missing_columns.join(", "))?;
    }
    Ok(())
}

fn write_ping(out: &mut impl Write, report: &PingReport) -> io::Result<()> {
    let state = if report.ok { "ok" } else { "unreachable" };
    writeln!(out, "store {state} | rows {}", report.rows)
}
