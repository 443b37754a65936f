// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use std::sync::Arc;

use bijux_inspector_core::{ExitCode, ENV_INSPECTOR_LOG_JSON};
use bijux_inspector_model::{
    CategoryFilterInput, DatasetSource, FilterState, HeaderMode, MatchMode, QueryScope, SampleTier,
};
use bijux_inspector_runtime::{
    validate_pipeline_config, Inspector, InspectorBackend, LoadOutcome, MemoryEngine,
    PipelineConfig, ViewState,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bijux-inspector")]
#[command(about = "Profile, filter and merge CSV datasets")]
struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = HeadersCli::Auto)]
    headers: HeadersCli,
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-column statistics over a row sample.
    Profile {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = TierCli::Balanced)]
        tier: TierCli,
        #[arg(long)]
        sample: Option<usize>,
    },
    /// Filters one dataset, or merges several when more than one path is given.
    Query {
        #[arg(long = "path", required = true)]
        paths: Vec<PathBuf>,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, value_enum, default_value_t = ModeCli::Fuzzy)]
        mode: ModeCli,
        #[arg(long)]
        column: Option<usize>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Distinct values of one column with counts.
    Categories {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        column: usize,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        max_rows_scan: Option<usize>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum HeadersCli {
    Yes,
    No,
    Auto,
}

impl From<HeadersCli> for HeaderMode {
    fn from(value: HeadersCli) -> Self {
        match value {
            HeadersCli::Yes => HeaderMode::Yes,
            HeadersCli::No => HeaderMode::No,
            HeadersCli::Auto => HeaderMode::Auto,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TierCli {
    Fast,
    Balanced,
    Full,
}

impl From<TierCli> for SampleTier {
    fn from(value: TierCli) -> Self {
        match value {
            TierCli::Fast => SampleTier::Fast,
            TierCli::Balanced => SampleTier::Balanced,
            TierCli::Full => SampleTier::Full,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeCli {
    Fuzzy,
    Exact,
    Regex,
}

impl From<ModeCli> for MatchMode {
    fn from(value: ModeCli) -> Self {
        match value {
            ModeCli::Fuzzy => MatchMode::Fuzzy,
            ModeCli::Exact => MatchMode::Exact,
            ModeCli::Regex => MatchMode::Regex,
        }
    }
}

#[derive(Debug)]
struct CliError {
    code: ExitCode,
    message: String,
}

impl CliError {
    fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    fn dependency(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::DependencyFailure,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Internal,
            message: message.into(),
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if env_bool(ENV_INSPECTOR_LOG_JSON, false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn path_source(path: &std::path::Path) -> DatasetSource {
    DatasetSource::Path {
        path: path.to_string_lossy().into_owned(),
    }
}

async fn load(
    inspector: &Inspector<MemoryEngine>,
    path: &std::path::Path,
    headers: HeadersCli,
) -> Result<(), CliError> {
    match inspector
        .load_dataset(path_source(path), headers.into(), None)
        .await
    {
        Ok(LoadOutcome::Loaded(id)) => {
            debug!(dataset = %id, path = %path.display(), "loaded");
            Ok(())
        }
        Ok(LoadOutcome::NeedsHeaderDecision { reason }) => Err(CliError::validation(format!(
            "{}: header row is ambiguous ({reason}); pass --headers yes|no",
            path.display()
        ))),
        Err(e) => Err(CliError::dependency(format!("{}: {e}", path.display()))),
    }
}

fn check_column(view: &ViewState, column: Option<usize>) -> Result<(), CliError> {
    match column {
        Some(c) if c >= view.grid.headers.len() => Err(CliError::validation(format!(
            "column {c} out of range (dataset has {} columns)",
            view.grid.headers.len()
        ))),
        _ => Ok(()),
    }
}

fn filter_errors(view: &ViewState) -> Result<(), CliError> {
    let field = [&view.errors.query, &view.errors.numeric, &view.errors.date]
        .into_iter()
        .flatten()
        .next();
    if let Some(message) = field {
        return Err(CliError::validation(message.clone()));
    }
    if let Some(message) = &view.errors.load {
        return Err(CliError::dependency(message.clone()));
    }
    Ok(())
}

async fn run_profile(
    config: PipelineConfig,
    headers: HeadersCli,
    path: PathBuf,
    tier: TierCli,
    sample: Option<usize>,
) -> Result<Value, CliError> {
    let inspector = Inspector::new(Arc::new(MemoryEngine::new()), config);
    load(&inspector, &path, headers).await?;
    let stats = inspector.compute_schema(tier.into(), sample).await;
    let view = inspector.view().await;
    match stats {
        Some(stats) => Ok(json!({
            "path": path.display().to_string(),
            "sampleSize": view.schema.last_key.as_ref().map_or(0, |k| k.sample_size),
            "columns": &*stats,
        })),
        None => Err(CliError::dependency(
            view.errors
                .schema
                .unwrap_or_else(|| "schema unavailable".to_string()),
        )),
    }
}

async fn run_query(
    config: PipelineConfig,
    headers: HeadersCli,
    paths: Vec<PathBuf>,
    filters: FilterState,
    limit: usize,
) -> Result<Value, CliError> {
    let column = filters.target_col_idx;
    let inspector = Inspector::new(Arc::new(MemoryEngine::new()), config);
    inspector.replace_filters(filters).await;
    if paths.len() > 1 {
        inspector.set_scope(QueryScope::All).await;
    }
    for path in &paths {
        load(&inspector, path, headers).await?;
    }
    let view = inspector.view().await;
    check_column(&view, column)?;
    filter_errors(&view)?;

    let rows: Vec<Vec<String>> = if view.cross.merged {
        view.cross.merged_rows.iter().take(limit).cloned().collect()
    } else {
        let end = view.grid.total_filtered.min(limit);
        inspector
            .backend()
            .get_row_slice(0, end, None)
            .await
            .map_err(|e| CliError::dependency(e.to_string()))?
    };
    Ok(json!({
        "headers": view.grid.headers,
        "total": view.grid.total_rows,
        "filtered": view.grid.total_filtered,
        "merged": view.cross.merged,
        "datasets": view.cross.results,
        "rows": rows,
    }))
}

async fn run_categories(
    config: PipelineConfig,
    headers: HeadersCli,
    path: PathBuf,
    column: usize,
    search: Option<String>,
    max_rows_scan: Option<usize>,
) -> Result<Value, CliError> {
    let inspector = Inspector::new(Arc::new(MemoryEngine::new()), config);
    load(&inspector, &path, headers).await?;
    check_column(&inspector.view().await, Some(column))?;
    inspector
        .replace_filters(FilterState {
            max_rows_scan_text: max_rows_scan.map(|n| n.to_string()).unwrap_or_default(),
            category: CategoryFilterInput {
                col_idx: Some(column),
                ..CategoryFilterInput::default()
            },
            ..FilterState::default()
        })
        .await;
    inspector
        .search_categories_now(search.as_deref().unwrap_or(""))
        .await;
    let view = inspector.view().await;
    if let Some(message) = view.errors.category {
        return Err(CliError::dependency(message));
    }
    Ok(json!({
        "column": column,
        "name": view.grid.headers.get(column),
        "distinctTotal": view.category.distinct_total,
        "rowsScanned": view.category.rows_scanned,
        "totalRowsInView": view.category.total_rows_in_view,
        "partial": view.category.partial,
        "values": view.category.items,
    }))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = PipelineConfig::from_env();
    validate_pipeline_config(&config).map_err(CliError::validation)?;
    let headers = cli.headers;
    let out = match cli.command {
        Commands::Profile { path, tier, sample } => {
            run_profile(config, headers, path, tier, sample).await?
        }
        Commands::Query {
            paths,
            query,
            mode,
            column,
            limit,
        } => {
            let filters = FilterState {
                query,
                match_mode: mode.into(),
                target_col_idx: column,
                ..FilterState::default()
            };
            run_query(config, headers, paths, filters, limit).await?
        }
        Commands::Categories {
            path,
            column,
            search,
            max_rows_scan,
        } => run_categories(config, headers, path, column, search, max_rows_scan).await?,
    };
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&out)
    } else {
        serde_json::to_string(&out)
    }
    .map_err(|e| CliError::internal(format!("encode output failed: {e}")))?;
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> ProcessExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            eprintln!("{}", err.message);
            ProcessExitCode::from(err.code as u8)
        }
    }
}
