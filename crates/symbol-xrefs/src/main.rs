use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tower_lsp::lsp_types::Position;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use symbol_xrefs::{
    MemIndex, ParsedUnit, XrefError, XrefProvider, XrefSettings, config::LogLevel,
    hierarchy::TypeHierarchyDirection,
};

#[derive(Parser, Debug)]
#[command(name = "symbol-xrefs", version, about)]
struct Args {
    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Input {
    /// Parsed translation unit, as JSON.
    #[arg(long)]
    unit: PathBuf,

    /// Index snapshot, as JSON.
    #[arg(long)]
    index: Option<PathBuf>,

    /// Settings file, as TOML.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path of the translation unit; defaults to the unit's main file.
    #[arg(long)]
    tu_path: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct At {
    #[command(flatten)]
    input: Input,

    /// Zero-based line.
    #[arg(long)]
    line: u32,

    /// Zero-based UTF-16 column.
    #[arg(long)]
    character: u32,
}

impl At {
    fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Direction {
    Children,
    Parents,
    Both,
}

impl From<Direction> for TypeHierarchyDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Children => TypeHierarchyDirection::Children,
            Direction::Parents => TypeHierarchyDirection::Parents,
            Direction::Both => TypeHierarchyDirection::Both,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Definition(At),
    Declaration(At),
    TypeDefinition(At),
    Implementations(At),
    References {
        #[command(flatten)]
        at: At,
        #[arg(long)]
        limit: Option<usize>,
    },
    Highlights(At),
    SymbolInfo(At),
    TypeHierarchy {
        #[command(flatten)]
        at: At,
        #[arg(long)]
        levels: Option<usize>,
        #[arg(long, value_enum, default_value_t = Direction::Parents)]
        direction: Direction,
    },
    CallHierarchy(At),
    IncomingCalls(At),
    OutgoingCalls(At),
    DocumentLinks(Input),
}

impl Command {
    fn input(&self) -> &Input {
        match self {
            Command::Definition(at)
            | Command::Declaration(at)
            | Command::TypeDefinition(at)
            | Command::Implementations(at)
            | Command::Highlights(at)
            | Command::SymbolInfo(at)
            | Command::CallHierarchy(at)
            | Command::IncomingCalls(at)
            | Command::OutgoingCalls(at) => &at.input,
            Command::References {
                at, ..
            }
            | Command::TypeHierarchy {
                at, ..
            } => &at.input,
            Command::DocumentLinks(input) => input,
        }
    }
}

fn default_log_path() -> PathBuf {
    dirs_or_tmp().join("symbol-xrefs.log")
}

fn dirs_or_tmp() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        let dir = PathBuf::from(home).join(".symbol-xrefs");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir;
        }
    }
    std::env::temp_dir()
}

fn init_logging(
    args: &Args,
    level: LogLevel,
) -> PathBuf {
    let stderr_filter = if args.verbose {
        EnvFilter::new("symbol_xrefs=debug")
    } else {
        EnvFilter::new("symbol_xrefs=warn")
    };

    let file_filter = if args.verbose {
        EnvFilter::new("symbol_xrefs=debug")
    } else {
        EnvFilter::new(format!("symbol_xrefs={}", level.as_filter()))
    };

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path.file_name().unwrap_or(std::ffi::OsStr::new("symbol-xrefs.log")),
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_filter(file_filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(stderr_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    log_path
}

fn load_unit(path: &Path) -> Result<ParsedUnit, XrefError> {
    let text = std::fs::read_to_string(path)?;
    ParsedUnit::from_json(&text)
}

fn run(
    command: &Command,
    settings: XrefSettings,
) -> Result<Value, XrefError> {
    let input = command.input();
    let unit = load_unit(&input.unit)?;
    let tu_path = match &input.tu_path {
        Some(path) => path.clone(),
        None => unit.file_path(unit.main_file).map(Path::to_path_buf).unwrap_or_else(|| input.unit.clone()),
    };

    let mut provider = XrefProvider::new(settings);
    if let Some(path) = &input.index {
        let index = MemIndex::load(path)?;
        info!("[xrefs] index {} holds {} symbols", path.display(), index.symbol_count());
        provider = provider.with_index(Arc::new(index));
    }

    let value = match command {
        Command::Definition(at) => serde_json::to_value(provider.definition(&unit, &tu_path, at.position()))?,
        Command::Declaration(at) => serde_json::to_value(provider.declaration(&unit, &tu_path, at.position()))?,
        Command::TypeDefinition(at) => serde_json::to_value(provider.type_definition(&unit, &tu_path, at.position()))?,
        Command::Implementations(at) => {
            serde_json::to_value(provider.implementations(&unit, &tu_path, at.position()))?
        },
        Command::References {
            at,
            limit,
        } => serde_json::to_value(provider.references(&unit, &tu_path, at.position(), *limit))?,
        Command::Highlights(at) => {
            serde_json::to_value(provider.document_highlights(&unit, &tu_path, at.position()))?
        },
        Command::SymbolInfo(at) => serde_json::to_value(provider.symbol_info(&unit, &tu_path, at.position()))?,
        Command::TypeHierarchy {
            at,
            levels,
            direction,
        } => serde_json::to_value(provider.type_hierarchy(
            &unit,
            &tu_path,
            at.position(),
            *levels,
            (*direction).into(),
        ))?,
        Command::CallHierarchy(at) => {
            serde_json::to_value(provider.prepare_call_hierarchy(&unit, &tu_path, at.position()))?
        },
        Command::IncomingCalls(at) => {
            let calls: Vec<_> = provider
                .prepare_call_hierarchy(&unit, &tu_path, at.position())
                .iter()
                .flat_map(|item| provider.incoming_calls(item))
                .collect();
            serde_json::to_value(calls)?
        },
        Command::OutgoingCalls(at) => {
            let calls: Vec<_> = provider
                .prepare_call_hierarchy(&unit, &tu_path, at.position())
                .iter()
                .flat_map(|item| provider.outgoing_calls(item))
                .collect();
            serde_json::to_value(calls)?
        },
        Command::DocumentLinks(_) => serde_json::to_value(provider.document_links(&unit))?,
    };
    Ok(value)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = args.command.input().config.as_deref().map(XrefSettings::load).transpose();
    let level = match &settings {
        Ok(Some(settings)) => settings.logging.level,
        _ => LogLevel::default(),
    };
    let log_path = init_logging(&args, level);

    info!("Starting symbol-xrefs v{}", env!("CARGO_PKG_VERSION"));
    info!("Log file: {}", log_path.display());

    let settings = match settings {
        Ok(settings) => settings.unwrap_or_default(),
        Err(err) => {
            error!("Failed to load settings: {err}");
            return ExitCode::FAILURE;
        },
    };

    match run(&args.command, settings) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            },
            Err(err) => {
                error!("Failed to render results: {err}");
                ExitCode::FAILURE
            },
        },
        Err(err) => {
            error!("Query failed: {err}");
            ExitCode::FAILURE
        },
    }
}
