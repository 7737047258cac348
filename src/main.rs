//! Command-line front end: render a page in a language, list languages.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use page_lingo::config::{
    ConfigManager,
    SwitcherSettings,
};
use page_lingo::dictionary::{
    self,
    DictionaryStore,
};
use page_lingo::dom::html;
use page_lingo::storage::MemoryStorage;
use page_lingo::switcher::resolve_allowed;
use page_lingo::{
    LingoError,
    Result,
    Switcher,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PAGE_LINGO_LOG";

/// コマンドライン引数
#[derive(Parser)]
#[command(name = "page-lingo")]
#[command(version)]
#[command(about = "Swap page text between language variants using static dictionaries")]
struct Cli {
    /// サブコマンド
    #[command(subcommand)]
    command: Commands,
}

/// サブコマンド一覧
#[derive(Subcommand)]
enum Commands {
    /// Render an HTML page in the given language
    Translate {
        /// HTML file to translate
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Target language code
        #[arg(short, long)]
        lang: String,

        /// Project root holding `.page-lingo.json` and dictionary files
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the language codes a page can be switched to
    Languages {
        /// Project root holding `.page-lingo.json` and dictionary files
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },
}

/// エントリーポイント
fn main() -> ExitCode {
    let _guard = init_logging();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// stderr logging through a non-blocking writer; the guard flushes on drop.
fn init_logging() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_target(false))
        .init();
    guard
}

/// サブコマンドを実行
fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Translate { input, lang, root, output } => {
            translate(&input, &lang, &root, output.as_deref())
        }
        Commands::Languages { root } => languages(&root),
    }
}

/// Settings and dictionaries of a project root.
fn load_project(root: &Path) -> Result<(SwitcherSettings, DictionaryStore)> {
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(root.to_path_buf()))?;
    let settings = manager.get_settings().clone();

    let loaded = dictionary::load_from_directory(root, &settings.translation_files)?;
    tracing::debug!(languages = loaded.len(), "Loaded project dictionaries");
    Ok((settings, DictionaryStore::builtin().merged(loaded)))
}

/// HTML ファイルを指定言語で描画して書き出す
fn translate(input: &Path, lang: &str, root: &Path, output: Option<&Path>) -> Result<()> {
    let (settings, dictionaries) = load_project(root)?;
    if !resolve_allowed(&dictionaries, settings.available.as_deref()).iter().any(|code| code == lang)
    {
        return Err(LingoError::UnknownLanguage(lang.to_string()));
    }

    let source = std::fs::read_to_string(input)
        .map_err(|source| LingoError::Io { path: input.to_path_buf(), source })?;
    let mut doc = html::parse(&source)?;

    let storage = MemoryStorage::with_value(&settings.storage_key, lang);
    let switcher = Switcher::init(&mut doc, dictionaries, storage, settings);
    tracing::info!(lang = switcher.current(), input = %input.display(), "Translated page");

    let rendered = html::serialize(&doc);
    match output {
        Some(path) => std::fs::write(path, rendered)
            .map_err(|source| LingoError::Io { path: path.to_path_buf(), source }),
        None => write_stdout(&rendered),
    }
}

/// 切り替え可能な言語コードを一行ずつ出力
fn languages(root: &Path) -> Result<()> {
    let (settings, dictionaries) = load_project(root)?;
    let allowed = resolve_allowed(&dictionaries, settings.available.as_deref());
    let mut listing = allowed.join("\n");
    listing.push('\n');
    write_stdout(&listing)
}

/// 標準出力へ書き出す
fn write_stdout(content: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|source| LingoError::Io { path: PathBuf::from("<stdout>"), source })
}
