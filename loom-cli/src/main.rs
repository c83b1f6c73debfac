//! Loom CLI - the Loom front-end command line interface.
//! Loom CLI - Loom 前端的命令行界面。

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use loom_common::Limits;
use tracing_subscriber::EnvFilter;

use commands::Input;

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "loom")]
#[command(author, version, about = "Loom - tokenizer and parser for Loom components", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output. / 抑制输出。
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Stored diagnostics before the rest are summarised. / 诊断信息上限。
    #[arg(long, global = true, value_name = "N")]
    max_diagnostics: Option<usize>,

    /// Iteration cap for every parser loop. / 每个解析循环的迭代上限。
    #[arg(long, global = true, value_name = "N")]
    max_iterations: Option<usize>,

    /// Deepest nesting of expressions, blocks, elements and types. / 最大嵌套深度。
    #[arg(long = "max-depth", global = true, value_name = "N")]
    max_depth: Option<usize>,
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Parse a file and report problems. / 解析文件并报告问题。
    Check {
        /// The file to check. / 要检查的文件。
        file: String,
    },

    /// Print the token stream, one token per line. / 打印 token 流。
    Tokens {
        /// The file to tokenize. / 要进行词法分析的文件。
        file: String,

        /// Include comments. / 包含注释。
        #[arg(long)]
        trivia: bool,
    },

    /// Print the syntax tree. / 打印语法树。
    Ast {
        /// The file to parse. / 要解析的文件。
        file: String,
    },

    /// Print diagnostics in a machine-readable form. / 以机器可读格式打印诊断信息。
    Diagnostics {
        /// The file to parse. / 要解析的文件。
        file: String,

        /// Output format. / 输出格式。
        #[arg(long, value_enum, default_value_t = Format::Lsp)]
        format: Format,
    },
}

/// Diagnostic output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Editor-protocol JSON array.
    Lsp,
    /// One line per diagnostic.
    Text,
}

impl Cli {
    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        if let Some(max) = self.max_diagnostics {
            limits = limits.max_diagnostics(max);
        }
        if let Some(max) = self.max_iterations {
            limits = limits.max_iterations(max);
        }
        if let Some(max) = self.max_depth {
            limits = limits.max_nesting_depth(max);
        }
        limits
    }
}

/// Install the log subscriber; `LOOM_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose { "loom=debug" } else { "loom=warn" };
    let filter = EnvFilter::try_from_env("LOOM_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let limits = cli.limits();
    let result = match &cli.command {
        Commands::Check { file } => Input::read(file)
            .and_then(|input| commands::check::run(&input, &limits, cli.verbose, cli.quiet)),
        Commands::Tokens { file, trivia } => {
            Input::read(file).and_then(|input| commands::tokens::run(&input, &limits, *trivia))
        }
        Commands::Ast { file } => {
            Input::read(file).and_then(|input| commands::ast::run(&input, &limits))
        }
        Commands::Diagnostics { file, format } => Input::read(file)
            .and_then(|input| commands::diagnostics::run(&input, &limits, *format)),
    };

    if let Err(e) = result {
        if !cli.quiet {
            output::error(&e.to_string());
        }
        std::process::exit(e.exit_code());
    }
}
