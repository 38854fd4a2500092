//! ShapeAssembly CLI - Command line interface for the ShapeAssembly front end

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use shapeasm_ast::ToSource;
use shapeasm_highlight::Highlighter;
use shapeasm_parser::{parse_program, Diagnostic, ParseResult, Severity};

/// File extension of ShapeAssembly programs
const EXTENSION: &str = "sa";

#[derive(Parser)]
#[command(name = "shapeasm")]
#[command(about = "ShapeAssembly language front end", long_about = None)]
struct Cli {
    /// Log parser internals (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and output the AST and diagnostics as JSON
    Parse {
        /// Input file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Check files or directories of `.sa` programs
    Check {
        /// Input files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Output line-local highlight ranges as JSON
    Highlight {
        /// Input file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print the parsed program in canonical form
    Fmt {
        /// Input file
        file: PathBuf,
    },
    /// Interactive REPL
    Repl,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { file, pretty } => cmd_parse(&file, pretty),
        Commands::Check { paths } => cmd_check(&paths),
        Commands::Highlight { file, pretty } => cmd_highlight(&file, pretty),
        Commands::Fmt { file } => cmd_fmt(&file),
        Commands::Repl => cmd_repl(),
    }
}

/// Initialize logging; `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(file: &Path) -> String {
    match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_parse(file: &Path, pretty: bool) {
    let source = read_source(file);
    let result = parse_program(&source);
    print_json(&result, pretty);
    if result.has_errors() {
        std::process::exit(1);
    }
}

fn cmd_check(paths: &[PathBuf]) {
    let files = collect_programs(paths);
    if files.is_empty() {
        eprintln!("No .{} files found", EXTENSION);
        std::process::exit(1);
    }

    let mut all_ok = true;
    for file in &files {
        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading {}: {}", file.display(), e);
                all_ok = false;
                continue;
            }
        };

        let result = parse_program(&source);
        let errors = result.errors().count();
        let warnings = result.warnings().count();
        report_diagnostics(&source, file, &result.diagnostics);

        if errors == 0 {
            println!(
                "✓ {} - {} functions ({} warnings)",
                file.display(),
                result.program.subfunctions.len() + 1,
                warnings
            );
        } else {
            eprintln!("✗ {} - {} errors", file.display(), errors);
            all_ok = false;
        }
    }

    if !all_ok {
        std::process::exit(1);
    }
}

/// Expand directories into the `.sa` files beneath them
fn collect_programs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            match entry {
                Ok(entry)
                    if entry.file_type().is_file()
                        && entry.path().extension().and_then(|e| e.to_str()) == Some(EXTENSION) =>
                {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable entry"),
            }
        }
    }
    debug!(count = files.len(), "collected programs");
    files
}

fn cmd_highlight(file: &Path, pretty: bool) {
    let source = read_source(file);
    let highlighter = Highlighter::new(&source);
    print_json(&highlighter.all(), pretty);
}

fn cmd_fmt(file: &Path) {
    let source = read_source(file);
    let result = parse_program(&source);
    if result.has_errors() {
        report_diagnostics(&source, file, &result.diagnostics);
        std::process::exit(1);
    }
    print!("{}", result.program.to_source(0));
}

fn cmd_repl() {
    use rustyline::DefaultEditor;

    println!("ShapeAssembly REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Each line is appended to the program, which is re-parsed in full.");
    println!("Type :help for help, :quit to exit");
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to start REPL: {}", e);
            std::process::exit(1);
        }
    };
    let mut buffer = String::new();

    loop {
        let readline = rl.readline("shapeasm> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let trimmed = line.trim();

                if trimmed.starts_with(':') {
                    match trimmed {
                        ":quit" | ":q" => break,
                        ":help" | ":h" => {
                            println!("Commands:");
                            println!("  :load <file>  - Replace the program with a file");
                            println!("  :show         - Print the program in canonical form");
                            println!("  :check        - List all diagnostics");
                            println!("  :clear        - Clear the program");
                            println!("  :quit         - Exit REPL");
                        }
                        cmd if cmd.starts_with(":load ") => {
                            let path = cmd[6..].trim();
                            match fs::read_to_string(path) {
                                Ok(s) => {
                                    buffer = s;
                                    println!("Loaded {}", path);
                                    print_summary(&parse_program(&buffer));
                                }
                                Err(e) => eprintln!("Error: {}", e),
                            }
                        }
                        ":show" => print!("{}", parse_program(&buffer).program.to_source(0)),
                        ":check" => {
                            let result = parse_program(&buffer);
                            for diagnostic in &result.diagnostics {
                                println!("  {}", diagnostic.format_simple());
                            }
                            print_summary(&result);
                        }
                        ":clear" => {
                            buffer.clear();
                            println!("Cleared");
                        }
                        _ => println!("Unknown command. Type :help for help."),
                    }
                } else {
                    let before = parse_program(&buffer).diagnostics;
                    if !buffer.is_empty() && !buffer.ends_with('\n') {
                        buffer.push('\n');
                    }
                    buffer.push_str(&line);

                    let result = parse_program(&buffer);
                    for diagnostic in result.diagnostics.iter().filter(|d| !before.contains(d)) {
                        println!("  {}", diagnostic.format_simple());
                    }
                }
            }
            Err(_) => break,
        }
    }

    println!("Goodbye!");
}

fn print_summary(result: &ParseResult) {
    println!(
        "{} functions, {} errors, {} warnings",
        result.program.subfunctions.len() + 1,
        result.errors().count(),
        result.warnings().count()
    );
}

fn report_diagnostics(source: &str, file: &Path, diagnostics: &[Diagnostic]) {
    let name = file.to_string_lossy().to_string();
    for diagnostic in diagnostics {
        let printed = render_diagnostic(
            source,
            &name,
            diagnostic,
            report_config(),
            std::io::stderr(),
        );
        if let Err(e) = printed {
            eprintln!("{}: {}", name, diagnostic.format_simple());
            debug!(error = %e, "failed to render diagnostic");
        }
    }
}

/// Diagnostic spans are byte offsets, not char indices
fn report_config() -> Config {
    Config::default().with_index_type(IndexType::Byte)
}

fn render_diagnostic(
    source: &str,
    name: &str,
    diagnostic: &Diagnostic,
    config: Config,
    out: impl Write,
) -> std::io::Result<()> {
    let (kind, color) = match diagnostic.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
    };
    let span = diagnostic.span;
    Report::build(kind, name.to_string(), span.start)
        .with_config(config)
        .with_code(diagnostic.code.as_str())
        .with_message(&diagnostic.message)
        .with_label(
            Label::new((name.to_string(), span.start..span.end))
                .with_message(&diagnostic.message)
                .with_color(color),
        )
        .finish()
        .write((name.to_string(), Source::from(source)), out)
}
