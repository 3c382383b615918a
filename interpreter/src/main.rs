use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vivid_lib::compiler::{self, CompilationError};
use vivid_lib::{bytecode, parser};

use std::path::{Path, PathBuf};

/// the extension `compile` gives the bytecode by default
const BYTECODE_EXTENSION: &str = "vvd";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// log what the compiler and the loader are doing
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Prints a layout with its diagnostics, fails if there are any
    Check(CheckArgs),
    /// Compiles a layout to bytecode
    Compile(CompileArgs),
    /// Turns bytecode back into a layout
    Dis(DisArgs),
}

#[derive(Args)]
struct CheckArgs {
    layout: PathBuf,

    #[cfg(feature = "dev")]
    #[arg(short = 'r', long)]
    show_records: bool,
}

#[derive(Args)]
struct CompileArgs {
    layout: PathBuf,

    /// defaults to the layout path with the extension "vvd"
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct DisArgs {
    bytecode: PathBuf,

    #[cfg(feature = "dev")]
    #[arg(short = 'p', long)]
    show_program: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check(args) => {
            let problems = check(&args)?;
            if problems > 0 {
                eprintln!("{} problem(s) in {}", problems, args.layout.display());
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Compile(args) => compile(&args),
        Command::Dis(args) => disassemble(&args),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "vivid=debug" } else { "vivid=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_layout(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
}

/// prints every line, the ones with problems followed by their diagnostics. Returns the number
/// of problems.
fn check(args: &CheckArgs) -> Result<usize> {
    let src = read_layout(&args.layout)?;
    let path = args.layout.to_string_lossy();
    let lines = parser::lines(&src).map_err(|e| e.with_path(&path))?;

    let mut records = Vec::with_capacity(lines.len());
    let mut problems = 0;
    for (i, raw) in lines.iter().enumerate() {
        let record = parser::parse_line(i + 1, raw).map_err(|e| e.with_path(&path))?;
        println!("{} {}", format!("{:>4} |", i + 1).dark_grey(), raw);
        if let Some(record) = &record {
            for problem in &record.problems {
                print_diagnostic(&problem.to_string());
            }
            problems += record.problems.len();
        }

        #[cfg(feature = "dev")]
        if args.show_records {
            println!("{:#?}", record);
        }
        records.push(record);
    }

    if problems == 0 {
        if let Err(e @ CompilationError::MissingLayout) = compiler::compile(&records) {
            print_diagnostic(&e.to_string());
            problems += 1;
        }
    }
    Ok(problems)
}

fn print_diagnostic(message: &str) {
    println!("{} {}: {}", "     =".dark_grey(), "error".red().bold(), message);
}

fn compile(args: &CompileArgs) -> Result<()> {
    let src = read_layout(&args.layout)?;
    let bc = compiler::compile_source(&src)
        .with_context(|| format!("Could not compile {}", args.layout.display()))?;

    let output = match &args.output {
        Some(path) => path.clone(),
        None => args.layout.with_extension(BYTECODE_EXTENSION),
    };
    std::fs::write(&output, &bc)
        .with_context(|| format!("Could not write {}", output.display()))?;
    info!(path = %output.display(), bytes = bc.len(), "bytecode written");
    Ok(())
}

fn disassemble(args: &DisArgs) -> Result<()> {
    let bytes = std::fs::read(&args.bytecode)
        .with_context(|| format!("Could not read {}", args.bytecode.display()))?;
    let program = bytecode::load(&bytes)
        .with_context(|| format!("Could not load {}", args.bytecode.display()))?;

    #[cfg(feature = "dev")]
    if args.show_program {
        println!("{:#?}", program);
        return Ok(());
    }

    println!("{}", program);
    Ok(())
}
