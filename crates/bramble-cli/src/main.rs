//! Bramble CLI entry point.

use std::io::Read;

use clap::{Parser, Subcommand};
use rhizome_bramble_codegen_js::codegen;
use rhizome_bramble_ir::{Expr, parse, parse_all};
use rhizome_bramble_runtime::Interpreter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bramble")]
#[command(about = "Bramble reader, evaluator and JavaScript compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the syntax tree as JSON
    Parse {
        /// Input file (or - for stdin)
        file: String,

        /// Read every top-level form instead of only the first
        #[arg(long)]
        all: bool,
    },

    /// Evaluate and print the result as JSON
    Eval {
        /// Input file (or - for stdin)
        file: String,

        /// Evaluate every top-level form in one global environment
        #[arg(long)]
        all: bool,
    },

    /// Compile to JavaScript
    Codegen {
        /// Input file (or - for stdin)
        file: String,

        /// Compile every top-level form
        #[arg(long)]
        all: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rhizome_bramble=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file, all } => {
            let source = read_input(&file)?;
            let json = if all {
                serde_json::to_string_pretty(&parse_all(&source)?)?
            } else {
                serde_json::to_string_pretty(&parse(&source)?)?
            };
            println!("{}", json);
        }

        Commands::Eval { file, all } => {
            let source = read_input(&file)?;
            let interpreter = Interpreter::default();
            let result = if all {
                interpreter.read_all(&source)?
            } else {
                interpreter.read(&source)?
            };
            println!("{}", serde_json::to_string_pretty(&result.to_json())?);
        }

        Commands::Codegen { file, all, out } => {
            let source = read_input(&file)?;
            let js = if all {
                compile_all(&parse_all(&source)?)?
            } else {
                codegen(&parse(&source)?)?
            };

            match out {
                Some(out_path) => {
                    std::fs::write(&out_path, format!("{}\n", js))?;
                    info!("{} -> {}", file, out_path);
                }
                None => println!("{}", js),
            }
        }
    }

    Ok(())
}

fn read_input(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        debug!("reading {}", file);
        std::fs::read_to_string(file)
    }
}

/// One statement per form, each terminated.
fn compile_all(forms: &[Expr]) -> Result<String, rhizome_bramble_codegen_js::CodegenError> {
    let mut lines = Vec::with_capacity(forms.len());
    for form in forms {
        let mut js = codegen(form)?;
        if !js.ends_with(';') {
            js.push(';');
        }
        lines.push(js);
    }
    Ok(lines.join("\n"))
}
