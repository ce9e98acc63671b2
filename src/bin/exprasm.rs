//! Command line front end: compile one expression and print the listing.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use exprasm::{compile, CompilerConfig, ProgramTemplate, TokenMode};

#[derive(Parser, Debug)]
#[command(name = "exprasm", version, about = "Compile infix arithmetic to x86-64 assembly")]
struct Args {
    /// Expression with tokens separated by single spaces, e.g. "1 + 2 * 3".
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    expr: Option<String>,

    /// Read the expression from a file instead.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Skip unrecognized tokens instead of rejecting the expression.
    #[arg(long)]
    lenient: bool,

    /// Do not validate operand/operator alternation up front.
    #[arg(long)]
    no_arity_check: bool,

    /// Comma separated register catalog, in allocation order.
    #[arg(long, value_delimiter = ',')]
    registers: Option<Vec<String>>,

    /// Register the result is moved into before printing.
    #[arg(long)]
    output_register: Option<String>,

    /// Print only the listing, without the header line.
    #[arg(short, long)]
    quiet: bool,
}

fn build_config(args: &Args) -> Result<CompilerConfig, Box<dyn std::error::Error>> {
    let mut config = CompilerConfig::default()
        .with_arity_check(!args.no_arity_check)
        .with_token_mode(if args.lenient {
            TokenMode::Lenient
        } else {
            TokenMode::Strict
        });

    if let Some(names) = &args.registers {
        config = config.with_register_names(names)?;
    }
    if let Some(name) = &args.output_register {
        config = config.with_template(ProgramTemplate::default().with_output_register(name));
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let expr = match (&args.expr, &args.file) {
        (Some(expr), _) => expr.clone(),
        (None, Some(path)) => fs::read_to_string(path)?.trim_end_matches(['\r', '\n']).to_string(),
        (None, None) => return Err("no expression given".into()),
    };

    let config = build_config(args)?;
    let program = compile(&expr, &config)?;

    if !args.quiet {
        println!("Generated ASM Code:");
    }
    print!("{}", program);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
