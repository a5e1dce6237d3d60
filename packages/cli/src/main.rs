mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{declare, render, DeclareArgs, RenderArgs};

/// Stache CLI - TypeScript declarations for mustache template directories
#[derive(Parser, Debug)]
#[command(name = "stache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate TypeScript declarations for a template directory
    Declare(DeclareArgs),

    /// Render one template with JSON params
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Declare(args) => declare(args),
        Command::Render(args) => render(args),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
