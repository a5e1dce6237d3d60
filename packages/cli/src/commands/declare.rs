use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use stache_inference::{generate_declarations, StructureGraph};
use stache_loader::{LoaderOptions, TemplateLoader};
use stache_parser::error::pretty;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DeclareArgs {
    /// Directory containing .mustache templates
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Glob for template files, relative to --dir
    #[arg(long, default_value = "**/*.mustache")]
    pub files: String,

    /// Write declarations to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn declare(args: DeclareArgs) -> Result<()> {
    let mut opts = LoaderOptions::new(&args.dir);
    opts.files = args.files.clone();

    let sources = TemplateLoader::new(opts).load()?;
    if sources.is_empty() {
        println!("{}", "⚠️  No templates found".yellow());
        return Ok(());
    }

    eprintln!("Found {} templates", sources.len());

    let mut graph = StructureGraph::new();
    let mut error_count = 0;

    for (name, source) in &sources {
        match stache_parser::parse(source) {
            Ok(tokens) => {
                graph.add_template(name, &tokens);
                eprintln!("  {} {}", "✓".green(), name);
            }
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {}", "✗".red(), name);
                eprintln!("{}", pretty::format_error(&e, name, source));
            }
        }
    }

    if error_count > 0 {
        bail!("failed parsing {} template(s)", error_count);
    }

    let output = generate_declarations(&graph)?;

    match &args.out {
        None => println!("{output}"),
        Some(out_file) => {
            if let Some(parent) = out_file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(out_file, format!("{output}\n"))?;
            eprintln!(
                "{} Wrote declarations to {}",
                "✓".green(),
                out_file.display()
            );
        }
    }

    Ok(())
}
