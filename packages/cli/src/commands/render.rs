use anyhow::{bail, Result};
use clap::Args;
use serde_json::Value;
use stache_loader::{LoaderOptions, TemplateLoader, TemplateRenderer};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template name (path relative to --dir, without extension)
    pub name: String,

    /// Directory containing .mustache templates
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Glob for template files, relative to --dir
    #[arg(long, default_value = "**/*.mustache")]
    pub files: String,

    /// JSON file with template params
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Inline JSON params
    #[arg(long)]
    pub json: Option<String>,
}

pub fn render(args: RenderArgs) -> Result<()> {
    let params: Value = match (&args.params, &args.json) {
        (Some(_), Some(_)) => bail!("--params and --json are mutually exclusive"),
        (Some(path), None) => serde_json::from_str(&fs::read_to_string(path)?)?,
        (None, Some(inline)) => serde_json::from_str(inline)?,
        (None, None) => Value::Object(Default::default()),
    };

    let mut opts = LoaderOptions::new(&args.dir);
    opts.files = args.files.clone();

    let mut renderer = TemplateRenderer::new(TemplateLoader::new(opts));
    let output = renderer.render(&args.name, &params)?;

    print!("{output}");
    Ok(())
}
