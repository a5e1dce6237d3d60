use crate::error::LoaderResult;
use glob::glob;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const MUSTACHE_EXTENSION: &str = ".mustache";

/// Template source text keyed by template name.
pub type TemplateSources = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Directory the template names are relative to
    pub dir: PathBuf,
    /// Glob for template files, relative to `dir`
    pub files: String,
    /// Keep the first load around for subsequent calls
    pub cache_templates: bool,
}

impl LoaderOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: format!("**/*{MUSTACHE_EXTENSION}"),
            cache_templates: false,
        }
    }
}

/// Discovers template files on disk and loads them as a name-to-source map.
///
/// Names are relative paths with the extension stripped, so
/// `partials/_person.mustache` loads as `partials/_person`, the same key the
/// template is addressed by as a partial.
pub struct TemplateLoader {
    opts: LoaderOptions,
    cache: Option<TemplateSources>,
}

impl TemplateLoader {
    pub fn new(opts: LoaderOptions) -> Self {
        Self { opts, cache: None }
    }

    pub fn load(&mut self) -> LoaderResult<TemplateSources> {
        if self.opts.cache_templates {
            if let Some(cached) = &self.cache {
                return Ok(cached.clone());
            }
        }

        let pattern = self.opts.dir.join(&self.opts.files);
        let mut sources = TemplateSources::new();

        for entry in glob(&pattern.to_string_lossy())? {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            let source = fs::read_to_string(&path)?;
            sources.insert(template_key(&self.opts.dir, &path), source);
        }

        if self.opts.cache_templates {
            self.cache = Some(sources.clone());
        }

        Ok(sources)
    }
}

/// Template name for a file: its path relative to `dir`, forward-slashed,
/// with the mustache extension stripped.
pub fn template_key(dir: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(dir).unwrap_or(file);
    let mut key = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if key.ends_with(MUSTACHE_EXTENSION) {
        key.truncate(key.len() - MUSTACHE_EXTENSION.len());
    }

    key
}
