use crate::error::{LoaderError, LoaderResult};
use crate::loader::{TemplateLoader, TemplateSources};
use serde_json::Value;
use stache_evaluator::TemplateSet;
use stache_inference::{generate_declarations, StructureGraph};
use stache_parser::parse;

fn parse_all(sources: &TemplateSources) -> LoaderResult<TemplateSet> {
    let mut templates = TemplateSet::new();
    for (name, source) in sources {
        let tokens = parse(source).map_err(|source| LoaderError::Parse {
            template: name.clone(),
            source,
        })?;
        templates.insert(name.clone(), tokens);
    }
    Ok(templates)
}

/// Loads a template directory and emits TypeScript declarations for it.
pub struct Declarer {
    loader: TemplateLoader,
}

impl Declarer {
    pub fn new(loader: TemplateLoader) -> Self {
        Self { loader }
    }

    pub fn declare(&mut self) -> LoaderResult<String> {
        let sources = self.loader.load()?;
        let templates = parse_all(&sources)?;

        let mut graph = StructureGraph::new();
        for (name, tokens) in &templates {
            graph.add_template(name, tokens);
        }

        Ok(generate_declarations(&graph)?)
    }
}

/// Loads a template directory and renders templates from it, with every
/// loaded template available as a partial.
pub struct TemplateRenderer {
    loader: TemplateLoader,
}

impl TemplateRenderer {
    pub fn new(loader: TemplateLoader) -> Self {
        Self { loader }
    }

    pub fn render(&mut self, name: &str, params: &Value) -> LoaderResult<String> {
        let sources = self.loader.load()?;
        let templates = parse_all(&sources)?;
        Ok(stache_evaluator::render_template(name, params, &templates)?)
    }
}
