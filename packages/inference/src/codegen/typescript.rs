use crate::error::{InferenceError, InferenceResult};
use crate::graph::StructureGraph;
use crate::resolver::{Candidate, Resolution, Resolver};
use std::collections::{BTreeSet, HashSet};

/// Generic placeholder types referenced by generated declarations. Only the
/// ones actually used end up in the output, in this declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Utility {
    Value,
    Record,
    SectionLambda,
    SectionOptional,
    Section,
}

impl Utility {
    fn source(self) -> &'static str {
        match self {
            // We can't infer a type from an untyped template, but we can allow
            // the full range of valid mustache values.
            Utility::Value => {
                "type MustacheValue = string | number | boolean | (() => MustacheValue)"
            }
            // Properties in a record may be nullable but the record itself
            // must be passed to the template.
            Utility::Record => "type MustacheRecord<T> = T",
            // Placeholder for a lambda invoked as a section value; its real
            // signature is not inferred.
            Utility::SectionLambda => {
                "interface MustacheSectionLambda<T> {\n  (template: string, render: (...args: any[]) => string): string\n}"
            }
            Utility::SectionOptional => {
                "type MustacheSectionOptional = MustacheValue | MustacheSectionLambda<any>"
            }
            // A section's properties are nullable and may or may not be lists.
            Utility::Section => {
                "type MustacheSection<T> = T[] | T | (() => MustacheSectionLambda<T>)"
            }
        }
    }
}

/// Serializes a finished structure graph into TypeScript declarations: the
/// used placeholder types, one declaration per resolved structural type, and
/// the template-name index (`TemplateMap`, `TemplateName`, `TEMPLATES`).
pub struct TypeScriptGenerator<'graph> {
    graph: &'graph StructureGraph,
    resolver: Resolver<'graph>,
}

impl<'graph> TypeScriptGenerator<'graph> {
    pub fn new(graph: &'graph StructureGraph) -> Self {
        Self {
            graph,
            resolver: Resolver::new(graph),
        }
    }

    /// Produce the full declaration blob. Deterministic and idempotent:
    /// rendering the same finished graph twice yields byte-identical output.
    pub fn render(&mut self) -> InferenceResult<String> {
        self.resolver.resolve_all()?;

        let mut used = BTreeSet::new();
        let mut declarations = Vec::new();
        for resolution in self.resolver.resolutions() {
            declarations.push(resolution_to_string(resolution, &mut used));
        }

        // Template names and map keys keep registration order, regardless of
        // the order resolution happened to visit the graph.
        let mut template_map = Vec::new();
        for name in self.graph.templates() {
            let type_name = self
                .resolver
                .resolution(name)
                .map(|r| r.type_name.clone())
                .ok_or_else(|| InferenceError::UnknownTemplate(name.clone()))?;
            template_map.push((name.clone(), type_name));
        }

        let mut output: Vec<String> = used.iter().map(|u| u.source().to_string()).collect();
        output.extend(declarations);

        output.push(format!(
            "export type TemplateMap = {{\n{}\n}}",
            template_map
                .iter()
                .map(|(name, type_name)| format!("  '{name}': {type_name},"))
                .collect::<Vec<_>>()
                .join("\n")
        ));

        output.push("export type TemplateName = keyof TemplateMap".to_string());

        output.push(format!(
            "export const TEMPLATES = [\n{}\n] as const",
            template_map
                .iter()
                .map(|(name, _)| format!("  '{name}',"))
                .collect::<Vec<_>>()
                .join("\n")
        ));

        Ok(output.join("\n\n"))
    }
}

/// Generate declarations for every template registered in `graph`.
pub fn generate_declarations(graph: &StructureGraph) -> InferenceResult<String> {
    TypeScriptGenerator::new(graph).render()
}

fn resolution_to_string(resolution: &Resolution, used: &mut BTreeSet<Utility>) -> String {
    // A node used purely through self-references is the value itself, not a
    // record around it.
    if resolution.is_self_only() {
        used.insert(Utility::Value);
        return format!("type {} = MustacheValue", resolution.type_name);
    }

    let mut out = format!("interface {} {{", resolution.type_name);
    if !resolution.candidates.is_empty() {
        out.push('\n');
        for (key, hints) in &resolution.candidates {
            out.push_str(&property_string(key, hints, used));
            out.push('\n');
        }
    }
    out.push('}');
    out
}

fn property_string(key: &str, hints: &[Candidate], used: &mut BTreeSet<Utility>) -> String {
    let mut optional = false;
    let mut fragments: Vec<String> = Vec::new();

    for hint in hints {
        match hint {
            Candidate::Record { type_name } => {
                fragments.push(format!("MustacheRecord<{type_name}>"));
                used.insert(Utility::Record);
            }
            Candidate::Section { type_name } => {
                optional = true;
                fragments.push(format!("MustacheSection<{type_name}>"));
                used.insert(Utility::SectionLambda);
                used.insert(Utility::Section);
            }
            Candidate::Value => {
                fragments.push("MustacheValue".to_string());
                used.insert(Utility::Value);
            }
            Candidate::Optional => {
                optional = true;
                fragments.push("MustacheSectionOptional".to_string());
                used.insert(Utility::Value);
                used.insert(Utility::SectionLambda);
                used.insert(Utility::SectionOptional);
            }
            Candidate::SelfRef => {
                // Denotes the record itself rather than a named field.
                return "  // self-reference ({{.}}) intentionally left blank".to_string();
            }
        }
    }

    let mut seen = HashSet::new();
    fragments.retain(|fragment| seen.insert(fragment.clone()));

    format!(
        "  {key}{}: {}",
        if optional { "?" } else { "" },
        fragments.join(" & ")
    )
}
