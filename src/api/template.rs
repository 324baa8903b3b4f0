//! Prompt template rendering.
//!
//! Templates use `{{ name }}` placeholders and `{{#if name}} ... {{/if}}`
//! sections. A section is dropped entirely when its variable is absent or
//! blank, so optional inputs never leave empty headings behind.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern"))
}

fn section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\{\{#if\s+(\w+)\s*\}\}(.*?)\{\{/if\}\}").expect("section pattern")
    })
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("blank line pattern"))
}

/// Renders a template string with the given variables.
///
/// Sections are resolved before placeholders, so substituted values are
/// never interpreted as template syntax.
pub fn render_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let present = |key: &str| vars.get(key).is_some_and(|v| !v.trim().is_empty());

    let sectioned = section_re().replace_all(template, |caps: &Captures| {
        if present(&caps[1]) {
            caps[2].to_string()
        } else {
            String::new()
        }
    });

    let rendered = placeholder_re().replace_all(&sectioned, |caps: &Captures| {
        vars.get(&caps[1]).cloned().unwrap_or_default()
    });

    blank_lines_re()
        .replace_all(rendered.trim(), "\n\n")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn substitutes_placeholders_with_and_without_spaces() {
        let out = render_template("Q: {{query}} / {{ query }}", &vars(&[("query", "bail")]));
        assert_eq!(out, "Q: bail / bail");
    }

    #[test]
    fn unknown_placeholder_renders_empty() {
        let out = render_template("Hello {{name}}!", &HashMap::new());
        assert_eq!(out, "Hello !");
    }

    #[test]
    fn absent_section_is_omitted_entirely() {
        let template = "Intro\n\n{{#if doc}}Document:\n{{doc}}\n{{/if}}\n\nPrompt: {{prompt}}";
        let out = render_template(template, &vars(&[("prompt", "draft")]));
        assert!(!out.contains("Document:"));
        assert_eq!(out, "Intro\n\nPrompt: draft");
    }

    #[test]
    fn blank_value_counts_as_absent_for_sections() {
        let out = render_template("{{#if doc}}Doc: {{doc}}{{/if}}end", &vars(&[("doc", "   ")]));
        assert_eq!(out, "end");
    }

    #[test]
    fn present_section_is_kept() {
        let out = render_template("{{#if doc}}Doc: {{doc}}{{/if}}", &vars(&[("doc", "lease")]));
        assert_eq!(out, "Doc: lease");
    }

    #[test]
    fn values_are_not_reinterpreted_as_template_syntax() {
        let out = render_template("{{a}}", &vars(&[("a", "{{#if b}}x{{/if}} {{b}}"), ("b", "y")]));
        assert_eq!(out, "{{#if b}}x{{/if}} {{b}}");
    }
}
