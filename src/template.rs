//! Sandboxed placeholder substitution for template strings.
//!
//! Templates are registered as inline raw strings in a fresh [`Tera`]
//! instance per render, so template text cannot pull in files, reach the
//! network, or execute host code — the only capability exposed to a
//! template author is substitution of the variables passed in. Output is
//! not escaped: markup-safe escaping belongs to the consuming renderer,
//! not this engine.

use indexmap::IndexMap;
use tera::{Context, Tera};

use crate::error::RenderError;
use crate::model::PoolValue;

/// Name under which the inline template is registered. Carries no `.html`
/// style extension, which keeps Tera's autoescaping off.
const INLINE_TEMPLATE: &str = "inline";

/// Renders `template` with the given variables.
///
/// Fails with [`RenderError::TemplateSyntax`] when the template text is
/// malformed and [`RenderError::UndefinedVariable`] when a placeholder has
/// no corresponding entry in `variables`. `category` is carried into errors
/// for diagnostics only.
pub fn render(
    category: &str,
    template: &str,
    variables: &IndexMap<String, PoolValue>,
) -> Result<String, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_template(INLINE_TEMPLATE, template)
        .map_err(|error| RenderError::TemplateSyntax {
            category: category.to_string(),
            message: flatten_error(&error),
        })?;

    let mut context = Context::new();
    for (name, value) in variables {
        context.insert(name.as_str(), value);
    }

    tera.render(INLINE_TEMPLATE, &context)
        .map_err(|error| classify_render_failure(category, variables, &error))
}

/// Maps a Tera render failure onto the render-error taxonomy.
///
/// Tera reports a missing context variable as a message in the error chain;
/// everything else render-time is surfaced as an internal failure with the
/// flattened chain.
fn classify_render_failure(
    category: &str,
    variables: &IndexMap<String, PoolValue>,
    error: &tera::Error,
) -> RenderError {
    let chain = error_chain(error);
    for message in &chain {
        if message.contains("not found in context") {
            if let Some(name) = backticked(message) {
                return RenderError::UndefinedVariable {
                    category: category.to_string(),
                    name,
                    available: variables.keys().cloned().collect(),
                };
            }
        }
    }
    RenderError::Internal {
        message: chain.join(": "),
    }
}

fn error_chain(error: &tera::Error) -> Vec<String> {
    let mut messages = vec![error.to_string()];
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }
    messages
}

/// Extracts the first backtick-quoted token from a message, e.g. the
/// variable name out of "Variable `user` not found in context".
fn backticked(message: &str) -> Option<String> {
    let start = message.find('`')? + 1;
    let end = start + message[start..].find('`')?;
    Some(message[start..end].to_string())
}

fn flatten_error(error: &tera::Error) -> String {
    error_chain(error).join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn vars(pairs: &[(&str, PoolValue)]) -> IndexMap<String, PoolValue> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn substitutes_all_value_kinds() {
        let variables = vars(&[
            ("system", PoolValue::Text("CoreBanking".to_string())),
            ("code", PoolValue::Integer(503)),
            ("load", PoolValue::Float(0.75)),
        ]);
        let content = render(
            "system_error",
            "{{ system }} returned {{ code }} at load {{ load }}",
            &variables,
        )
        .unwrap();
        assert_eq!(content, "CoreBanking returned 503 at load 0.75");
    }

    #[test]
    fn rendered_output_has_no_unresolved_placeholders() {
        let variables = vars(&[("name", PoolValue::Text("x".to_string()))]);
        let content = render("c", "Hello {{ name }}, bye {{ name }}", &variables).unwrap();
        assert!(!content.contains("{{"));
        assert!(!content.contains("}}"));
    }

    #[test]
    fn template_without_placeholders_renders_unchanged() {
        let content = render("c", "plain text only", &IndexMap::new()).unwrap();
        assert_eq!(content, "plain text only");
    }

    #[test]
    fn undefined_variable_names_key_and_lists_available() {
        let variables = vars(&[("present", PoolValue::Integer(1))]);
        let err = render("billing", "{{ missing }}", &variables).unwrap_err();
        assert_matches!(
            err,
            RenderError::UndefinedVariable { ref name, ref category, ref available }
                if name == "missing"
                    && category == "billing"
                    && available == &vec!["present".to_string()]
        );
    }

    #[test]
    fn malformed_template_is_a_syntax_error() {
        let err = render("billing", "{{ unclosed", &IndexMap::new()).unwrap_err();
        assert_matches!(err, RenderError::TemplateSyntax { .. });
    }

    #[test]
    fn output_is_not_escaped() {
        let variables = vars(&[(
            "payload",
            PoolValue::Text("<tag> & 'quote'".to_string()),
        )]);
        let content = render("c", "{{ payload }}", &variables).unwrap();
        assert_eq!(content, "<tag> & 'quote'");
    }

    #[test]
    fn templates_cannot_include_external_files() {
        let result = render("c", "{% include \"/etc/passwd\" %}", &IndexMap::new());
        assert!(result.is_err());
    }
}
