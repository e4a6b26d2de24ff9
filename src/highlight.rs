use handlebars::html_escape;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

const THEME: &str = "base16-ocean.dark";

/// Syntax highlighter for source and example blocks.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new() -> Self {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes.themes.remove(THEME).unwrap_or_default();
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Highlights `code` as `lang`; unknown languages and highlighter
    /// failures fall back to an escaped `<pre>` block.
    pub fn highlight(&self, code: &str, lang: &str) -> String {
        let Some(syntax) = self.syntaxes.find_syntax_by_token(lang) else {
            tracing::debug!(lang, "no syntax definition, rendering plain");
            return plain_block(code);
        };
        match highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme) {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(lang, error = %err, "highlighting failed");
                plain_block(code)
            }
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn plain_block(code: &str) -> String {
    format!("<pre class=\"code-block\"><code>{}</code></pre>", html_escape(code))
}

/// Pretty-prints JSON text, or returns it unchanged when it is not JSON.
pub fn pretty_json(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| text.to_string())
}
