use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How caller-supplied text is spliced into HTML responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupMode {
    /// Verbatim; markup in the input is rendered by the browser.
    #[default]
    Raw,
    /// HTML-encoded before interpolation.
    Escaped,
}

impl MarkupMode {
    pub fn render<'a>(self, text: &'a str) -> Cow<'a, str> {
        match self {
            MarkupMode::Raw => Cow::Borrowed(text),
            MarkupMode::Escaped => html_escape::encode_safe(text),
        }
    }

    pub fn heading(self, label: &str, text: &str) -> String {
        format!("<h1>{label}{}</h1>", self.render(text))
    }
}
