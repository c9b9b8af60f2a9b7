//! BibTeX entry construction shared by providers.

/// Builder for a single BibTeX entry.
///
/// Free-text fields go through [`BibtexEntry::text`] and are escaped;
/// identifiers and numbers go through [`BibtexEntry::verbatim`] so DOIs keep
/// their underscores.
#[derive(Debug, Clone)]
pub struct BibtexEntry {
    entry_type: &'static str,
    key: String,
    fields: Vec<(&'static str, String)>,
}

impl BibtexEntry {
    /// Start an entry, e.g. `@article{key, ...}`.
    #[must_use]
    pub fn new(entry_type: &'static str, key: impl Into<String>) -> Self {
        let key = sanitize_key(&key.into());
        Self { entry_type, key, fields: Vec::new() }
    }

    /// Add an escaped free-text field.
    #[must_use]
    pub fn text(mut self, name: &'static str, value: &str) -> Self {
        self.fields.push((name, escape(value)));
        self
    }

    /// Add an escaped free-text field when present and non-empty.
    #[must_use]
    pub fn text_opt(self, name: &'static str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    /// Add a field without escaping.
    #[must_use]
    pub fn verbatim(mut self, name: &'static str, value: impl ToString) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    /// Add an unescaped field when present.
    #[must_use]
    pub fn verbatim_opt<T: ToString>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.verbatim(name, v),
            None => self,
        }
    }

    /// Render the entry.
    #[must_use]
    pub fn build(&self) -> String {
        let mut output = format!("@{}{{{}", self.entry_type, self.key);
        for (name, value) in &self.fields {
            output.push_str(&format!(",\n  {name} = {{{value}}}"));
        }
        output.push_str("\n}");
        output
    }
}

/// BibTeX keys cannot contain whitespace, commas or braces.
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '{' | '}'))
        .collect();
    if cleaned.is_empty() { "unknown".to_string() } else { cleaned }
}

/// Escape LaTeX special characters in free text.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '&' | '%' | '$' | '#' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(c),
        }
    }
    out
}
