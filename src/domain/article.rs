use thiserror::Error;
use uuid::Uuid;

use super::util::str_to_rgb;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArticleError {
    #[error("no async script with id {0}")]
    UnknownScript(Uuid),
}

/// A script embedded in an article whose output arrives later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsyncResult {
    pub id: Uuid,
    pub script: String,
    output: Option<String>,
}

impl AsyncResult {
    pub fn new(script: impl Into<String>) -> Self {
        AsyncResult {
            id: Uuid::new_v4(),
            script: script.into(),
            output: None,
        }
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.output.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Article {
    pub title: String,
    pub tags: Vec<String>,
    pub async_results: Vec<AsyncResult>,
}

impl Article {
    pub fn new(title: impl Into<String>) -> Self {
        Article {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn add_script(&mut self, script: impl Into<String>) -> Uuid {
        let result = AsyncResult::new(script);
        let id = result.id;
        self.async_results.push(result);
        id
    }

    /// Stores the output of a script. Resolving twice overwrites.
    pub fn resolve(&mut self, id: Uuid, output: impl Into<String>) -> Result<(), ArticleError> {
        let result = self
            .async_results
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ArticleError::UnknownScript(id))?;
        result.output = Some(output.into());
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.async_results.iter().filter(|r| r.is_pending()).count()
    }

    pub fn tag_colors(&self) -> Vec<(&str, String)> {
        self.tags
            .iter()
            .map(|tag| (tag.as_str(), str_to_rgb(tag)))
            .collect()
    }

    /// Body of the article, one placeholder per script in insertion order.
    pub fn template(&self) -> String {
        let mut body = format!("<article>\n<h1>{}</h1>\n", escape_html(&self.title));
        if !self.tags.is_empty() {
            body += "<ul class=\"tags\">\n";
            for (tag, color) in self.tag_colors() {
                body += &format!(
                    "<li style=\"color: {color}\">{}</li>\n",
                    escape_html(tag)
                );
            }
            body += "</ul>\n";
        }
        for result in &self.async_results {
            body += &placeholder(result.id, "");
            body.push('\n');
        }
        body += "</article>";
        body
    }
}

pub const PLACEHOLDER_OPEN: &str = "<div data-async-script=\"";
pub const PLACEHOLDER_CLOSE: &str = "</div>";

/// Element reserved in the body for a script's output.
pub fn placeholder(id: Uuid, content: &str) -> String {
    format!("{PLACEHOLDER_OPEN}{id}\">{content}{PLACEHOLDER_CLOSE}")
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}
