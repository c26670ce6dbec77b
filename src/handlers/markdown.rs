use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use futures_channel::mpsc::UnboundedSender;
use log::{debug, info};
use uuid::Uuid;

use crate::domain::{article::AsyncResult, dom::DomUpdate};

pub trait MarkdownRenderer {
    /// Takes in one script result. Returns `true` when the rendered
    /// document no longer reflects it.
    fn update_async_script(&mut self, result: &AsyncResult) -> bool;

    /// Schedules a document refresh without waiting for it.
    fn update_dom(&mut self) -> Result<()>;
}

pub struct Markdown {
    rendered: HashMap<Uuid, String>,
    revision: u64,
    sink: UnboundedSender<DomUpdate>,
}

impl Markdown {
    pub fn new(sink: UnboundedSender<DomUpdate>) -> Self {
        Markdown {
            rendered: HashMap::new(),
            revision: 0,
            sink,
        }
    }

    pub fn rendered(&self, id: &Uuid) -> Option<&str> {
        self.rendered.get(id).map(String::as_str)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl MarkdownRenderer for Markdown {
    fn update_async_script(&mut self, result: &AsyncResult) -> bool {
        let Some(output) = result.output() else {
            return false;
        };
        if self.rendered.get(&result.id).is_some_and(|r| r == output) {
            return false;
        }
        debug!("script {} resolved, {} bytes", result.id, output.len());
        self.rendered.insert(result.id, output.to_string());
        true
    }

    fn update_dom(&mut self) -> Result<()> {
        self.revision += 1;
        let update = DomUpdate {
            revision: self.revision,
            requested_at: Utc::now(),
            fragments: self.rendered.clone(),
        };
        info!("publishing dom update {}", update.revision);
        self.sink.unbounded_send(update)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures_channel::mpsc::unbounded;

    use super::*;
    use crate::domain::article::Article;

    #[test]
    fn pending_results_need_nothing() {
        let (sink, _source) = unbounded();
        let mut markdown = Markdown::new(sink);
        let mut article = Article::new("t");
        article.add_script("later()");
        assert!(!markdown.update_async_script(&article.async_results[0]));
    }

    #[test]
    fn only_changed_output_needs_update() {
        let (sink, _source) = unbounded();
        let mut markdown = Markdown::new(sink);
        let mut article = Article::new("t");
        let id = article.add_script("1 + 1");
        article.resolve(id, "2").unwrap();

        assert!(markdown.update_async_script(&article.async_results[0]));
        assert!(!markdown.update_async_script(&article.async_results[0]));
        assert_eq!(markdown.rendered(&id), Some("2"));

        article.resolve(id, "3").unwrap();
        assert!(markdown.update_async_script(&article.async_results[0]));
        assert_eq!(markdown.rendered(&id), Some("3"));
    }

    #[test]
    fn update_dom_publishes_snapshot() {
        let (sink, mut source) = unbounded();
        let mut markdown = Markdown::new(sink);
        let mut article = Article::new("t");
        let id = article.add_script("1 + 1");
        article.resolve(id, "2").unwrap();
        markdown.update_async_script(&article.async_results[0]);

        markdown.update_dom().unwrap();
        markdown.update_dom().unwrap();

        let first = source.try_next().unwrap().unwrap();
        let second = source.try_next().unwrap().unwrap();
        assert_eq!(first.revision, 1);
        assert_eq!(second.revision, 2);
        assert_eq!(first.fragments.get(&id).map(String::as_str), Some("2"));
    }

    #[test]
    fn update_dom_fails_without_worker() {
        let (sink, source) = unbounded();
        drop(source);
        let mut markdown = Markdown::new(sink);
        assert!(markdown.update_dom().is_err());
    }
}
