use std::sync::PoisonError;

use anyhow::Result;
use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use log::info;
use tokio::task::JoinHandle;

use crate::domain::{dom::DomUpdate, types::SharedDom};

/// Applies published [`DomUpdate`]s to a shared document on a tokio task.
pub struct DomUpdater {
    sink: UnboundedSender<DomUpdate>,
    worker: JoinHandle<()>,
}

impl DomUpdater {
    async fn worker(mut source: UnboundedReceiver<DomUpdate>, dom: SharedDom) {
        info!("Started dom worker");
        while let Some(update) = source.next().await {
            let mut doc = dom.lock().unwrap_or_else(PoisonError::into_inner);
            if doc.apply(&update) {
                info!(
                    "dom at revision {}, requested {}",
                    update.revision, update.requested_at
                );
            }
        }
        info!("exiting, all renderers dropped");
    }

    pub fn init(dom: SharedDom) -> Self {
        let (dom_sink, dom_source) = unbounded::<DomUpdate>();
        let worker = tokio::spawn(Self::worker(dom_source, dom));
        Self {
            sink: dom_sink,
            worker,
        }
    }

    pub fn get_sink(&self) -> UnboundedSender<DomUpdate> {
        self.sink.clone()
    }

    /// Closes the channel for every sink handed out, then waits for the
    /// already queued updates to land.
    pub async fn shutdown(self) -> Result<()> {
        self.sink.close_channel();
        self.worker.await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use std::time::Duration;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{
        domain::{
            article::{placeholder, Article},
            dom::Dom,
        },
        handlers::markdown::{Markdown, MarkdownRenderer},
    };

    #[tokio::test]
    async fn applies_updates_in_order() {
        let id = Uuid::new_v4();
        let dom = Arc::new(Mutex::new(Dom::new(placeholder(id, ""))));
        let updater = DomUpdater::init(dom.clone());
        let sink = updater.get_sink();

        for (revision, text) in [(1, "a"), (2, "b")] {
            sink.unbounded_send(DomUpdate {
                revision,
                requested_at: Utc::now(),
                fragments: [(id, text.to_string())].into(),
            })
            .unwrap();
        }
        drop(sink);
        updater.shutdown().await.unwrap();

        let dom = dom.lock().unwrap();
        assert_eq!(dom.revision(), 2);
        assert_eq!(dom.html(), placeholder(id, "b"));
    }

    #[tokio::test]
    async fn shutdown_without_updates() {
        let dom = Arc::new(Mutex::new(Dom::new("<p></p>")));
        let updater = DomUpdater::init(dom.clone());
        updater.shutdown().await.unwrap();
        assert_eq!(dom.lock().unwrap().revision(), 0);
    }

    #[tokio::test]
    async fn shutdown_while_renderer_alive() {
        let mut article = Article::new("t");
        let id = article.add_script("1 + 1");
        article.resolve(id, "2").unwrap();

        let dom = Arc::new(Mutex::new(Dom::new(article.template())));
        let updater = DomUpdater::init(dom.clone());
        let mut markdown = Markdown::new(updater.get_sink());
        assert!(markdown.update_async_script(&article.async_results[0]));
        markdown.update_dom().unwrap();

        tokio::time::timeout(Duration::from_secs(2), updater.shutdown())
            .await
            .expect("shutdown hung with a live renderer")
            .unwrap();

        // queued update was drained before the worker stopped
        assert_eq!(dom.lock().unwrap().revision(), 1);
        assert!(dom.lock().unwrap().html().contains(&placeholder(id, "2")));
        assert!(markdown.update_dom().is_err());
    }
}
