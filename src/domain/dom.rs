use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use super::article::{placeholder, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};

/// Refresh request produced by the renderer.
#[derive(Clone, Debug)]
pub struct DomUpdate {
    pub revision: u64,
    pub requested_at: DateTime<Utc>,
    pub fragments: HashMap<Uuid, String>,
}

/// The rendered document: a template with script placeholders filled in.
#[derive(Debug)]
pub struct Dom {
    template: String,
    html: String,
    revision: u64,
    updated_at: Option<DateTime<Utc>>,
}

impl Dom {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        Dom {
            html: template.clone(),
            template,
            revision: 0,
            updated_at: None,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Re-renders from `update`. Stale revisions are dropped.
    pub fn apply(&mut self, update: &DomUpdate) -> bool {
        if update.revision <= self.revision {
            debug!(
                "dropping stale dom update {} (at {})",
                update.revision, self.revision
            );
            return false;
        }

        self.html = self.render(&update.fragments);
        self.revision = update.revision;
        self.updated_at = Some(update.requested_at);
        true
    }

    // Single pass over the template; inserted fragments are never rescanned.
    fn render(&self, fragments: &HashMap<Uuid, String>) -> String {
        let empty: Vec<(String, &str)> = fragments
            .iter()
            .map(|(id, fragment)| (placeholder(*id, ""), fragment.as_str()))
            .collect();

        let mut html = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
            html.push_str(&rest[..start]);
            let tail = &rest[start..];
            match empty.iter().find(|(slot, _)| tail.starts_with(slot.as_str())) {
                Some((slot, fragment)) => {
                    html.push_str(&slot[..slot.len() - PLACEHOLDER_CLOSE.len()]);
                    html.push_str(fragment);
                    html.push_str(PLACEHOLDER_CLOSE);
                    rest = &tail[slot.len()..];
                }
                None => {
                    html.push_str(PLACEHOLDER_OPEN);
                    rest = &tail[PLACEHOLDER_OPEN.len()..];
                }
            }
        }
        html.push_str(rest);
        html
    }
}
