use log::{debug, warn};

use crate::domain::article::Article;

use super::markdown::MarkdownRenderer;

/// Offers every async result of `article` to the renderer and, if any of
/// them changed the document, asks for a single refresh.
///
/// The refresh is not awaited. Returns whether one was needed.
pub fn update_async_script(article: &Article, renderer: &mut impl MarkdownRenderer) -> bool {
    let mut need_update = false;
    for result in &article.async_results {
        // every result is visited, even after the first hit
        if renderer.update_async_script(result) {
            need_update = true;
        }
    }

    if need_update {
        if let Err(e) = renderer.update_dom() {
            warn!("could not schedule dom update: {e:#}");
        }
    } else {
        debug!("no async script changes in {:?}", article.title);
    }

    need_update
}
