use std::{
    env,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{anyhow, Result};
use article_glue::{
    domain::{article::Article, color::Rgb, dom::Dom},
    handlers::{dom_updater::DomUpdater, markdown::Markdown},
    update_async_script,
};
use futures_channel::mpsc::{unbounded, UnboundedSender};
use futures_util::StreamExt;
use log::{debug, info};
use uuid::Uuid;

const USAGE: &str = "usage: article_glue color <text>... | article_glue demo [scripts]";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::try_init();
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("color") => print_colors(args.collect()),
        Some("demo") => {
            let scripts = match args.next() {
                Some(n) => n.parse()?,
                None => 3,
            };
            run_demo(scripts).await
        }
        _ => Err(anyhow!(USAGE)),
    }
}

fn print_colors(texts: Vec<String>) -> Result<()> {
    if texts.is_empty() {
        return Err(anyhow!(USAGE));
    }
    let no_color = env::var_os("NO_COLOR").is_some();
    for text in texts {
        let color = Rgb::for_label(&text);
        if no_color {
            println!("{color}  {text}");
        } else {
            println!("{}    \x1b[0m {color}  {text}", color.ansi_bg());
        }
    }
    Ok(())
}

/// Hands a resolved output back to the demo loop. Returns `false` when the
/// loop has already gone away.
fn deliver(sink: &UnboundedSender<(Uuid, String)>, id: Uuid, output: String) -> bool {
    match sink.unbounded_send((id, output)) {
        Ok(()) => true,
        Err(e) => {
            debug!("resolution of {id} lost: {e}");
            false
        }
    }
}

async fn run_demo(scripts: usize) -> Result<()> {
    let mut article = Article::new("Async scripts").with_tags(["rust", "markdown", "async"]);
    let ids: Vec<Uuid> = (0..scripts)
        .map(|i| article.add_script(format!("square({i})")))
        .collect();

    let dom = Arc::new(Mutex::new(Dom::new(article.template())));
    let updater = DomUpdater::init(dom.clone());
    let mut markdown = Markdown::new(updater.get_sink());

    // nothing resolved yet, so this should not touch the dom
    update_async_script(&article, &mut markdown);

    let (resolved_sink, mut resolved_source) = unbounded::<(Uuid, String)>();
    for (i, id) in ids.into_iter().enumerate() {
        let sink = resolved_sink.clone();
        // later scripts finish first
        let delay = Duration::from_millis(50 * (scripts - i) as u64);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            deliver(&sink, id, format!("<pre>{}</pre>", i * i));
        });
    }
    drop(resolved_sink);

    while let Some((id, output)) = resolved_source.next().await {
        article.resolve(id, output)?;
        let updated = update_async_script(&article, &mut markdown);
        info!("{} pending, update needed: {updated}", article.pending());
    }

    drop(markdown);
    updater.shutdown().await?;

    let dom = dom.lock().map_err(|_| anyhow!("dom lock poisoned"))?;
    println!("{}", dom.html());
    Ok(())
}
