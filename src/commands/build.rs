//! Build the post pages

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::{FilePathResolver, FileSystemSource, MarkdownRenderer, NodeStore};
use crate::generator::{self, Generator, PageOptions, PageRegistry};
use crate::{Site, CONFIG_FILE};

/// Source the content, create the post pages and render them. Returns the
/// number of pages written.
pub fn run(site: &Site) -> Result<usize> {
    let start = Instant::now();

    let (store, registry) = build_pages(site)?;
    let written = Generator::new(site)?.generate(&store, &registry)?;

    tracing::info!(
        "Generated {} pages in {:.2}s",
        written,
        start.elapsed().as_secs_f64()
    );
    Ok(written)
}

/// Run both lifecycle hooks without rendering anything
pub fn build_pages(site: &Site) -> Result<(NodeStore, PageRegistry)> {
    let config = &site.config;
    let renderer =
        MarkdownRenderer::with_options(&config.highlight.theme, config.highlight.line_number);
    let resolver = FilePathResolver::from_config(config);
    let source = FileSystemSource::new(
        &site.source_dir,
        &config.source_instance_name,
        renderer,
    );

    let mut store = NodeStore::new();
    source.source_nodes(&mut store, |store, id| {
        generator::on_create_node(store, id, &resolver)?;
        Ok(())
    })?;

    let mut registry = PageRegistry::new();
    generator::create_pages(&store, &PageOptions::from_site(site), &mut registry)?;

    Ok((store, registry))
}

/// Watch the source directory and config file, rebuilding on change
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    if site.source_dir.exists() {
        watcher.watch(&site.source_dir, notify::RecursiveMode::Recursive)?;
    }

    let config_path = site.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    if let generator::TemplateRef::File(path) = site.template() {
        if path.exists() {
            watcher.watch(&path, notify::RecursiveMode::NonRecursive)?;
        }
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut site = site.clone();
    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                // Debounce: editors often emit several events per save
                if last_rebuild.elapsed() <= Duration::from_millis(500) {
                    continue;
                }

                if event.paths.iter().any(|p| p.ends_with(CONFIG_FILE)) {
                    match Site::new(&site.base_dir) {
                        Ok(reloaded) => site = reloaded,
                        Err(e) => {
                            tracing::error!("Failed to reload config: {:#}", e);
                            last_rebuild = Instant::now();
                            continue;
                        }
                    }
                }

                tracing::info!("File changed, rebuilding...");
                if let Err(e) = run(&site) {
                    tracing::error!("Build failed: {:#}", e);
                }
                last_rebuild = Instant::now();
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
