//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::content::loader::ContentLoader;
use crate::generator::{GenerateSummary, Generator};
use crate::Blog;

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    run_with_summary(blog).map(|_| ())
}

/// Generate and report what was written
pub fn run_with_summary(blog: &Blog) -> Result<GenerateSummary> {
    let start = Instant::now();

    let entries = ContentLoader::new(blog).load_entries()?;
    tracing::info!("Loaded {} posts", entries.len());

    let summary = Generator::new(blog)?.generate(&entries)?;

    tracing::info!(
        "Generated {} posts and {} assets in {:.2}s",
        summary.posts,
        summary.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Watch content, static files and config, regenerating on change
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    if blog.source_dir.exists() {
        watcher.watch(&blog.source_dir, notify::RecursiveMode::Recursive)?;
    }
    let static_dir = blog.static_dir();
    if static_dir.exists() {
        watcher.watch(&static_dir, notify::RecursiveMode::Recursive)?;
    }
    let config_path = blog.config_path();
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Editors fire bursts of events per save
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = blog.reload().and_then(|fresh| run(&fresh)) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_with_summary() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("a.md"), "---\ntitle: A\ndate: 2023-01-01\n---\nHi\n").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let summary = run_with_summary(&blog).unwrap();
        assert_eq!(summary.posts, 1);
        assert!(blog.public_dir.join("posts/a/index.html").exists());
    }

    #[test]
    fn test_duplicate_slugs_fail_generation() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("a.md"), "---\ntitle: A\nslug: /x\n---\n").unwrap();
        fs::write(posts.join("b.md"), "---\ntitle: B\nslug: /x\n---\n").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert!(run(&blog).is_err());
        assert!(!blog.public_dir.join("index.html").exists());
    }
}
