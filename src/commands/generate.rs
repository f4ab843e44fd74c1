//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebouncedEvent};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::{Blog, CONFIG_FILE};

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let posts = ContentLoader::new(blog)?.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    Generator::new(blog).generate(&posts)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Regenerate whenever the content or the configuration changes
///
/// Blocks until the watcher shuts down. `on_rebuilt` runs after every
/// successful regeneration.
pub fn watch<F>(blog: &Blog, mut on_rebuilt: F) -> Result<()>
where
    F: FnMut(),
{
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if blog.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&blog.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", blog.content_dir);
    }

    let config_path = blog.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut blog = blog.clone();
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<&DebouncedEvent> =
                    events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                if changed.iter().any(|e| e.path.ends_with(CONFIG_FILE)) {
                    match Blog::new(&blog.base_dir) {
                        Ok(reloaded) => blog = reloaded,
                        Err(e) => {
                            tracing::error!("Keeping previous configuration: {:#}", e);
                        }
                    }
                }

                match run(&blog) {
                    Ok(()) => on_rebuilt(),
                    Err(e) => tracing::error!("Generation failed: {:#}", e),
                }
            }
            Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
            Err(_) => break,
        }
    }

    Ok(())
}

/// Editor swap files and VCS metadata never trigger a rebuild
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains("/.git")
        && !path_str.ends_with(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("/site/content/posts/a.md")));
        assert!(!is_relevant(Path::new("/site/content/posts/.a.md.swp")));
        assert!(!is_relevant(Path::new("/site/content/posts/a.md~")));
        assert!(!is_relevant(Path::new("/site/.git/index")));
    }
}
