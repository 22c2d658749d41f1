//! Rebuild the site whenever the source tree changes

use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{EventKind, RecursiveMode};
use notify_debouncer_full::{DebounceEventResult, DebouncedEvent};

use super::builder::build;
use crate::core::config::SiteConfig;
use crate::core::project::Project;

/// Quiet period before a burst of file events triggers a rebuild
const DEBOUNCE: Duration = Duration::from_millis(300);

/// Whether an event should trigger a rebuild
fn is_relevant(event: &DebouncedEvent) -> bool {
    matches!(
        event.event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Whether a debounced batch calls for a rebuild; errors are logged
fn needs_rebuild(result: &DebounceEventResult) -> bool {
    match result {
        Ok(events) => events.iter().any(is_relevant),
        Err(errors) => {
            for e in errors {
                tracing::warn!("Watch error: {}", e);
            }
            false
        }
    }
}

/// Build once, then rebuild on every change under the source directory.
///
/// Returns only when the watcher shuts down.
pub fn watch(project: &Project, config: &SiteConfig) -> Result<()> {
    run_build(project, config);

    let (tx, rx) = mpsc::channel::<DebounceEventResult>();
    let mut debouncer = notify_debouncer_full::new_debouncer(DEBOUNCE, None, tx)
        .context("Failed to start file watcher")?;
    debouncer
        .watch(&project.src, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", project.src.display()))?;
    tracing::info!("Watching {} for changes...", project.src.display());

    for result in rx {
        if needs_rebuild(&result) {
            tracing::info!("Change detected, rebuilding...");
            run_build(project, config);
        }
    }

    Ok(())
}

fn run_build(project: &Project, config: &SiteConfig) {
    match build(project, config) {
        Ok(report) => tracing::info!("{}", report.summary()),
        Err(e) => tracing::error!("Build failed: {:#}", e),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use notify::Event;

    fn debounced(kind: EventKind) -> DebouncedEvent {
        DebouncedEvent::new(Event::new(kind), Instant::now())
    }

    #[test]
    fn access_events_are_ignored() {
        assert!(is_relevant(&debounced(EventKind::Create(CreateKind::File))));
        assert!(!is_relevant(&debounced(EventKind::Access(AccessKind::Any))));
    }

    #[test]
    fn batch_with_one_change_rebuilds() {
        let batch: DebounceEventResult = Ok(vec![
            debounced(EventKind::Access(AccessKind::Any)),
            debounced(EventKind::Modify(ModifyKind::Any)),
        ]);
        assert!(needs_rebuild(&batch));

        let quiet: DebounceEventResult = Ok(vec![debounced(EventKind::Access(AccessKind::Any))]);
        assert!(!needs_rebuild(&quiet));

        let failed: DebounceEventResult = Err(vec![notify::Error::generic("boom")]);
        assert!(!needs_rebuild(&failed));
    }
}
