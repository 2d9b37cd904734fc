//! notify-backed subscription

use crate::error::WatchError;
use crate::spec::{ReloadSignal, WatchSpec, pattern_base};
use notify::event::{CreateKind, ModifyKind};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Live watch; dropping it stops delivery
pub struct ReloadSubscription {
    _watcher: RecommendedWatcher,
    watched: Vec<PathBuf>,
}

impl ReloadSubscription {
    /// Directories being watched
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}

impl std::fmt::Debug for ReloadSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadSubscription")
            .field("watched", &self.watched)
            .finish()
    }
}

/// Content changes count; access and metadata-only events do not
pub fn is_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Create(CreateKind::File | CreateKind::Any) => true,
        _ => false,
    }
}

/// Group pattern bases into directories, recursive if any pattern needs it
fn watch_targets(root: &Path, spec: &WatchSpec) -> Result<BTreeMap<PathBuf, bool>, WatchError> {
    let mut targets = BTreeMap::new();
    for pattern in &spec.patterns {
        glob::Pattern::new(pattern).map_err(|e| WatchError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        let (base, recursive) = pattern_base(pattern);
        let dir = root.join(base);
        if !dir.is_dir() {
            warn!("watch pattern '{}' has no directory at {}", pattern, dir.display());
            continue;
        }
        let entry = targets.entry(dir).or_insert(false);
        *entry |= recursive;
    }
    Ok(targets)
}

/// Watch `spec.patterns` under `root`, calling `on_signal` for every
/// qualifying change
///
/// `on_signal` runs on the watcher's thread.
pub fn subscribe<F>(root: &Path, spec: &WatchSpec, on_signal: F) -> Result<ReloadSubscription, WatchError>
where
    F: Fn(ReloadSignal) + Send + 'static,
{
    let targets = watch_targets(root, spec)?;
    if targets.is_empty() {
        return Err(WatchError::NoTargets);
    }

    let spec_for_events = spec.clone();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
        match event {
            Ok(event) => {
                if !is_change(&event.kind) {
                    return;
                }
                if let Some(path) = event.paths.iter().find(|p| spec_for_events.should_reload(p)) {
                    debug!("change in {}, sending full reload", path.display());
                    on_signal(ReloadSignal::FullReload);
                }
            }
            Err(e) => warn!("file watcher error: {}", e),
        }
    })?;

    let mut watched = Vec::with_capacity(targets.len());
    for (dir, recursive) in targets {
        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&dir, mode)?;
        debug!("watching {} ({:?})", dir.display(), mode);
        watched.push(dir);
    }

    Ok(ReloadSubscription {
        _watcher: watcher,
        watched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, DataChange, MetadataKind, RemoveKind};
    use storefront_testkit::temp_dir_in_workspace;

    #[test]
    fn test_is_change_accepts_content_events() {
        assert!(is_change(&EventKind::Modify(ModifyKind::Data(DataChange::Content))));
        assert!(is_change(&EventKind::Modify(ModifyKind::Any)));
        assert!(is_change(&EventKind::Create(CreateKind::File)));
    }

    #[test]
    fn test_is_change_rejects_other_events() {
        assert!(!is_change(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))));
        assert!(!is_change(&EventKind::Access(AccessKind::Any)));
        assert!(!is_change(&EventKind::Remove(RemoveKind::File)));
        assert!(!is_change(&EventKind::Create(CreateKind::Folder)));
    }

    #[test]
    fn test_watch_targets_merge_shared_directories() {
        let temp = temp_dir_in_workspace();
        std::fs::create_dir_all(temp.path().join("src/sections")).unwrap();
        let spec = WatchSpec::new(
            vec![
                "src/sections/*.liquid".into(),
                "src/sections/*.json".into(),
                "collection.json".into(),
            ],
            vec![".liquid".into()],
        );
        let targets = watch_targets(temp.path(), &spec).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets.get(&temp.path().join("src/sections")), Some(&false));
    }

    #[test]
    fn test_watch_targets_skip_missing_directories() {
        let temp = temp_dir_in_workspace();
        let spec = WatchSpec::new(vec!["nope/*.liquid".into()], vec![".liquid".into()]);
        assert!(watch_targets(temp.path(), &spec).unwrap().is_empty());
        assert!(matches!(
            subscribe(temp.path(), &spec, |_| {}),
            Err(WatchError::NoTargets)
        ));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let temp = temp_dir_in_workspace();
        let spec = WatchSpec::new(vec!["src/[".into()], vec![".liquid".into()]);
        assert!(matches!(
            watch_targets(temp.path(), &spec),
            Err(WatchError::InvalidPattern { .. })
        ));
    }
}
