use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::scene::catalog::OverlayId;

/// Host IO seam: resolves an image reference to its encoded bytes.
pub trait AssetFetcher {
    /// Fetch the encoded bytes for `source`.
    fn fetch(&self, source: &str) -> TryOnResult<Vec<u8>>;
}

/// Reads image references as paths relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetFetcher for FsFetcher {
    fn fetch(&self, source: &str) -> TryOnResult<Vec<u8>> {
        let rel = normalize_rel_path(source)?;
        let path = self.root.join(&rel);
        std::fs::read(&path)
            .map_err(|e| TryOnError::image_load(source, format!("read '{}': {e}", path.display())))
    }
}

/// Normalize a relative reference: backslashes become `/`, empty and `.` segments are dropped.
/// Absolute paths and `..` are rejected.
pub(crate) fn normalize_rel_path(source: &str) -> TryOnResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(TryOnError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(TryOnError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(TryOnError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(TryOnError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Handle for one in-flight image request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    /// Layer the image is for.
    pub slot: OverlayId,
    /// Image reference.
    pub source: String,
    generation: u64,
}

/// Result of completing a ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image is now available for the slot.
    Committed,
    /// A newer request (or a release) superseded the ticket; nothing changed.
    Stale,
    /// The bytes could not be fetched or decoded; the slot draws a placeholder.
    Failed,
}

/// Per-slot load state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Request issued, not yet completed.
    Pending,
    /// Image committed.
    Ready,
    /// Last request failed.
    Failed,
}

#[derive(Clone, Debug)]
struct SlotEntry {
    source: String,
    generation: u64,
    status: LoadStatus,
}

/// Request-keyed image cache.
///
/// Each slot remembers only its latest request; completing an older ticket is a no-op. Decoded
/// images are keyed by source and dropped once no slot references them.
#[derive(Debug, Default)]
pub struct ImageLoader {
    next_generation: u64,
    slots: HashMap<OverlayId, SlotEntry>,
    images: HashMap<String, PreparedImage>,
}

impl ImageLoader {
    /// Empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `source` for `slot`, superseding any earlier request for the slot.
    ///
    /// Returns `None` when the image is already decoded; the slot is ready immediately.
    pub fn request(&mut self, slot: &OverlayId, source: &str) -> Option<LoadTicket> {
        self.next_generation += 1;
        let generation = self.next_generation;
        let status = if self.images.contains_key(source) {
            LoadStatus::Ready
        } else {
            LoadStatus::Pending
        };
        let previous = self.slots.insert(
            slot.clone(),
            SlotEntry {
                source: source.to_string(),
                generation,
                status,
            },
        );
        if let Some(prev) = previous.filter(|p| p.source != source) {
            self.drop_orphan(&prev.source);
        }

        if status == LoadStatus::Ready {
            debug!(slot = %slot, source, "image cache hit");
            return None;
        }
        Some(LoadTicket {
            slot: slot.clone(),
            source: source.to_string(),
            generation,
        })
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.slots
            .get(&ticket.slot)
            .is_some_and(|e| e.generation == ticket.generation && e.source == ticket.source)
    }

    /// Complete a ticket with fetched bytes (or the fetch error).
    pub fn complete(&mut self, ticket: &LoadTicket, bytes: TryOnResult<Vec<u8>>) -> LoadOutcome {
        if !self.is_current(ticket) {
            debug!(slot = %ticket.slot, source = %ticket.source, "discarding stale image load");
            return LoadOutcome::Stale;
        }
        let decoded = bytes.and_then(|b| {
            decode_image(&b).map_err(|e| TryOnError::image_load(&ticket.source, e.to_string()))
        });
        let status = match decoded {
            Ok(img) => {
                info!(
                    slot = %ticket.slot,
                    source = %ticket.source,
                    width = img.width,
                    height = img.height,
                    "image committed"
                );
                self.images.insert(ticket.source.clone(), img);
                LoadStatus::Ready
            }
            Err(e) => {
                warn!(slot = %ticket.slot, source = %ticket.source, error = %e, "image load failed");
                LoadStatus::Failed
            }
        };
        if let Some(entry) = self.slots.get_mut(&ticket.slot) {
            entry.status = status;
        }
        match status {
            LoadStatus::Ready => LoadOutcome::Committed,
            _ => LoadOutcome::Failed,
        }
    }

    /// Fetch and complete a ticket synchronously.
    pub fn fulfill(&mut self, ticket: &LoadTicket, fetcher: &dyn AssetFetcher) -> LoadOutcome {
        if !self.is_current(ticket) {
            return LoadOutcome::Stale;
        }
        let bytes = fetcher.fetch(&ticket.source);
        self.complete(ticket, bytes)
    }

    /// Tickets still waiting for completion.
    pub fn pending(&self) -> Vec<LoadTicket> {
        let mut out: Vec<_> = self
            .slots
            .iter()
            .filter(|(_, e)| e.status == LoadStatus::Pending)
            .map(|(slot, e)| LoadTicket {
                slot: slot.clone(),
                source: e.source.clone(),
                generation: e.generation,
            })
            .collect();
        out.sort_by_key(|t| t.generation);
        out
    }

    /// Forget a slot; in-flight tickets for it become stale.
    pub fn release(&mut self, slot: &OverlayId) {
        if let Some(prev) = self.slots.remove(slot) {
            self.drop_orphan(&prev.source);
        }
    }

    /// Forget every slot and image.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.images.clear();
    }

    fn drop_orphan(&mut self, source: &str) {
        if !self.slots.values().any(|e| e.source == source) && self.images.remove(source).is_some()
        {
            debug!(source, "dropped unreferenced image");
        }
    }

    /// Decoded image for `slot`, when ready.
    pub fn image_for(&self, slot: &OverlayId) -> Option<&PreparedImage> {
        let entry = self.slots.get(slot)?;
        if entry.status != LoadStatus::Ready {
            return None;
        }
        self.images.get(&entry.source)
    }

    /// Load state of `slot`.
    pub fn status(&self, slot: &OverlayId) -> Option<LoadStatus> {
        self.slots.get(slot).map(|e| e.status)
    }

    /// Number of decoded images held.
    pub fn cached_images(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
