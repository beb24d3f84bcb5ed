//! Sequential panel illustration with a per-block cache.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, instrument, warn};
use ukiyo_core::{BlockAddress, Illustration, StoryBlock};
use ukiyo_error::UkiyoResult;
use ukiyo_interface::ImageCompleter;

/// Illustrations already produced, keyed by block.
#[derive(Debug, Default)]
pub struct IllustrationCache {
    images: RwLock<BTreeMap<BlockAddress, Illustration>>,
}

impl IllustrationCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `address` already has an image.
    pub async fn contains(&self, address: BlockAddress) -> bool {
        self.images.read().await.contains_key(&address)
    }

    /// Image for `address`, if any.
    pub async fn get(&self, address: BlockAddress) -> Option<Illustration> {
        self.images.read().await.get(&address).cloned()
    }

    /// Store an image, replacing any previous one for the same block.
    pub async fn insert(&self, illustration: Illustration) {
        self.images
            .write()
            .await
            .insert(illustration.address, illustration);
    }

    /// Number of cached images.
    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }

    /// All cached images in block order.
    pub async fn snapshot(&self) -> Vec<Illustration> {
        self.images.read().await.values().cloned().collect()
    }
}

/// One step of an illustration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IllustrationProgress {
    /// Block just handled
    pub address: BlockAddress,
    /// Blocks handled so far, cached ones included
    pub completed: usize,
    /// Blocks in this pass
    pub total: usize,
    /// Whether the image came from the cache
    pub cached: bool,
}

/// Counts for a finished pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IllustrationReport {
    /// Images generated during this pass
    pub rendered: usize,
    /// Blocks skipped because they were cached
    pub reused: usize,
}

/// Illustrates story blocks one at a time.
///
/// Blocks are processed in address order. A block already in the cache is
/// not requested again. The first failure ends the pass; images produced
/// before it stay cached, so a later pass resumes where this one stopped.
#[derive(Clone)]
pub struct Illustrator {
    images: Arc<dyn ImageCompleter>,
    cache: Arc<IllustrationCache>,
}

impl std::fmt::Debug for Illustrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Illustrator").finish_non_exhaustive()
    }
}

impl Illustrator {
    /// Illustrator writing into `cache`.
    pub fn new(images: Arc<dyn ImageCompleter>, cache: Arc<IllustrationCache>) -> Self {
        Self { images, cache }
    }

    /// The cache this illustrator fills.
    pub fn cache(&self) -> &Arc<IllustrationCache> {
        &self.cache
    }

    /// Illustrate every block, skipping cached ones.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub async fn illustrate(
        &self,
        blocks: &[StoryBlock],
        progress: &mpsc::Sender<IllustrationProgress>,
    ) -> UkiyoResult<IllustrationReport> {
        let mut ordered: Vec<&StoryBlock> = blocks.iter().collect();
        ordered.sort_by_key(|block| block.address);

        let total = ordered.len();
        let mut report = IllustrationReport::default();

        for (index, block) in ordered.into_iter().enumerate() {
            let cached = self.cache.contains(block.address).await;
            if cached {
                debug!(address = %block.address, "Already illustrated");
                report.reused += 1;
            } else {
                let data_uri = self
                    .images
                    .complete_image(&block.content)
                    .await
                    .inspect_err(|e| {
                        warn!(
                            address = %block.address,
                            error = %e,
                            "Illustration failed, stopping pass"
                        );
                    })?;
                self.cache
                    .insert(Illustration::new(block.address, data_uri))
                    .await;
                report.rendered += 1;
            }

            let step = IllustrationProgress {
                address: block.address,
                completed: index + 1,
                total,
                cached,
            };
            if progress.send(step).await.is_err() {
                debug!("Illustration progress receiver dropped");
            }
        }

        info!(rendered = report.rendered, reused = report.reused, "Illustration pass finished");
        Ok(report)
    }
}
