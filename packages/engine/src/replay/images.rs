// packages/engine/src/replay/images.rs
//! Image resolution
//!
//! Decoding framebuffer images is the host's job. The engine only asks
//! whether an identifier resolves, and skips the draw when it does not.

use std::collections::{BTreeSet, HashSet};

/// Resolves image identifiers referenced by events
pub trait ImageProvider {
    fn resolves(&self, id: &str) -> bool;
}

/// Treats every identifier as available
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyImage;

impl ImageProvider for AnyImage {
    fn resolves(&self, _id: &str) -> bool {
        true
    }
}

impl ImageProvider for HashSet<String> {
    fn resolves(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl ImageProvider for BTreeSet<String> {
    fn resolves(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl<P: ImageProvider + ?Sized> ImageProvider for Box<P> {
    fn resolves(&self, id: &str) -> bool {
        (**self).resolves(id)
    }
}

impl<P: ImageProvider + ?Sized> ImageProvider for std::sync::Arc<P> {
    fn resolves(&self, id: &str) -> bool {
        (**self).resolves(id)
    }
}
