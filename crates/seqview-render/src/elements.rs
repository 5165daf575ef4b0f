//! Registry of interactive elements. Renderers report every element they
//! draw; the viewer mounts them here so that a pointer event on an element id
//! resolves back to a sequence range.

use seqview_engine::CircularFrame;
use seqview_protocol::{Range, ViewMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Bases of the sequence; clicks resolve to a position inside it.
    Seq,
    Annotation,
    CutSite,
    Find,
    Highlight,
    Translation,
}

/// Where an element sits on screen, as needed to turn a pointer position
/// into a sequence index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementGeometry {
    /// Horizontal extent of a linear-view element, in SVG units.
    Linear { left: f64, width: f64 },
    Circular(CircularFrame),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementMeta {
    pub kind: ElementKind,
    pub range: Range,
    pub viewer: ViewMode,
    pub geometry: ElementGeometry,
}

impl ElementMeta {
    pub fn new(kind: ElementKind, range: Range, viewer: ViewMode) -> Self {
        Self {
            kind,
            range,
            viewer,
            geometry: ElementGeometry::None,
        }
    }

    pub fn with_geometry(mut self, geometry: ElementGeometry) -> Self {
        self.geometry = geometry;
        self
    }
}

/// An element produced by a render pass, ready to be mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedElement {
    pub id: String,
    pub meta: ElementMeta,
}

#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    elements: HashMap<String, ElementMeta>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `meta` under `id`, returning what was registered before.
    pub fn register(&mut self, id: impl Into<String>, meta: ElementMeta) -> Option<ElementMeta> {
        self.elements.insert(id.into(), meta)
    }

    pub fn unregister(&mut self, id: &str) -> Option<ElementMeta> {
        self.elements.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&ElementMeta> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn mount(&mut self, elements: &[MountedElement]) {
        for element in elements {
            self.register(element.id.clone(), element.meta.clone());
        }
    }

    pub fn unmount(&mut self, elements: &[MountedElement]) {
        for element in elements {
            self.unregister(&element.id);
        }
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_unregister() {
        let mut registry = ElementRegistry::new();
        let meta = ElementMeta::new(ElementKind::Annotation, Range::new(30, 395), ViewMode::Linear);
        assert!(registry.register("lacZ@block-0", meta.clone()).is_none());
        assert_eq!(registry.get("lacZ@block-0"), Some(&meta));
        assert_eq!(registry.unregister("lacZ@block-0"), Some(meta));
        assert!(registry.is_empty());
    }

    #[test]
    fn unmount_only_removes_its_own_elements() {
        let mut registry = ElementRegistry::new();
        let first = vec![MountedElement {
            id: "block-0".to_string(),
            meta: ElementMeta::new(ElementKind::Seq, Range::new(0, 100), ViewMode::Linear),
        }];
        let second = vec![MountedElement {
            id: "block-1".to_string(),
            meta: ElementMeta::new(ElementKind::Seq, Range::new(100, 200), ViewMode::Linear),
        }];
        registry.mount(&first);
        registry.mount(&second);
        registry.unmount(&first);
        assert!(!registry.contains("block-0"));
        assert!(registry.contains("block-1"));
        assert_eq!(registry.len(), 1);
    }
}
