//! Style variant enrichment.
//!
//! Descriptors name presentation variants (`cardStyle`, `titleStyle`,
//! `contentStyle`). Enrichment turns those names into concrete class lists and
//! inline style fragments from a fixed table. Card variants land on the node
//! itself; title and content variants land on the `title` and `content` parts.
//!
//! Unknown variant names fall back to the slot's `default` bundle. Enrichment
//! is idempotent: classes are never duplicated and author styles always win.

use std::collections::BTreeMap;
use survey_dash_schema::ComponentDescriptor;
use tracing::debug;

pub const TITLE_PART: &str = "title";
pub const CONTENT_PART: &str = "content";

/// Concrete presentation attributes of one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleBundle {
    pub classes: &'static [&'static str],
    pub styles: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSlot {
    Card,
    Title,
    Content,
}

const DEFAULT_VARIANT: &str = "default";

static CARD_VARIANTS: &[(&str, StyleBundle)] = &[
    (
        DEFAULT_VARIANT,
        StyleBundle {
            classes: &["card"],
            styles: &[],
        },
    ),
    (
        "highlight",
        StyleBundle {
            classes: &["card", "card--highlight"],
            styles: &[("border-left", "4px solid var(--accent)")],
        },
    ),
    (
        "outlined",
        StyleBundle {
            classes: &["card", "card--outlined"],
            styles: &[("border", "1px solid var(--border)")],
        },
    ),
    (
        "muted",
        StyleBundle {
            classes: &["card", "card--muted"],
            styles: &[("background", "var(--surface-muted)")],
        },
    ),
    (
        "flat",
        StyleBundle {
            classes: &["card", "card--flat"],
            styles: &[("box-shadow", "none")],
        },
    ),
];

static TITLE_VARIANTS: &[(&str, StyleBundle)] = &[
    (
        DEFAULT_VARIANT,
        StyleBundle {
            classes: &["card-title"],
            styles: &[],
        },
    ),
    (
        "section",
        StyleBundle {
            classes: &["section-title"],
            styles: &[("font-size", "1.5rem"), ("font-weight", "700")],
        },
    ),
    (
        "subsection",
        StyleBundle {
            classes: &["subsection-title"],
            styles: &[("font-size", "1.25rem")],
        },
    ),
    (
        "eyebrow",
        StyleBundle {
            classes: &["eyebrow"],
            styles: &[("text-transform", "uppercase"), ("letter-spacing", "0.08em")],
        },
    ),
];

static CONTENT_VARIANTS: &[(&str, StyleBundle)] = &[
    (
        DEFAULT_VARIANT,
        StyleBundle {
            classes: &["content"],
            styles: &[],
        },
    ),
    (
        "lead",
        StyleBundle {
            classes: &["content", "content--lead"],
            styles: &[("font-size", "1.125rem")],
        },
    ),
    (
        "muted",
        StyleBundle {
            classes: &["content", "content--muted"],
            styles: &[("color", "var(--text-muted)")],
        },
    ),
    (
        "small",
        StyleBundle {
            classes: &["content", "content--small"],
            styles: &[("font-size", "0.875rem")],
        },
    ),
    (
        "quote",
        StyleBundle {
            classes: &["content", "content--quote"],
            styles: &[("font-style", "italic")],
        },
    ),
];

impl VariantSlot {
    fn table(self) -> &'static [(&'static str, StyleBundle)] {
        match self {
            VariantSlot::Card => CARD_VARIANTS,
            VariantSlot::Title => TITLE_VARIANTS,
            VariantSlot::Content => CONTENT_VARIANTS,
        }
    }

    /// Variant names known for this slot
    pub fn variant_names(self) -> Vec<&'static str> {
        self.table().iter().map(|(name, _)| *name).collect()
    }
}

/// Bundle for `name` in `slot`, or the slot's default bundle
pub fn lookup(slot: VariantSlot, name: &str) -> &'static StyleBundle {
    let table = slot.table();
    if let Some((_, bundle)) = table.iter().find(|(n, _)| *n == name) {
        return bundle;
    }
    debug!(?slot, variant = name, "Unknown style variant, using default");
    // Every table starts with its default entry
    &table[0].1
}

/// Return a copy of `descriptor` with variant attributes applied, recursively
pub fn enrich(descriptor: &ComponentDescriptor) -> ComponentDescriptor {
    let mut enriched = descriptor.clone();
    enrich_in_place(&mut enriched);
    enriched
}

fn enrich_in_place(node: &mut ComponentDescriptor) {
    if let Some(name) = node.card_style.clone() {
        let bundle = lookup(VariantSlot::Card, &name);
        let mut classes: Vec<String> = Vec::new();
        push_unique(&mut classes, bundle.classes.iter().map(|c| c.to_string()));
        push_unique(&mut classes, node.classes());
        node.class_name = Some(classes.join(" "));
        merge_styles(&mut node.style, bundle);
    }
    if let Some(name) = node.title_style.clone() {
        apply_part(node, TITLE_PART, lookup(VariantSlot::Title, &name));
    }
    if let Some(name) = node.content_style.clone() {
        apply_part(node, CONTENT_PART, lookup(VariantSlot::Content, &name));
    }
    for child in &mut node.components {
        enrich_in_place(child);
    }
}

fn apply_part(node: &mut ComponentDescriptor, part: &str, bundle: &StyleBundle) {
    let classes = node.part_classes.entry(part.to_string()).or_default();
    push_unique(classes, bundle.classes.iter().map(|c| c.to_string()));
    let styles = node.part_styles.entry(part.to_string()).or_default();
    merge_styles(styles, bundle);
}

fn push_unique(target: &mut Vec<String>, classes: impl IntoIterator<Item = String>) {
    for class in classes {
        if !target.contains(&class) {
            target.push(class);
        }
    }
}

fn merge_styles(target: &mut BTreeMap<String, String>, bundle: &StyleBundle) {
    for (key, value) in bundle.styles {
        target
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
}
