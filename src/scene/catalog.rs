use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::foundation::core::{Point, Size, Vec2};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::tracking::anchor::OverlayArchetype;

/// Overlay reference shared by catalog entries and layers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    /// Wrap an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OverlayId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for OverlayId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Product category of an overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayCategory {
    /// Prescription frames.
    Glasses,
    /// Sunglasses.
    Sunglasses,
    /// Earrings, drawn in pairs when face-locked.
    Earrings,
    /// Necklaces.
    Necklace,
    /// Rings.
    Ring,
    /// Bracelets and bangles.
    Bracelet,
    /// Watches.
    Watch,
    /// Hats and caps.
    Hat,
    /// Scarves.
    Scarf,
    /// Crowns, tiaras and similar.
    Headpiece,
    /// Gadgets.
    Tech,
}

impl OverlayCategory {
    /// Parse a category name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glasses" => Some(Self::Glasses),
            "sunglasses" => Some(Self::Sunglasses),
            "earrings" | "earring" => Some(Self::Earrings),
            "necklace" | "necklaces" => Some(Self::Necklace),
            "ring" | "rings" => Some(Self::Ring),
            "bracelet" | "bracelets" => Some(Self::Bracelet),
            "watch" | "watches" => Some(Self::Watch),
            "hat" | "hats" => Some(Self::Hat),
            "scarf" | "scarves" => Some(Self::Scarf),
            "headpiece" | "headpieces" => Some(Self::Headpiece),
            "tech" => Some(Self::Tech),
            _ => None,
        }
    }

    /// Face archetype, or `None` for manually placed categories.
    pub fn archetype(self) -> Option<OverlayArchetype> {
        match self {
            Self::Glasses | Self::Sunglasses => Some(OverlayArchetype::Glasses),
            Self::Earrings => Some(OverlayArchetype::Earring),
            Self::Necklace
            | Self::Ring
            | Self::Bracelet
            | Self::Watch
            | Self::Hat
            | Self::Scarf
            | Self::Headpiece
            | Self::Tech => None,
        }
    }
}

/// Where a manually placed overlay is anchored on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorMode {
    /// Surface center; image centered on the anchor.
    #[default]
    Center,
    /// Surface origin; image drawn from its top-left corner.
    TopLeft,
    /// Middle of the bottom edge; image centered on the anchor.
    BottomCenter,
}

impl AnchorMode {
    /// Parse `center`, `top-left` or `bottom-center`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "center" => Some(Self::Center),
            "top-left" => Some(Self::TopLeft),
            "bottom-center" => Some(Self::BottomCenter),
            _ => None,
        }
    }

    /// Anchor point on a surface of the given size.
    pub fn anchor_point(self, surface: Size) -> Point {
        match self {
            Self::Center => Point::new(surface.width / 2.0, surface.height / 2.0),
            Self::TopLeft => Point::ORIGIN,
            Self::BottomCenter => Point::new(surface.width / 2.0, surface.height),
        }
    }

    /// Offset from the anchor to the image's top-left corner, in local units.
    pub fn image_offset(self, image: Size) -> Vec2 {
        match self {
            Self::TopLeft => Vec2::ZERO,
            Self::Center | Self::BottomCenter => Vec2::new(-image.width / 2.0, -image.height / 2.0),
        }
    }
}

/// One catalog entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayDef {
    /// Unique id.
    pub id: OverlayId,
    /// Human-readable name.
    pub display_name: String,
    /// Product category.
    pub category: OverlayCategory,
    /// Image reference resolved by the host's [`crate::AssetFetcher`].
    pub image_source: String,
    /// Manual placement anchor.
    pub anchor_mode: AnchorMode,
    /// Initial layer scale.
    pub default_scale: f64,
}

/// Validated, read-only list of overlay definitions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    defs: Vec<OverlayDef>,
    dropped: usize,
}

impl Catalog {
    /// Build a catalog from already validated definitions. Later duplicates are dropped.
    pub fn new(defs: impl IntoIterator<Item = OverlayDef>) -> Self {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut dropped = 0;
        for def in defs {
            if seen.insert(def.id.clone()) {
                out.push(def);
            } else {
                dropped += 1;
            }
        }
        Self { defs: out, dropped }
    }

    /// Map a raw payload (`{"assets": [...]}`, `{"columns": [...]}` or a bare array).
    ///
    /// Invalid records are dropped with a warning; the payload itself must contain a list.
    pub fn from_value(payload: &Value) -> TryOnResult<Self> {
        let records = match payload {
            Value::Array(a) => a,
            Value::Object(o) => match o.get("assets").or_else(|| o.get("columns")) {
                Some(Value::Array(a)) => a,
                _ => {
                    return Err(TryOnError::validation(
                        "catalog payload has no 'assets' or 'columns' array",
                    ));
                }
            },
            _ => return Err(TryOnError::validation("catalog payload must be an object or array")),
        };

        let mut seen = HashSet::new();
        let mut defs = Vec::with_capacity(records.len());
        let mut dropped = 0usize;
        for (i, rec) in records.iter().enumerate() {
            match map_record(rec) {
                Ok(def) if seen.contains(&def.id) => {
                    warn!(index = i, id = %def.id, "dropping duplicate catalog record");
                    dropped += 1;
                }
                Ok(def) => {
                    seen.insert(def.id.clone());
                    defs.push(def);
                }
                Err(reason) => {
                    warn!(index = i, reason, "dropping invalid catalog record");
                    dropped += 1;
                }
            }
        }
        debug!(accepted = defs.len(), dropped, "catalog mapped");
        Ok(Self { defs, dropped })
    }

    /// Parse and map a catalog from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TryOnResult<Self> {
        let v: Value = serde_json::from_reader(r)
            .map_err(|e| TryOnError::serde(format!("parse catalog JSON: {e}")))?;
        Self::from_value(&v)
    }

    /// Parse and map a catalog from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TryOnResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TryOnError::validation(format!("open catalog JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &OverlayId) -> Option<&OverlayDef> {
        self.defs.iter().find(|d| &d.id == id)
    }

    /// Definitions in payload order.
    pub fn iter(&self) -> impl Iterator<Item = &OverlayDef> {
        self.defs.iter()
    }

    /// Definitions of one category, in payload order.
    pub fn by_category(&self, category: OverlayCategory) -> impl Iterator<Item = &OverlayDef> {
        self.defs.iter().filter(move |d| d.category == category)
    }

    /// Number of accepted definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Return `true` when no definition was accepted.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Number of records dropped during mapping.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

fn str_field<'a>(rec: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| rec.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn map_record(rec: &Value) -> Result<OverlayDef, &'static str> {
    let rec = rec.as_object().ok_or("record is not an object")?;

    let id = match rec.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err("missing id"),
    };
    let image_source = str_field(rec, &["imageUrl", "src", "imageSource"]).ok_or("missing image source")?;
    let category = str_field(rec, &["category"])
        .and_then(OverlayCategory::parse)
        .ok_or("missing or unknown category")?;
    let anchor_mode = match rec.get("anchor").or_else(|| rec.get("anchorMode")) {
        None | Some(Value::Null) => AnchorMode::default(),
        Some(Value::String(s)) => AnchorMode::parse(s).ok_or("unknown anchor mode")?,
        Some(_) => return Err("anchor mode is not a string"),
    };
    let default_scale = match rec.get("defaultScale") {
        None | Some(Value::Null) => 1.0,
        Some(v) => v
            .as_f64()
            .filter(|s| s.is_finite() && *s > 0.0)
            .ok_or("defaultScale must be a positive number")?,
    };
    let display_name = str_field(rec, &["name", "displayName"])
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());

    Ok(OverlayDef {
        id: OverlayId(id),
        display_name,
        category,
        image_source: image_source.to_string(),
        anchor_mode,
        default_scale,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/catalog.rs"]
mod tests;
