//! Zone file loading
//!
//! The zone file is a JSON object mapping zone id to an array of `[x, y]`
//! vertices. Entries are read in document order so a repeated key is
//! reported instead of silently overwriting the earlier polygon.

use crate::domain::types::{Point, ZoneId};
use crate::domain::zones::ZoneRegistry;
use anyhow::Context;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Raw zone entries in document order
struct ZoneEntries(Vec<(ZoneId, Vec<Point>)>);

impl<'de> Deserialize<'de> for ZoneEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ZoneEntriesVisitor;

        impl<'de> Visitor<'de> for ZoneEntriesVisitor {
            type Value = ZoneEntries;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an object mapping zone ids to arrays of [x, y] vertices")
            }

            fn visit_map<A>(self, mut map: A) -> Result<ZoneEntries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, vertices)) = map.next_entry::<String, Vec<[f64; 2]>>()? {
                    let ring = vertices.into_iter().map(|[x, y]| Point::new(x, y)).collect();
                    entries.push((ZoneId(id), ring));
                }
                Ok(ZoneEntries(entries))
            }
        }

        deserializer.deserialize_map(ZoneEntriesVisitor)
    }
}

/// Parse and validate zone JSON
pub fn parse_zones(json: &str) -> anyhow::Result<ZoneRegistry> {
    let ZoneEntries(entries) =
        serde_json::from_str::<ZoneEntries>(json).context("invalid zone JSON")?;

    let registry = ZoneRegistry::from_polygons(entries)?;
    if registry.is_empty() {
        warn!("zone_file_empty");
    }
    Ok(registry)
}

/// Load and validate the zone file at `path`
pub fn load_zones<P: AsRef<Path>>(path: P) -> anyhow::Result<ZoneRegistry> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read zone file {}", path.display()))?;

    let registry = parse_zones(&content)
        .with_context(|| format!("Invalid zone file {}", path.display()))?;

    info!(
        zone_file = %path.display(),
        zones = ?registry.ids().map(ZoneId::as_str).collect::<Vec<_>>(),
        "zones_loaded"
    );
    Ok(registry)
}
