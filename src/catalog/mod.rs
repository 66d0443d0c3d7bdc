/// Immutable deep-sky catalog
use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::CelestialObject;
use crate::errors::{ApiError, ApiResult};

/// (id, name, type, constellation, mag, size arcmin, ra deg, dec deg)
type Row = (&'static str, &'static str, &'static str, &'static str, f64, f64, f64, f64);

const BUILTIN: &[Row] = &[
    // Nebulae
    ("M1", "Crab Nebula", "Supernova Remnant", "Taurus", 8.4, 6.0, 83.6331, 22.0145),
    ("M8", "Lagoon Nebula", "Nebula", "Sagittarius", 6.0, 90.0, 270.9042, -24.3867),
    ("M16", "Eagle Nebula", "Nebula", "Serpens", 6.0, 7.0, 274.7000, -13.7150),
    ("M17", "Omega Nebula", "Nebula", "Sagittarius", 6.0, 11.0, 275.1960, -16.1720),
    ("M20", "Trifid Nebula", "Nebula", "Sagittarius", 6.3, 28.0, 270.6300, -23.0320),
    ("M27", "Dumbbell Nebula", "Planetary Nebula", "Vulpecula", 7.4, 8.0, 299.9010, 22.7210),
    ("M42", "Orion Nebula", "Nebula", "Orion", 4.0, 85.0, 83.8221, -5.3911),
    ("M43", "De Mairan's Nebula", "Nebula", "Orion", 9.0, 20.0, 84.0720, -5.2750),
    ("M57", "Ring Nebula", "Planetary Nebula", "Lyra", 8.8, 1.4, 283.3960, 33.0290),
    ("M78", "Casper the Ghost", "Reflection Nebula", "Orion", 8.3, 8.0, 86.6830, 0.0770),
    ("M97", "Owl Nebula", "Planetary Nebula", "Ursa Major", 9.9, 3.4, 168.7000, 55.0170),
    ("NGC 1499", "California Nebula", "Nebula", "Perseus", 6.0, 145.0, 60.9170, 36.3670),
    ("NGC 2237", "Rosette Nebula", "Nebula", "Monoceros", 9.0, 80.0, 97.9170, 4.9670),
    ("NGC 7000", "North America Nebula", "Nebula", "Cygnus", 4.0, 120.0, 314.7080, 44.3330),
    ("IC 434", "Horsehead Nebula", "Nebula", "Orion", 7.3, 60.0, 85.2500, -2.4670),
    // Galaxies
    ("M31", "Andromeda Galaxy", "Galaxy", "Andromeda", 3.44, 190.0, 10.6846, 41.2692),
    ("M33", "Triangulum Galaxy", "Galaxy", "Triangulum", 5.7, 70.0, 23.4620, 30.6600),
    ("M51", "Whirlpool Galaxy", "Galaxy", "Canes Venatici", 8.4, 11.0, 202.4690, 47.1950),
    ("M63", "Sunflower Galaxy", "Galaxy", "Canes Venatici", 8.6, 12.0, 198.9550, 42.0290),
    ("M81", "Bode's Galaxy", "Galaxy", "Ursa Major", 6.9, 26.0, 148.8880, 69.0650),
    ("M82", "Cigar Galaxy", "Galaxy", "Ursa Major", 8.4, 11.0, 148.9680, 69.6790),
    ("M101", "Pinwheel Galaxy", "Galaxy", "Ursa Major", 7.9, 28.0, 210.8020, 54.3490),
    ("M104", "Sombrero Galaxy", "Galaxy", "Virgo", 8.0, 9.0, 189.9970, -11.6230),
    // Clusters
    ("M13", "Hercules Cluster", "Globular Cluster", "Hercules", 5.8, 20.0, 250.4218, 36.4599),
    ("M3", "M3 Cluster", "Globular Cluster", "Canes Venatici", 6.2, 18.0, 205.5480, 28.3770),
    ("M5", "Rose Cluster", "Globular Cluster", "Serpens", 5.6, 23.0, 229.6380, 2.0810),
    ("M22", "Sagittarius Cluster", "Globular Cluster", "Sagittarius", 5.1, 32.0, 279.1000, -23.9050),
    ("M45", "Pleiades", "Open Cluster", "Taurus", 1.6, 110.0, 56.8500, 24.1167),
    ("M44", "Beehive Cluster", "Open Cluster", "Cancer", 3.7, 95.0, 130.1000, 19.9830),
    ("M6", "Butterfly Cluster", "Open Cluster", "Scorpius", 4.2, 25.0, 265.1000, -32.2200),
    ("M7", "Ptolemy's Cluster", "Open Cluster", "Scorpius", 3.3, 80.0, 268.4630, -34.7920),
    // Other
    ("Double Cluster", "NGC 869/884", "Open Cluster", "Perseus", 3.7, 60.0, 34.7500, 57.1500),
];

/// Read-only list of objects, shared by every request
#[derive(Debug, Clone)]
pub struct Catalog {
    objects: Vec<CelestialObject>,
}

/// Case-insensitive substring filters plus a magnitude window
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogFilter {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub constellation: Option<String>,
    pub mag_min: Option<f64>,
    pub mag_max: Option<f64>,
}

impl CatalogFilter {
    pub fn matches(&self, obj: &CelestialObject) -> bool {
        if let Some(kind) = non_empty(&self.kind) {
            if !contains_ignore_case(&obj.kind, kind) {
                return false;
            }
        }
        if let Some(constellation) = non_empty(&self.constellation) {
            match &obj.constellation {
                Some(c) if contains_ignore_case(c, constellation) => {}
                _ => return false,
            }
        }
        if let Some(min) = self.mag_min {
            if obj.magnitude < min {
                return false;
            }
        }
        if let Some(max) = self.mag_max {
            if obj.magnitude > max {
                return false;
            }
        }
        true
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Catalog {
    /// Validates ids are unique and coordinates are finite and in range
    pub fn new(objects: Vec<CelestialObject>) -> ApiResult<Self> {
        let mut seen = HashSet::new();
        for obj in &objects {
            if !seen.insert(obj.id.as_str()) {
                return Err(ApiError::Catalog(format!("duplicate object id {}", obj.id)));
            }
            if !obj.ra.is_finite() || !(0.0..360.0).contains(&obj.ra) {
                return Err(ApiError::Catalog(format!("{}: ra {} outside [0, 360)", obj.id, obj.ra)));
            }
            if !obj.dec.is_finite() || !(-90.0..=90.0).contains(&obj.dec) {
                return Err(ApiError::Catalog(format!("{}: dec {} outside [-90, 90]", obj.id, obj.dec)));
            }
            if !obj.magnitude.is_finite() {
                return Err(ApiError::Catalog(format!("{}: magnitude is not finite", obj.id)));
            }
        }
        Ok(Self { objects })
    }

    /// The bundled Messier/NGC selection
    pub fn builtin() -> Self {
        let objects = BUILTIN
            .iter()
            .map(|&(id, name, kind, constellation, magnitude, size, ra, dec)| CelestialObject {
                id: id.to_string(),
                name: name.to_string(),
                kind: kind.to_string(),
                constellation: Some(constellation.to_string()),
                magnitude,
                size_arcmin: Some(size),
                ra,
                dec,
            })
            .collect();
        Self { objects }
    }

    /// Load a JSON array of objects
    pub fn from_json_str(json: &str) -> ApiResult<Self> {
        let objects: Vec<CelestialObject> =
            serde_json::from_str(json).map_err(|e| ApiError::Catalog(e.to_string()))?;
        Self::new(objects)
    }

    pub fn from_json_file(path: &Path) -> ApiResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Catalog(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json_str(&json)?;
        info!("Loaded {} objects from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn objects(&self) -> &[CelestialObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CelestialObject> {
        self.objects.iter().find(|o| o.id.eq_ignore_ascii_case(id))
    }

    /// Matching objects in catalog order
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&CelestialObject> {
        self.objects.iter().filter(|o| filter.matches(o)).collect()
    }
}
