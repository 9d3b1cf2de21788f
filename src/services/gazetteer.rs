// src/services/gazetteer.rs

//! Regency centroid lookup for West Kalimantan.
//!
//! Pure lookup table, no I/O. Region names in the bulletin appear with or
//! without the "Kabupaten"/"Kota" prefix, so lookups normalize both sides.

/// Fallback centroid when a region is unmatched (Pontianak, the provincial
/// capital).
pub const DEFAULT_COORD: (f64, f64) = (-0.02, 109.34);

/// Regency/city center points as (lat, lon).
const KABUPATEN_COORDS: &[(&str, (f64, f64))] = &[
    ("pontianak", (-0.02, 109.34)),
    ("sintang", (0.07, 111.49)),
    ("sekadau", (0.03, 110.95)),
    ("melawi", (-0.34, 111.69)),
    ("kapuas hulu", (0.82, 112.93)),
    ("ketapang", (-1.85, 110.47)),
    ("sambas", (1.34, 109.29)),
    ("singkawang", (0.90, 108.99)),
    ("bengkayang", (0.82, 109.65)),
    ("mempawah", (0.36, 109.17)),
    ("sanggau", (0.12, 110.59)),
    ("landak", (0.45, 109.96)),
    ("kubu raya", (-0.45, 109.52)),
    ("kayong utara", (-1.13, 109.96)),
];

/// Normalize a region name for matching: lower-case and strip the
/// administrative prefix. Shared with the geo-boundary matching rule.
pub fn normalize_region(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    lower
        .strip_prefix("kabupaten ")
        .or_else(|| lower.strip_prefix("kota "))
        .unwrap_or(&lower)
        .trim()
        .to_string()
}

/// Look up the centroid for a region name.
///
/// Case-insensitive exact match first, then substring containment in either
/// direction, falling back to [`DEFAULT_COORD`].
pub fn coords_for(name: &str) -> (f64, f64) {
    let key = normalize_region(name);
    if key.is_empty() {
        return DEFAULT_COORD;
    }

    for (entry, coord) in KABUPATEN_COORDS {
        if *entry == key {
            return *coord;
        }
    }
    for (entry, coord) in KABUPATEN_COORDS {
        if entry.contains(&key) || key.contains(entry) {
            return *coord;
        }
    }
    DEFAULT_COORD
}
