//! Geodätische Koordinaten (Breite/Länge in Grad, Höhe in Metern).

use serde::{Deserialize, Serialize};

/// Geodätische Position ohne Höhe (z.B. Ursprung der Render-Welt).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    /// Breite in Grad [-90, 90]
    pub lat: f64,
    /// Länge in Grad [-180, 180]
    pub lon: f64,
}

impl LatLng {
    /// Erstellt eine neue Position.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Gibt `true` zurück, wenn Breite und Länge im gültigen Bereich liegen.
    pub fn is_valid(&self) -> bool {
        lat_in_range(self.lat) && self.lon.is_finite() && (-180.0..=180.0).contains(&self.lon)
    }

    /// Ergänzt die Position um eine Höhe.
    pub fn with_alt(self, alt: f64) -> LatLngAlt {
        LatLngAlt::new(self.lat, self.lon, alt)
    }
}

/// Geodätische Position mit Höhe über dem Ellipsoid/der Kugel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLngAlt {
    /// Breite in Grad [-90, 90]
    pub lat: f64,
    /// Länge in Grad [-180, 180]
    pub lon: f64,
    /// Höhe in Metern (fehlend = 0)
    #[serde(default)]
    pub alt: f64,
}

impl LatLngAlt {
    /// Erstellt eine neue Position.
    pub const fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// Gibt `true` zurück, wenn die Position im gültigen Bereich liegt.
    pub fn is_valid(&self) -> bool {
        self.lat_lng().is_valid() && self.alt.is_finite()
    }

    /// Position ohne Höhe.
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

impl From<LatLng> for LatLngAlt {
    fn from(value: LatLng) -> Self {
        value.with_alt(0.0)
    }
}

impl From<[f64; 3]> for LatLngAlt {
    fn from(pos: [f64; 3]) -> Self {
        Self::new(pos[0], pos[1], pos[2])
    }
}

impl std::fmt::Display for LatLngAlt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.1}m)", self.lat, self.lon, self.alt)
    }
}

fn lat_in_range(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

/// Normalisiert eine Länge auf [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}

/// Normalisiert eine Peilung auf [0, 360).
pub fn normalize_bearing(bearing: f64) -> f64 {
    bearing.rem_euclid(360.0)
}
