//! Lokales Render-Koordinatensystem um einen verschiebbaren geodätischen Ursprung.
//!
//! Erdmodell: Kugel mit mittlerem Erdradius [`EARTH_RADIUS_M`]. Dasselbe Modell
//! wird für Projektion, Hin- und Rückrechnung verwendet, damit
//! `destination_point` und `inverse` exakt zueinander passen.
//!
//! Render-Achsen (rechtshändig, Y oben): `+X` = Osten, `+Y` = Höhe, `-Z` = Norden.

use glam::Vec3;

use super::lat_lng::{normalize_bearing, wrap_longitude, LatLng, LatLngAlt};

/// Mittlerer Erdradius (IUGG) in Metern.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Ergebnis der inversen geodätischen Aufgabe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodesic {
    /// Großkreis-Distanz in Metern
    pub distance_m: f64,
    /// Anfangspeilung in Grad [0, 360), 0 = Norden, im Uhrzeigersinn
    pub initial_bearing_deg: f64,
}

/// Rechnet zwischen geodätischen Koordinaten und Render-Space um.
///
/// Die Projektion ist azimutal-abstandstreu um den Ursprung: Distanz und
/// Peilung vom Ursprung bleiben exakt erhalten. Intern wird in `f64`
/// gerechnet, erst das Ergebnis wird auf `f32` reduziert.
#[derive(Debug, Clone)]
pub struct GeoFrame {
    origin: LatLng,
    anchored: bool,
    generation: u64,
}

impl GeoFrame {
    /// Erstellt einen Frame mit Ursprung (0, 0), noch nicht verankert.
    pub fn new() -> Self {
        Self {
            origin: LatLng::default(),
            anchored: false,
            generation: 0,
        }
    }

    /// Setzt den Ursprung der Render-Welt.
    ///
    /// Jeder Aufruf erhöht die Generation; alle vorher abgeleiteten
    /// Render-Positionen sind danach veraltet.
    pub fn set_origin(&mut self, lat: f64, lon: f64) {
        debug_assert!(
            LatLng::new(lat, lon).is_valid(),
            "Ursprung ausserhalb des gültigen Bereichs: ({lat}, {lon})"
        );
        self.origin = LatLng::new(lat, lon);
        self.anchored = true;
        self.generation += 1;
        log::debug!(
            "Ursprung gesetzt auf ({:.6}, {:.6}), Generation {}",
            lat,
            lon,
            self.generation
        );
    }

    /// Verwirft den Ursprung (Szenenwechsel).
    pub fn reset(&mut self) {
        self.origin = LatLng::default();
        self.anchored = false;
        self.generation += 1;
    }

    /// Aktueller Ursprung.
    pub fn origin(&self) -> LatLng {
        self.origin
    }

    /// `true`, sobald `set_origin` aufgerufen wurde.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Generation des Ursprungs; ändert sich bei jedem Ursprungswechsel.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Projiziert eine geodätische Position in den Render-Space.
    pub fn compute_position(&self, lat: f64, lon: f64, alt: f64) -> Vec3 {
        let geodesic = inverse(self.origin, LatLng::new(lat, lon));
        let (sin_b, cos_b) = geodesic.initial_bearing_deg.to_radians().sin_cos();
        let east = geodesic.distance_m * sin_b;
        let north = geodesic.distance_m * cos_b;
        Vec3::new(east as f32, alt as f32, -north as f32)
    }

    /// Wie [`Self::compute_position`], für einen Koordinatenwert.
    pub fn project(&self, coords: LatLngAlt) -> Vec3 {
        self.compute_position(coords.lat, coords.lon, coords.alt)
    }

    /// Umkehrung von [`Self::compute_position`].
    pub fn compute_coordinates(&self, position: Vec3) -> LatLngAlt {
        let east = position.x as f64;
        let north = -(position.z as f64);
        let distance = east.hypot(north);
        if distance == 0.0 {
            return self.origin.with_alt(position.y as f64);
        }
        let bearing = east.atan2(north).to_degrees();
        destination_from(self.origin, bearing, distance).with_alt(position.y as f64)
    }

    /// Zielpunkt vom Ursprung aus bei gegebener Peilung (Grad) und Distanz (m),
    /// direkt als Render-Position.
    pub fn destination_point(&self, bearing: f64, distance: f64) -> Vec3 {
        let target = destination_from(self.origin, bearing, distance);
        self.compute_position(target.lat, target.lon, 0.0)
    }
}

impl Default for GeoFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Direkte geodätische Aufgabe auf der Kugel.
///
/// `bearing` in Grad (0 = Norden, im Uhrzeigersinn), `distance` in Metern.
/// Die resultierende Länge liegt in [-180, 180).
pub fn destination_from(start: LatLng, bearing: f64, distance: f64) -> LatLng {
    let phi1 = start.lat.to_radians();
    let lambda1 = start.lon.to_radians();
    let theta = normalize_bearing(bearing).to_radians();
    let delta = distance / EARTH_RADIUS_M;

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let (sin_delta, cos_delta) = delta.sin_cos();

    let sin_phi2 = (sin_phi1 * cos_delta + cos_phi1 * sin_delta * theta.cos()).clamp(-1.0, 1.0);
    let phi2 = sin_phi2.asin();
    let y = theta.sin() * sin_delta * cos_phi1;
    let x = cos_delta - sin_phi1 * sin_phi2;
    let lambda2 = lambda1 + y.atan2(x);

    LatLng::new(phi2.to_degrees(), wrap_longitude(lambda2.to_degrees()))
}

/// Inverse geodätische Aufgabe (Haversine + Anfangspeilung) auf der Kugel.
pub fn inverse(from: LatLng, to: LatLng) -> Geodesic {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = wrap_longitude(to.lon - from.lon).to_radians();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let (sin_phi2, cos_phi2) = phi2.sin_cos();

    let a = (d_phi * 0.5).sin().powi(2) + cos_phi1 * cos_phi2 * (d_lambda * 0.5).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    let y = d_lambda.sin() * cos_phi2;
    let x = cos_phi1 * sin_phi2 - sin_phi1 * cos_phi2 * d_lambda.cos();
    let bearing = normalize_bearing(y.atan2(x).to_degrees());

    Geodesic {
        distance_m: EARTH_RADIUS_M * c,
        initial_bearing_deg: bearing,
    }
}
