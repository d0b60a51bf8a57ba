//! Zeitbasierte Translations- und Rotations-Animationen mit Easing.
//!
//! Animationen speichern ihre Endpunkte geodätisch und werden bei jedem
//! Sample über den aktuellen [`GeoFrame`] projiziert. Ein Ursprungswechsel
//! während einer laufenden Animation verschiebt daher nichts.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::geo_frame::GeoFrame;
use super::lat_lng::LatLngAlt;

/// Abbildung normierte Zeit [0, 1] → Fortschritt [0, 1].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Eigene Funktion; nicht serialisierbar
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Wertet die Easing-Funktion für `t` aus (`t` wird auf [0, 1] begrenzt).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
            Easing::Custom(f) => f(t),
        }
    }
}

/// Fortschritt einer Animation mit fester Dauer.
#[derive(Debug, Clone, Copy)]
struct AnimationClock {
    duration: f32,
    elapsed: f32,
}

impl AnimationClock {
    fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }
}

/// Translation zwischen zwei geodätischen Positionen.
#[derive(Debug, Clone)]
pub struct TranslationAnimation {
    from: LatLngAlt,
    to: LatLngAlt,
    easing: Easing,
    clock: AnimationClock,
}

impl TranslationAnimation {
    /// Startet eine Translation über `duration` Sekunden.
    pub fn new(from: LatLngAlt, to: LatLngAlt, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            easing,
            clock: AnimationClock::new(duration),
        }
    }

    /// Schreitet um `dt` Sekunden voran.
    pub fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    /// `true`, sobald die volle Dauer verstrichen ist.
    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    /// Zielposition.
    pub fn target(&self) -> LatLngAlt {
        self.to
    }

    /// Gesamtdauer in Sekunden.
    pub fn duration(&self) -> f32 {
        self.clock.duration
    }

    /// Aktuelle Render-Position. Nach Ablauf exakt die Zielposition.
    pub fn sample(&self, frame: &GeoFrame) -> Vec3 {
        let target = frame.project(self.to);
        if self.is_finished() {
            return target;
        }
        let start = frame.project(self.from);
        start.lerp(target, self.easing.apply(self.clock.progress()))
    }
}

/// Rotation zwischen zwei Orientierungen (Slerp).
#[derive(Debug, Clone)]
pub struct RotationAnimation {
    from: Quat,
    to: Quat,
    easing: Easing,
    clock: AnimationClock,
}

impl RotationAnimation {
    /// Startet eine Rotation über `duration` Sekunden.
    pub fn new(from: Quat, to: Quat, duration: f32, easing: Easing) -> Self {
        Self {
            from: from.normalize(),
            to: to.normalize(),
            easing,
            clock: AnimationClock::new(duration),
        }
    }

    /// Schreitet um `dt` Sekunden voran.
    pub fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    /// Aktuelle Orientierung. Nach Ablauf exakt die Zielorientierung.
    pub fn sample(&self) -> Quat {
        if self.is_finished() {
            return self.to;
        }
        self.from
            .slerp(self.to, self.easing.apply(self.clock.progress()))
    }
}
