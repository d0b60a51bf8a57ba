//! Selektionszustand der Szene.

use crate::core::PoiKey;

/// Bildschirmposition und Szenen-Revision des letzten Picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastPick {
    pub screen_x: i32,
    pub screen_y: i32,
    pub revision: u64,
}

/// Auswahlbezogener Szenenzustand.
///
/// Hält nur eine Relation (Schlüssel) auf den selektierten POI, besitzt ihn nicht.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Aktuell selektierter POI
    pub selected: Option<PoiKey>,
    /// Letzter Pick, um unveränderte Wiederholungen zu überspringen
    pub last_pick: Option<LastPick>,
}

impl SelectionState {
    /// `true`, wenn ein Pick an derselben Stelle bei gleicher Revision wiederholt wird.
    pub fn is_repeat(&self, screen_x: i32, screen_y: i32, revision: u64) -> bool {
        self.last_pick
            == Some(LastPick {
                screen_x,
                screen_y,
                revision,
            })
    }

    /// Setzt alles zurück.
    pub fn clear(&mut self) {
        self.selected = None;
        self.last_pick = None;
    }
}
