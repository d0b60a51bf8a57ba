//! Registry aller aktiven POIs einer Szene.

use indexmap::IndexMap;

use super::poi::Poi;

/// Schlüssel eines POI in der Registry.
///
/// Anonyme POIs (leerer `sid`) erhalten einen internen, fortlaufenden
/// Schlüssel und sind von außen nicht per ID adressierbar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PoiKey {
    Named(String),
    Anonymous(u64),
}

impl PoiKey {
    /// ID für die öffentliche Schnittstelle (leer bei anonymen POIs).
    pub fn sid(&self) -> &str {
        match self {
            PoiKey::Named(sid) => sid,
            PoiKey::Anonymous(_) => "",
        }
    }
}

/// Besitzt alle POIs einer Szene, indexiert nach `sid`.
///
/// Iteration erfolgt in Einfüge-Reihenfolge (auch nach Entfernen).
#[derive(Debug, Clone, Default)]
pub struct PoiRegistry {
    pois: IndexMap<PoiKey, Poi>,
    next_anonymous: u64,
}

impl PoiRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Übernimmt den POI. Schlägt ohne Zustandsänderung fehl, wenn der
    /// (nicht leere) `sid` bereits vergeben ist.
    pub fn add_poi(&mut self, poi: Poi) -> bool {
        self.insert(poi).is_some()
    }

    /// Wie [`Self::add_poi`], liefert aber den vergebenen Schlüssel.
    pub fn insert(&mut self, poi: Poi) -> Option<PoiKey> {
        let key = if poi.sid().is_empty() {
            let key = PoiKey::Anonymous(self.next_anonymous);
            self.next_anonymous += 1;
            key
        } else {
            let key = PoiKey::Named(poi.sid().to_owned());
            if self.pois.contains_key(&key) {
                log::debug!("POI '{}' existiert bereits", poi.sid());
                return None;
            }
            key
        };
        self.pois.insert(key.clone(), poi);
        Some(key)
    }

    /// Entfernt (und zerstört) den POI mit dem gegebenen `sid`.
    pub fn remove_poi(&mut self, sid: &str) -> bool {
        self.take_poi(sid).is_some()
    }

    /// Entfernt den POI und gibt ihn an den Aufrufer zurück.
    pub fn take_poi(&mut self, sid: &str) -> Option<Poi> {
        if sid.is_empty() {
            return None;
        }
        self.pois.shift_remove(&PoiKey::Named(sid.to_owned()))
    }

    /// Entfernt alle POIs.
    pub fn remove_all_pois(&mut self) {
        let count = self.pois.len();
        self.pois.clear();
        if count > 0 {
            log::debug!("{} POIs entfernt", count);
        }
    }

    pub fn has_poi(&self, sid: &str) -> bool {
        !sid.is_empty() && self.pois.contains_key(&PoiKey::Named(sid.to_owned()))
    }

    pub fn get_poi(&self, sid: &str) -> Option<&Poi> {
        if sid.is_empty() {
            return None;
        }
        self.pois.get(&PoiKey::Named(sid.to_owned()))
    }

    pub fn get_poi_mut(&mut self, sid: &str) -> Option<&mut Poi> {
        if sid.is_empty() {
            return None;
        }
        self.pois.get_mut(&PoiKey::Named(sid.to_owned()))
    }

    /// Zugriff über den internen Schlüssel (auch für anonyme POIs).
    pub fn get_by_key(&self, key: &PoiKey) -> Option<&Poi> {
        self.pois.get(key)
    }

    pub fn get_by_key_mut(&mut self, key: &PoiKey) -> Option<&mut Poi> {
        self.pois.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    /// Iterator in Einfüge-Reihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = (&PoiKey, &Poi)> {
        self.pois.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PoiKey, &mut Poi)> {
        self.pois.iter_mut()
    }

    /// Alle adressierbaren IDs in Einfüge-Reihenfolge.
    pub fn sids(&self) -> impl Iterator<Item = &str> {
        self.pois.keys().filter_map(|key| match key {
            PoiKey::Named(sid) => Some(sid.as_str()),
            PoiKey::Anonymous(_) => None,
        })
    }
}
