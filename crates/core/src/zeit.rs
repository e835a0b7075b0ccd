//! Serverseitige Zeitstempel
//!
//! Jede Nachricht bekommt ihren Zeitstempel vom Server. Die Uhr ist
//! monoton: liefert die Systemzeit einen Wert, der nicht groesser als der
//! zuletzt vergebene ist (gleiche Mikrosekunde, Uhr zurueckgestellt),
//! wird der letzte Wert um eine Mikrosekunde erhoeht.

use std::sync::Mutex;

use chrono::{DateTime, Duration, DurationRound, Utc};

/// Monotone Uhr mit Mikrosekunden-Aufloesung
#[derive(Debug, Default)]
pub struct MonotoneUhr {
    letzter: Mutex<Option<DateTime<Utc>>>,
}

impl MonotoneUhr {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Vergibt den naechsten Zeitstempel
    pub fn jetzt(&self) -> DateTime<Utc> {
        let jetzt = auf_mikros(Utc::now());
        let mut letzter = match self.letzter.lock() {
            Ok(guard) => guard,
            Err(vergiftet) => vergiftet.into_inner(),
        };
        let naechster = match *letzter {
            Some(vorher) if jetzt <= vorher => vorher + Duration::microseconds(1),
            _ => jetzt,
        };
        *letzter = Some(naechster);
        naechster
    }
}

/// Schneidet einen Zeitpunkt auf Mikrosekunden ab (Speicherformat der Datenbank)
pub fn auf_mikros(zeit: DateTime<Utc>) -> DateTime<Utc> {
    zeit.duration_trunc(Duration::microseconds(1)).unwrap_or(zeit)
}
