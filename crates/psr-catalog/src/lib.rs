#![forbid(unsafe_code)]

//! Pulsar catalog collaborator: keyed field lookup and derived accessors.
//!
//! The folding core treats the catalog as an external key-value
//! collaborator: given a pulsar name, it returns a record mapping psrcat
//! field mnemonics (`PSRJ`, `RAJ`, `P0`, `F0`, ...) to their text values,
//! with an explicit "not present" for missing fields. Derived accessors
//! tolerate multiple equivalent source fields, e.g. deriving the spin
//! period from the rotation frequency when no direct period is recorded.
//!
//! How the records get populated is out of scope here; catalogs are built
//! in memory from whatever ingest the caller uses.

use std::collections::BTreeMap;

use psr_runtime::RuntimeMode;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("field {key} has malformed value {value:?}")]
    MalformedField { key: &'static str, value: String },
    #[error("field {key} parsed non-finite, rejected by policy")]
    NonFiniteField { key: &'static str },
    #[error("field {key} required by this accessor is missing")]
    MissingField { key: &'static str },
}

/// One pulsar's catalog entry: an ordered field-name to text-value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PulsarRecord {
    fields: BTreeMap<String, String>,
}

impl PulsarRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Value for `key`, or an explicit `None` when the field is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Field mnemonics present in this record, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// The keyed-lookup contract the search core depends on.
pub trait CatalogSource {
    /// Record for a pulsar name (J2000 or an aliased B1950 form), or
    /// `None` when the catalog does not know the name.
    fn lookup(&self, name: &str) -> Option<&PulsarRecord>;
}

/// Catalog held entirely in memory, with a B1950-to-J2000 alias table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: BTreeMap<String, PulsarRecord>,
    aliases: BTreeMap<String, String>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, jname: impl Into<String>, record: PulsarRecord) {
        self.records.insert(jname.into(), record);
    }

    pub fn add_alias(&mut self, bname: impl Into<String>, jname: impl Into<String>) {
        self.aliases.insert(bname.into(), jname.into());
    }

    /// Canonical J2000 name behind an alias, if one is registered.
    #[must_use]
    pub fn resolve_alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Catalog names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl CatalogSource for InMemoryCatalog {
    fn lookup(&self, name: &str) -> Option<&PulsarRecord> {
        if let Some(record) = self.records.get(name) {
            return Some(record);
        }
        self.resolve_alias(name)
            .and_then(|jname| self.records.get(jname))
    }
}

/// J2000 equatorial position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub ra_hours: f64,
    pub dec_degrees: f64,
}

/// Spin period in milliseconds.
///
/// Prefers the direct `P0` field (seconds); falls back to `1000 / F0` when
/// only the rotation frequency is catalogued. `None` when neither field is
/// present.
pub fn period_ms(record: &PulsarRecord, mode: RuntimeMode) -> CatalogResult<Option<f64>> {
    if let Some(p0) = parse_field(record, "P0", mode)? {
        return Ok(Some(1000.0 * p0));
    }
    match parse_field(record, "F0", mode)? {
        Some(f0) => {
            if f0 == 0.0 {
                return Err(CatalogError::MalformedField {
                    key: "F0",
                    value: String::from("0"),
                });
            }
            Ok(Some(1000.0 / f0))
        }
        None => Ok(None),
    }
}

/// Time rate of change of the period, in s/s.
///
/// Prefers `P1`; otherwise derives `-F1 / F0²` from the frequency fields,
/// and falls back to `0.0` when the derivative is not catalogued at all.
pub fn period_change_rate(record: &PulsarRecord, mode: RuntimeMode) -> CatalogResult<f64> {
    if let Some(p1) = parse_field(record, "P1", mode)? {
        return Ok(p1);
    }
    match (
        parse_field(record, "F0", mode)?,
        parse_field(record, "F1", mode)?,
    ) {
        (Some(f0), Some(f1)) => {
            if f0 == 0.0 {
                return Err(CatalogError::MalformedField {
                    key: "F0",
                    value: String::from("0"),
                });
            }
            Ok(-f0.powi(-2) * f1)
        }
        _ => Ok(0.0),
    }
}

/// J2000 right ascension (hours) and declination (degrees).
///
/// Reads the sexagesimal `RAJ`/`DECJ` fields. Records carrying only
/// ecliptic or galactic coordinates yield `Ok(None)`; converting those
/// frames is out of scope.
pub fn equatorial(record: &PulsarRecord) -> CatalogResult<Option<Equatorial>> {
    let Some(raj) = record.get("RAJ") else {
        return Ok(None);
    };
    let Some(decj) = record.get("DECJ") else {
        return Err(CatalogError::MissingField { key: "DECJ" });
    };
    Ok(Some(Equatorial {
        ra_hours: parse_sexagesimal(raj, "RAJ")?,
        dec_degrees: parse_sexagesimal(decj, "DECJ")?,
    }))
}

fn parse_field(
    record: &PulsarRecord,
    key: &'static str,
    mode: RuntimeMode,
) -> CatalogResult<Option<f64>> {
    let Some(text) = record.get(key) else {
        return Ok(None);
    };
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| CatalogError::MalformedField {
            key,
            value: text.to_string(),
        })?;
    if mode == RuntimeMode::Hardened && !value.is_finite() {
        return Err(CatalogError::NonFiniteField { key });
    }
    Ok(Some(value))
}

/// Parse `hh:mm:ss.s` / `±dd:mm:ss.s` into a float, sign applied to the
/// whole value. Minutes and seconds components may be absent.
fn parse_sexagesimal(text: &str, key: &'static str) -> CatalogResult<f64> {
    let malformed = || CatalogError::MalformedField {
        key,
        value: text.to_string(),
    };

    let trimmed = text.trim();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut value = 0.0;
    let mut scale = 1.0;
    let mut seen = 0usize;
    for part in rest.split(':') {
        if seen == 3 {
            return Err(malformed());
        }
        let component: f64 = part.parse().map_err(|_| malformed())?;
        if component < 0.0 || !component.is_finite() {
            return Err(malformed());
        }
        value += component / scale;
        scale *= 60.0;
        seen += 1;
    }
    if seen == 0 {
        return Err(malformed());
    }
    Ok(sign * value)
}

/// Description of a psrcat field mnemonic.
#[must_use]
pub fn field_help(key: &str) -> Option<&'static str> {
    FIELD_HELP
        .binary_search_by_key(&key, |&(k, _)| k)
        .ok()
        .map(|idx| FIELD_HELP[idx].1)
}

/// Sorted by key for binary search.
const FIELD_HELP: &[(&str, &str)] = &[
    ("A1", "Projected semi-major axis of orbit (lt s)"),
    ("ASSOC", "Names of other objects associated with the pulsar"),
    ("BINARY", "Binary model"),
    ("DECJ", "J2000 declination"),
    ("DIST_DM", "Distance based on the electron density model (kpc)"),
    ("DM", "Dispersion measure (cm^-3 pc)"),
    ("DM1", "First time derivative of dispersion measure (cm^-3 pc yr^-1)"),
    ("ECC", "Eccentricity"),
    ("ELAT", "Ecliptic latitude (degrees)"),
    ("ELONG", "Ecliptic longitude (degrees)"),
    ("F0", "Barycentric rotation frequency (Hz)"),
    ("F1", "Time derivative of barycentric rotation frequency (s^-2)"),
    ("F2", "Second derivative of barycentric rotation frequency (s^-3)"),
    ("OM", "Longitude of periastron (degrees)"),
    ("P0", "Barycentric period of the pulsar (s)"),
    ("P1", "Time derivative of barycentric period (dimensionless)"),
    ("PB", "Binary period of pulsar (days)"),
    ("PEPOCH", "Epoch of period or frequency (MJD)"),
    ("PMA", "Proper motion in right ascension (mas/yr)"),
    ("PMDEC", "Proper motion in declination (mas/yr)"),
    ("POSEPOCH", "Epoch at which the position is measured (MJD)"),
    ("PSRB", "B1950 name"),
    ("PSRJ", "J2000 name"),
    ("RAJ", "J2000 right ascension"),
    ("S1400", "Mean flux density at 1400 MHz (mJy)"),
    ("S400", "Mean flux density at 400 MHz (mJy)"),
    ("S600", "Mean flux density at 600 MHz (mJy)"),
    ("SPINDX", "Measured spectral index"),
    ("SURVEY", "Surveys that detected the pulsar, discovery survey first"),
    ("T0", "Epoch of periastron (MJD)"),
    ("TASC", "Epoch of ascending node (MJD)"),
    ("W10", "Width of pulse at 10% of peak (ms), indicative only"),
    ("W50", "Width of pulse at 50% of peak (ms), indicative only"),
];

#[cfg(test)]
mod tests {
    use psr_runtime::RuntimeMode;

    use super::{
        CatalogError, CatalogSource, InMemoryCatalog, PulsarRecord, equatorial, field_help,
        period_change_rate, period_ms,
    };

    fn crab_record() -> PulsarRecord {
        PulsarRecord::new()
            .with_field("PSRJ", "J0534+2200")
            .with_field("PSRB", "B0531+21")
            .with_field("RAJ", "05:34:31.973")
            .with_field("DECJ", "+22:00:52.06")
            .with_field("P0", "0.0333924123")
            .with_field("P1", "4.204e-13")
            .with_field("DM", "56.791")
            .with_field("S1400", "14")
    }

    fn crab_catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert("J0534+2200", crab_record());
        catalog.add_alias("B0531+21", "J0534+2200");
        catalog
    }

    #[test]
    fn lookup_resolves_jname_and_bname_alias() {
        let catalog = crab_catalog();
        let direct = catalog.lookup("J0534+2200").expect("known pulsar");
        let aliased = catalog.lookup("B0531+21").expect("known alias");
        assert_eq!(direct, aliased);
        assert!(catalog.lookup("J0000+0000").is_none());
    }

    #[test]
    fn get_reports_missing_fields_explicitly() {
        let record = crab_record();
        assert_eq!(record.get("DM"), Some("56.791"));
        assert_eq!(record.get("ELONG"), None);
    }

    #[test]
    fn period_ms_prefers_direct_period_field() {
        let ms = period_ms(&crab_record(), RuntimeMode::Strict)
            .expect("well-formed record")
            .expect("P0 present");
        assert!((ms - 33.3924123).abs() < 1e-9);
    }

    #[test]
    fn period_ms_falls_back_to_rotation_frequency() {
        let record = PulsarRecord::new().with_field("F0", "29.946923");
        let ms = period_ms(&record, RuntimeMode::Strict)
            .expect("well-formed record")
            .expect("F0 present");
        assert!((ms - 1000.0 / 29.946923).abs() < 1e-9);
    }

    #[test]
    fn period_ms_is_none_without_either_field() {
        let record = PulsarRecord::new().with_field("DM", "56.791");
        assert_eq!(period_ms(&record, RuntimeMode::Strict), Ok(None));
    }

    #[test]
    fn period_ms_rejects_malformed_period() {
        let record = PulsarRecord::new().with_field("P0", "not-a-number");
        let err = period_ms(&record, RuntimeMode::Strict).expect_err("malformed P0");
        assert_eq!(
            err,
            CatalogError::MalformedField {
                key: "P0",
                value: String::from("not-a-number"),
            }
        );
    }

    #[test]
    fn period_change_rate_derives_from_frequency_fields() {
        let record = PulsarRecord::new()
            .with_field("F0", "29.946923")
            .with_field("F1", "-3.77535e-10");
        let rate = period_change_rate(&record, RuntimeMode::Strict).expect("well-formed record");
        let expected = 3.77535e-10 / (29.946923f64 * 29.946923);
        assert!((rate - expected).abs() < 1e-18);
    }

    #[test]
    fn period_change_rate_defaults_to_zero_without_derivative() {
        let record = PulsarRecord::new().with_field("F0", "29.946923");
        assert_eq!(period_change_rate(&record, RuntimeMode::Strict), Ok(0.0));
    }

    #[test]
    fn equatorial_parses_sexagesimal_position() {
        let pos = equatorial(&crab_record())
            .expect("well-formed record")
            .expect("position present");
        let expected_ra = 5.0 + 34.0 / 60.0 + 31.973 / 3600.0;
        let expected_dec = 22.0 + 0.0 / 60.0 + 52.06 / 3600.0;
        assert!((pos.ra_hours - expected_ra).abs() < 1e-9);
        assert!((pos.dec_degrees - expected_dec).abs() < 1e-9);
    }

    #[test]
    fn equatorial_applies_declination_sign_to_whole_value() {
        let record = PulsarRecord::new()
            .with_field("RAJ", "12:00:00")
            .with_field("DECJ", "-08:30:00");
        let pos = equatorial(&record)
            .expect("well-formed record")
            .expect("position present");
        assert!((pos.dec_degrees + 8.5).abs() < 1e-12);
    }

    #[test]
    fn equatorial_without_position_fields_is_none() {
        let record = PulsarRecord::new().with_field("P0", "0.5");
        assert_eq!(equatorial(&record), Ok(None));
    }

    #[test]
    fn equatorial_rejects_orphaned_right_ascension() {
        let record = PulsarRecord::new().with_field("RAJ", "12:00:00");
        assert_eq!(
            equatorial(&record).expect_err("DECJ missing"),
            CatalogError::MissingField { key: "DECJ" }
        );
    }

    #[test]
    fn hardened_mode_rejects_non_finite_parse() {
        let record = PulsarRecord::new().with_field("P0", "1e999");
        assert_eq!(
            period_ms(&record, RuntimeMode::Hardened).expect_err("inf under hardened"),
            CatalogError::NonFiniteField { key: "P0" }
        );
        assert!(
            period_ms(&record, RuntimeMode::Strict)
                .expect("strict lets it through")
                .expect("value present")
                .is_infinite()
        );
    }

    #[test]
    fn field_help_describes_known_mnemonics() {
        assert_eq!(field_help("P0"), Some("Barycentric period of the pulsar (s)"));
        assert_eq!(field_help("DM"), Some("Dispersion measure (cm^-3 pc)"));
        assert_eq!(field_help("NOPE"), None);
    }
}
