use super::*;
use std::collections::BTreeMap;

/// The decoded contents of a legacy grid description, as selected by a gamut.
/// Angles are in degrees, distances in metres, and flags are the raw bit
/// fields, checked against their masks.
#[derive(Debug)]
pub struct ParsedParameters {
    pub grid_type: GridType,
    pub natural: BTreeMap<&'static str, usize>,
    pub real: BTreeMap<&'static str, f64>,
    pub flags: BTreeMap<&'static str, i32>,
}

// Accessors
impl ParsedParameters {
    pub fn natural(&self, key: &str) -> Result<usize, Error> {
        if let Some(value) = self.natural.get(key) {
            return Ok(*value);
        }
        Err(missing(self.grid_type, key))
    }
    pub fn real(&self, key: &str) -> Result<f64, Error> {
        if let Some(value) = self.real.get(key) {
            return Ok(*value);
        }
        Err(missing(self.grid_type, key))
    }
    pub fn flags(&self, key: &str) -> Result<i32, Error> {
        if let Some(value) = self.flags.get(key) {
            return Ok(*value);
        }
        Err(missing(self.grid_type, key))
    }
    /// Is (any of) `bit` set in the flag field `key`?
    pub fn bit(&self, key: &str, bit: i32) -> Result<bool, Error> {
        Ok(self.flags(key)? & bit != 0)
    }
}

fn missing(grid_type: GridType, key: &str) -> Error {
    Error::InvalidGridDescription(format!("{grid_type}: parameter '{key}' not in gamut"))
}

impl ParsedParameters {
    pub fn new(
        kgds: &[i32],
        grid_type: GridType,
        gamut: &[GdsParameter],
    ) -> Result<ParsedParameters, Error> {
        let mut natural = BTreeMap::<&'static str, usize>::new();
        let mut real = BTreeMap::<&'static str, f64>::new();
        let mut flags = BTreeMap::<&'static str, i32>::new();

        // Fetch all slots of the gamut, range check, and place them into
        // their proper bins
        for p in gamut {
            let key = p.key();
            let slot = p.slot();
            let Some(&value) = kgds.get(slot - 1) else {
                warn!("{grid_type}: grid description too short for '{key}' (slot {slot})");
                return Err(Error::InvalidGridDescription(format!(
                    "{grid_type}: {} slots given, '{key}' needs slot {slot}",
                    kgds.len()
                )));
            };

            match *p {
                GdsParameter::Count { .. } => {
                    if value < 1 {
                        return Err(bad(grid_type, key, value, "must be positive"));
                    }
                    natural.insert(key, value as usize);
                }

                GdsParameter::Natural { .. } => {
                    if value < 0 {
                        return Err(bad(grid_type, key, value, "must be non-negative"));
                    }
                    natural.insert(key, value as usize);
                }

                GdsParameter::Latitude { .. } => {
                    let lat = angular::millidegrees(value);
                    if lat.abs() > 90. {
                        return Err(bad(grid_type, key, value, "latitude outside [-90, 90]"));
                    }
                    real.insert(key, lat);
                }

                GdsParameter::Longitude { .. } => {
                    let lon = angular::millidegrees(value);
                    if lon.abs() > 360. {
                        return Err(bad(grid_type, key, value, "longitude outside [-360, 360]"));
                    }
                    real.insert(key, angular::normalize_positive(lon));
                }

                GdsParameter::Increment { .. } => {
                    real.insert(key, angular::millidegrees(value));
                }

                GdsParameter::Distance { .. } => {
                    if value < 1 {
                        return Err(bad(grid_type, key, value, "distance must be positive"));
                    }
                    real.insert(key, f64::from(value));
                }

                GdsParameter::Flags { mask, .. } => {
                    if value < 0 || value & !mask != 0 {
                        return Err(bad(grid_type, key, value, "undefined flag bits set"));
                    }
                    flags.insert(key, value);
                }
            };
        }

        Ok(ParsedParameters {
            grid_type,
            natural,
            real,
            flags,
        })
    }
}

fn bad(grid_type: GridType, key: &str, value: i32, reason: &str) -> Error {
    warn!("{grid_type}: rejecting {key}={value}: {reason}");
    Error::InvalidGridDescription(format!("{grid_type}: {key}={value}: {reason}"))
}

// ----- T E S T S ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const GAMUT: [GdsParameter; 7] = [
        GdsParameter::Count     { key: "im",    slot: 2 },
        GdsParameter::Natural   { key: "n",     slot: 3 },
        GdsParameter::Latitude  { key: "lat_1", slot: 4 },
        GdsParameter::Longitude { key: "lon_1", slot: 5 },
        GdsParameter::Increment { key: "dlat",  slot: 6 },
        GdsParameter::Distance  { key: "dx",    slot: 7 },
        GdsParameter::Flags     { key: "scan",  slot: 8, mask: SCAN_MASK },
    ];

    #[test]
    fn basic() -> Result<(), Error> {
        let kgds = [0, 10, 0, -7446, -144139, -500, 12000, 64];
        let p = ParsedParameters::new(&kgds, GridType::EquidistantCylindrical, &GAMUT)?;

        assert_eq!(p.natural("im")?, 10);
        assert_eq!(p.natural("n")?, 0);
        assert_eq!(p.real("lat_1")?, -7.446);
        assert_eq!(p.real("lon_1")?, angular::normalize_positive(-144.139));
        assert_eq!(p.real("dlat")?, -0.5);
        assert_eq!(p.real("dx")?, 12000.);
        assert_eq!(p.flags("scan")?, 64);
        assert!(p.bit("scan", SCAN_POSITIVE_J)?);
        assert!(!p.bit("scan", SCAN_NEGATIVE_I)?);

        // Not in the gamut
        assert!(p.real("lat_2").is_err());
        Ok(())
    }

    #[test]
    fn rejections() {
        let t = GridType::EquidistantCylindrical;
        let good = [0, 10, 0, -7446, -144139, -500, 12000, 64];

        // Too short
        assert!(ParsedParameters::new(&good[..7], t, &GAMUT).is_err());

        let cases = [
            (1, 0),         // im not positive
            (2, -1),        // negative natural
            (3, 90001),     // latitude beyond the pole
            (4, -360001),   // longitude beyond a full turn
            (6, 0),         // zero distance
            (7, 64 | 16),   // undefined scan bit
        ];
        for (index, value) in cases {
            let mut kgds = good;
            kgds[index] = value;
            let err = ParsedParameters::new(&kgds, t, &GAMUT);
            assert!(
                matches!(err, Err(Error::InvalidGridDescription(_))),
                "slot {} = {value} accepted",
                index + 1
            );
        }
    }
}
