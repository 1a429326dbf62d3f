// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{ensure, Result, Track, VboError, Warning};
use getset::{CopyGetters, Getters};
use std::{ops::Range, str::FromStr};


/// Earth radius in metres, assuming it's a sphere.
pub const EARTH_RADIUS: f64 = 6_371_000.0;


/// Great circle distance in metres between two points given in degrees.
pub fn haversine(long1: f64, lat1: f64, long2: f64, lat2: f64) -> f64 {
  let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
  let dlat = lat2 - lat1;
  let dlong = (long2 - long1).to_radians();

  let a = (dlat / 2.0).sin().powi(2)
          + lat1.cos() * lat2.cos() * (dlong / 2.0).sin().powi(2);
  2.0 * EARTH_RADIUS * a.sqrt().atan2((1.0 - a).sqrt())
}


// ZONES ------------------------------------------------------------------ //
/// A circle on the map: centre in degrees, radius in metres.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct GeoZone {
  long:   f64,
  lat:    f64,
  radius: f64,
}

impl GeoZone {
  pub fn new(long: f64, lat: f64, radius: f64) -> Result<Self> {
    ensure!(long.is_finite() && (-180.0..=180.0).contains(&long),
            VboError::InvalidZone(format!("longitude {} out of range", long)));
    ensure!(lat.is_finite() && (-90.0..=90.0).contains(&lat),
            VboError::InvalidZone(format!("latitude {} out of range", lat)));
    ensure!(radius.is_finite() && radius > 0.0,
            VboError::InvalidZone(format!("radius {} must be positive",
                                          radius)));

    Ok(Self { long, lat, radius })
  }

  /// Distance in metres from the centre of the zone.
  pub fn distance(&self, long: f64, lat: f64) -> f64 {
    haversine(long, lat, self.long, self.lat)
  }

  /// Distance from the centre for every row of `track` from row `from` on.
  pub fn distances<T: Track + ?Sized>(&self, track: &T, from: usize) -> Vec<f64> {
    (from..track.len()).map(|idx| {
                         let (long, lat) = track.position(idx);
                         self.distance(long, lat)
                       })
                       .collect()
  }
}

/// Parses zones given as `long,lat,radius`, e.g. `-1.5626,52.3838,100`.
impl FromStr for GeoZone {
  type Err = VboError;

  fn from_str(text: &str) -> Result<Self> {
    let invalid = || {
      VboError::InvalidZone(format!("'{}' should be long,lat,radius", text))
    };

    let bits = text.split(',')
                   .map(|bit| bit.trim().parse::<f64>().map_err(|_| invalid()))
                   .collect::<Result<Vec<f64>>>()?;
    ensure!(bits.len() == 3, invalid());

    Self::new(bits[0], bits[1], bits[2])
  }
}


// CROSSINGS -------------------------------------------------------------- //
/// Index of the first row at which the track leaves a zone of `radius`,
/// i.e. the previous row is inside and this one is on the edge or outside.
pub fn departure(distances: &[f64], radius: f64) -> Option<usize> {
  (1..distances.len()).find(|&idx| {
                        distances[idx - 1] < radius && distances[idx] >= radius
                      })
}

/// Index of the first row at which the track enters a zone of `radius`,
/// i.e. the previous row is outside and this one is on the edge or inside.
pub fn arrival(distances: &[f64], radius: f64) -> Option<usize> {
  (1..distances.len()).find(|&idx| {
                        distances[idx - 1] > radius && distances[idx] <= radius
                      })
}


// TRIMMING --------------------------------------------------------------- //
/// Half-open range `[start, end)` of rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct TrimRange {
  start: usize,
  end:   usize,
}

impl TrimRange {
  pub(crate) fn new(start: usize, end: usize) -> Self {
    assert!(start <= end, "range start after range end");
    Self { start, end }
  }

  pub fn len(&self) -> usize {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }

  pub fn as_range(&self) -> Range<usize> {
    self.start..self.end
  }
}


/// Result of trimming: the range to keep and what went wrong on the way.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters)]
pub struct Trim {
  #[getset(get_copy = "pub")]
  range:    TrimRange,
  #[getset(get = "pub")]
  warnings: Vec<Warning>,
}


/// Cuts away what happens before leaving the start zone and after arriving
/// in the end zone, so that journeys between the same places can be
/// compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Trimmer {
  start: Option<GeoZone>,
  end:   Option<GeoZone>,
}

impl Trimmer {
  pub fn new(start: Option<GeoZone>, end: Option<GeoZone>) -> Self {
    Self { start, end }
  }

  /// Find the part of a track between the zones
  ///
  /// # Arguments
  /// - `track`: the positions to trim, a `Dataset`, a `CsvTable` or plain
  ///   `(long, lat)` pairs
  ///
  /// # Returns
  /// a `Trim` whose range starts at the first row outside the start zone
  /// and ends before the first row inside the end zone, searched from the
  /// start onwards. A zone that is not given or never crossed leaves that
  /// end of the track untouched, the latter with a warning.
  pub fn trim<T: Track + ?Sized>(&self, track: &T) -> Trim {
    let mut warnings = Vec::new();

    let start = match self.start {
      Some(zone) => {
        let from_start = zone.distances(track, 0);
        departure(&from_start, zone.radius()).unwrap_or_else(|| {
          log::warn!("{}", Warning::StartZoneNotLeft);
          warnings.push(Warning::StartZoneNotLeft);
          0
        })
      }
      None => 0,
    };

    let end = match self.end {
      Some(zone) => {
        let from_end = zone.distances(track, start);
        match arrival(&from_end, zone.radius()) {
          Some(idx) => start + idx,
          None => {
            log::warn!("{}", Warning::EndZoneNotReached);
            warnings.push(Warning::EndZoneNotReached);
            track.len()
          }
        }
      }
      None => track.len(),
    };

    Trim { range: TrimRange::new(start, end),
           warnings }
  }
}
