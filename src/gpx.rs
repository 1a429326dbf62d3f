// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{ensure, CsvTable, Dataset, Result, VboError};
use chrono::NaiveDateTime;
use getset::{CopyGetters, Getters};
use std::io::Write;


const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";


/// Writes the track of `dataset` as GPX.
pub fn write_gpx<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
  Gpx::from_dataset(dataset)?.write(writer)
}


/// One `<trkpt>`.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct TrackPoint {
  lat:    f64,
  lon:    f64,
  ele:    f64,
  time:   NaiveDateTime,
  course: f64,
  speed:  f64,
  sats:   f64,
}


/// A GPX 1.0 document with a single track segment.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters)]
pub struct Gpx {
  #[getset(get_copy = "pub")]
  time:    NaiveDateTime,
  #[getset(get_copy = "pub")]
  min_lat: f64,
  #[getset(get_copy = "pub")]
  min_lon: f64,
  #[getset(get_copy = "pub")]
  max_lat: f64,
  #[getset(get_copy = "pub")]
  max_lon: f64,
  #[getset(get = "pub")]
  points:  Vec<TrackPoint>,
}

impl Gpx {
  /// Track of a dataset, timed by the file's creation date.
  pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
    let schema = dataset.schema();
    let points =
      dataset.records()
             .iter()
             .map(|record| -> Result<TrackPoint> {
               Ok(TrackPoint { lat:    record.lat_deg(),
                               lon:    record.long_deg(),
                               ele:    record.number(schema, "height")?,
                               time:   record.datetime(),
                               course: record.number(schema, "heading")?,
                               speed:  record.number(schema, "velocity")?,
                               sats:   record.number(schema, "sats")?, })
             })
             .collect::<Result<Vec<_>>>()?;

    let bounds = dataset.bounds();
    Ok(Self { time: dataset.creation_date(),
              min_lat: bounds.min_lat(),
              min_lon: bounds.min_long(),
              max_lat: bounds.max_lat(),
              max_lon: bounds.max_long(),
              points })
  }

  /// Track of a CSV table, timed by its earliest point.
  pub fn from_table(table: &CsvTable) -> Result<Self> {
    ensure!(!table.is_empty(), VboError::EmptyDataset);

    let lats = table.numbers("lat_deg")?;
    let lons = table.numbers("long_deg")?;
    let eles = table.numbers("height")?;
    let times = table.datetimes("datetime")?;
    let courses = table.numbers("heading")?;
    let speeds = table.numbers("velocity")?;
    let sats = table.numbers("sats")?;

    let points = (0..table.len()).map(|idx| TrackPoint { lat:    lats[idx],
                                                         lon:    lons[idx],
                                                         ele:    eles[idx],
                                                         time:   times[idx],
                                                         course: courses[idx],
                                                         speed:  speeds[idx],
                                                         sats:   sats[idx], })
                                 .collect();

    let min = |values: &[f64]| values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = |values: &[f64]| values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let time = times.iter()
                    .min()
                    .cloned()
                    .ok_or(VboError::EmptyDataset)?;

    Ok(Self { time,
              min_lat: min(&lats),
              min_lon: min(&lons),
              max_lat: max(&lats),
              max_lon: max(&lons),
              points })
  }

  pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(writer,
             r#"<gpx
  version="1.0"
  creator="vbox"
  xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
  xmlns="http://www.topografix.com/GPX/1/0"
  xsi:schemaLocation="http://www.topografix.com/GPX/1/0 http://www.topografix.com/GPX/1/0/gpx.xsd">"#)?;
    writeln!(writer, "<time>{}</time>", self.time.format(TIME_FORMAT))?;
    writeln!(writer,
             r#"<bounds minlat="{}" minlon="{}" maxlat="{}" maxlon="{}"/>"#,
             self.min_lat, self.min_lon, self.max_lat, self.max_lon)?;
    writeln!(writer, "<trk>\n  <trkseg>")?;
    for p in &self.points {
      writeln!(writer, r#"    <trkpt lat="{}" lon="{}">"#, p.lat, p.lon)?;
      writeln!(writer, "      <ele>{}</ele>", p.ele)?;
      writeln!(writer, "      <time>{}</time>", p.time.format(TIME_FORMAT))?;
      writeln!(writer, "      <course>{}</course>", p.course)?;
      writeln!(writer, "      <speed>{}</speed>", p.speed)?;
      writeln!(writer, "      <sat>{}</sat>", p.sats)?;
      writeln!(writer, "    </trkpt>")?;
    }
    writeln!(writer, "  </trkseg>\n</trk>\n</gpx>")?;
    writer.flush()?;
    Ok(())
  }
}
