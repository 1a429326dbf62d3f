// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{ensure, ColumnSchema, Dataset, Record, Result, VboError};
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::io::Write;


pub const DEFAULT_STRIDE: usize = 10;


#[derive(Debug, Serialize)]
pub struct FeatureCollection<'a> {
  #[serde(rename = "type")]
  kind:     &'static str,
  features: Vec<Feature<'a>>,
}

impl<'a> FeatureCollection<'a> {
  pub fn features(&self) -> &[Feature<'a>] {
    &self.features
  }
}

#[derive(Debug, Serialize)]
pub struct Feature<'a> {
  #[serde(rename = "type")]
  kind:       &'static str,
  geometry:   LineString,
  properties: Properties<'a>,
}

#[derive(Debug, Serialize)]
struct LineString {
  #[serde(rename = "type")]
  kind:        &'static str,
  coordinates: [[f64; 2]; 2],
}

/// All fields of a record, keyed by column name in schema order.
#[derive(Debug)]
struct Properties<'a> {
  schema: &'a ColumnSchema,
  record: &'a Record,
}

impl Serialize for Properties<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.schema.len()))?;
    for (name, field) in self.schema.names().iter().zip(self.record.fields()) {
      map.serialize_entry(name, &field)?;
    }
    map.end()
  }
}


/// Every `stride`-th record of `dataset` as a GeoJSON feature collection of
/// line segments. Each segment carries the fields of the point it starts at.
pub fn to_geojson(dataset: &Dataset, stride: usize) -> Result<FeatureCollection<'_>> {
  ensure!(stride > 0, VboError::InvalidStride);

  let schema = dataset.schema();
  let sampled = dataset.records()
                       .iter()
                       .step_by(stride)
                       .collect::<Vec<_>>();

  let features = sampled.windows(2)
                        .map(|pair| {
                          let (prev, next) = (pair[0], pair[1]);
                          Feature { kind:       "Feature",
                                    geometry:
                                      LineString { kind:        "LineString",
                                                   coordinates: [[prev.long_deg(),
                                                                  prev.lat_deg()],
                                                                 [next.long_deg(),
                                                                  next.lat_deg()]], },
                                    properties: Properties { schema,
                                                             record: prev }, }
                        })
                        .collect();

  Ok(FeatureCollection { kind: "FeatureCollection",
                         features })
}

pub fn write_geojson<W: Write>(dataset: &Dataset,
                               stride: usize,
                               mut writer: W)
                               -> Result<()> {
  serde_json::to_writer_pretty(&mut writer, &to_geojson(dataset, stride)?)?;
  writer.flush()?;
  Ok(())
}
