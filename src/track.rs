// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::Dataset;


/// Anything which is an ordered sequence of positions, one per row.
///
/// Implemented by `Dataset` straight from a VBO file as well as by `CsvTable`
/// read back in from a CSV export, so trimming works on both.
pub trait Track {
  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// `(long_deg, lat_deg)` of row `idx`.
  fn position(&self, idx: usize) -> (f64, f64);
}

impl Track for Dataset {
  fn len(&self) -> usize {
    self.records().len()
  }

  fn position(&self, idx: usize) -> (f64, f64) {
    let record = &self.records()[idx];
    (record.long_deg(), record.lat_deg())
  }
}

impl Track for [(f64, f64)] {
  fn len(&self) -> usize {
    <[(f64, f64)]>::len(self)
  }

  fn position(&self, idx: usize) -> (f64, f64) {
    self[idx]
  }
}
