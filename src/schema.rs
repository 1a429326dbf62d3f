// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{ensure, Result, VboError};
use std::collections::HashMap;


/// Columns which have to be at fixed positions in every file.
const FIXED_COLUMNS: [(usize, &str); 3] = [(1, "time"), (2, "lat"), (3, "long")];

/// Names of the fields each record gets in addition to the ones in the file,
/// in the order they are appended.
pub const DERIVED_COLUMNS: [&str; 5] =
  ["time_of_day", "datetime", "timestamp", "lat_deg", "long_deg"];


/// Ordered column names of a VBO file plus the derived ones.
///
/// Built once from the `[column names]` section. Positions of the raw columns
/// match the positions of the values on each data line; the derived columns
/// follow after the last raw one.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSchema {
  names:   Vec<String>,
  raw_len: usize,
  index:   HashMap<String, usize>,
}

impl ColumnSchema {
  /// Builds the schema from the column names line. Hyphens are replaced by
  /// underscores, so `lat-acc` becomes `lat_acc`.
  pub fn from_line(line: &str) -> Result<Self> {
    Self::new(line.split_whitespace()
                  .map(|name| name.replace('-', "_"))
                  .collect())
  }

  pub fn new(raw_names: Vec<String>) -> Result<Self> {
    for &(position, expected) in FIXED_COLUMNS.iter() {
      let found = raw_names.get(position);
      ensure!(found.map(String::as_str) == Some(expected),
              VboError::SchemaInvariant { position,
                                          expected,
                                          found: found.cloned() });
    }

    let raw_len = raw_names.len();
    let mut names = raw_names;
    names.extend(DERIVED_COLUMNS.iter().map(|name| name.to_string()));

    let mut index = HashMap::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
      ensure!(index.insert(name.clone(), idx).is_none(),
              VboError::DuplicateColumn(name.clone()));
    }

    Ok(Self { names,
              raw_len,
              index })
  }

  /// All column names, raw ones first, derived ones last.
  pub fn names(&self) -> &[String] {
    &self.names
  }

  /// Names of the columns present in the file.
  pub fn raw_names(&self) -> &[String] {
    &self.names[..self.raw_len]
  }

  /// Number of columns present in the file.
  pub fn raw_len(&self) -> usize {
    self.raw_len
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// Position of the column with name `name`, if there is one.
  pub fn position(&self, name: &str) -> Option<usize> {
    self.index.get(name).copied()
  }

  /// Same as `position`, but fails for unknown names.
  pub fn require(&self, name: &str) -> Result<usize> {
    self.position(name)
        .ok_or_else(|| VboError::MissingColumn(name.to_string()))
  }

  pub fn time_idx(&self) -> usize {
    FIXED_COLUMNS[0].0
  }

  pub fn lat_idx(&self) -> usize {
    FIXED_COLUMNS[1].0
  }

  pub fn long_idx(&self) -> usize {
    FIXED_COLUMNS[2].0
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  const COLUMN_NAMES: &str =
    "sats time lat long velocity heading height vert-vel PedalPos_CH";

  #[test]
  fn from_line_test() {
    let schema = ColumnSchema::from_line(COLUMN_NAMES).unwrap();

    assert_eq!(9, schema.raw_len());
    assert_eq!(14, schema.len());
    assert_eq!(vec!["sats", "time", "lat", "long", "velocity", "heading",
                    "height", "vert_vel", "PedalPos_CH", "time_of_day",
                    "datetime", "timestamp", "lat_deg", "long_deg"],
               schema.names());
    assert_eq!("vert_vel", &schema.raw_names()[7]);

    assert_eq!(Some(4), schema.position("velocity"));
    assert_eq!(Some(7), schema.position("vert_vel"));
    assert_eq!(None, schema.position("vert-vel"));
    assert_eq!(Some(13), schema.position("long_deg"));
    assert_eq!((1, 2, 3),
               (schema.time_idx(), schema.lat_idx(), schema.long_idx()));

    assert_eq!(Err(VboError::MissingColumn("rpm".to_string())),
               schema.require("rpm"));
  }

  #[test]
  fn schema_invariant_test() {
    // `speed` where `sats` belongs pushes everything one to the right
    assert_eq!(Err(VboError::SchemaInvariant { position: 1,
                                               expected: "time",
                                               found:    Some("lat".to_string()), }),
               ColumnSchema::from_line("speed lat long time"));

    assert_eq!(Err(VboError::SchemaInvariant { position: 2,
                                               expected: "lat",
                                               found:    Some("long".to_string()), }),
               ColumnSchema::from_line("sats time long lat"));

    assert_eq!(Err(VboError::SchemaInvariant { position: 3,
                                               expected: "long",
                                               found:    None, }),
               ColumnSchema::from_line("sats time lat"));

    assert!(ColumnSchema::from_line("").is_err());

    // only positions 1 to 3 are fixed, whatever comes first is fine
    assert!(ColumnSchema::from_line("speed time lat long").is_ok());
  }

  #[test]
  fn duplicate_column_test() {
    assert_eq!(Err(VboError::DuplicateColumn("velocity".to_string())),
               ColumnSchema::from_line("sats time lat long velocity velocity"));

    // derived names are taken
    assert_eq!(Err(VboError::DuplicateColumn("lat_deg".to_string())),
               ColumnSchema::from_line("sats time lat long lat-deg"));
  }
}
