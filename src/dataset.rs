// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{ensure,
            parser::Parser,
            ColumnSchema,
            Record,
            Result,
            TrimRange,
            VboError,
            Warning};
use chrono::NaiveDateTime;
use getset::{CopyGetters, Getters};
use std::{fs::File,
          io::{BufRead, BufReader},
          path::Path};


const VELOCITY: &str = "velocity";


/// What a freshly derived record does to the records collected so far.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
  Append(Record),
  /// Throw away everything collected so far, then append.
  Restart(Record),
}

impl Step {
  pub fn of(record: Record) -> Self {
    if record.is_sentinel() {
      Self::Restart(record)
    } else {
      Self::Append(record)
    }
  }
}

/// Folds one `Step` into `records`.
pub fn accumulate(mut records: Vec<Record>, step: Step) -> Vec<Record> {
  match step {
    Step::Append(record) => {
      records.push(record);
      records
    }
    Step::Restart(record) => {
      if !records.is_empty() {
        log::debug!("time 00:00:00.00 found, discarding {} earlier records",
                    records.len());
      }
      vec![record]
    }
  }
}


/// Extent of the positions and the top speed of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Bounds {
  min_lat:      f64,
  max_lat:      f64,
  min_long:     f64,
  max_long:     f64,
  /// `None` if there is no `velocity` column.
  max_velocity: Option<f64>,
}

impl Bounds {
  /// Computes the bounds of `records`. There are no bounds for no records.
  pub fn of(records: &[Record], schema: &ColumnSchema) -> Result<Self> {
    ensure!(!records.is_empty(), VboError::EmptyDataset);

    let fold_min = |acc: f64, x: f64| acc.min(x);
    let fold_max = |acc: f64, x: f64| acc.max(x);
    let lats = || records.iter().map(Record::lat_deg);
    let longs = || records.iter().map(Record::long_deg);

    let max_velocity = match schema.position(VELOCITY) {
      Some(idx) => Some(records.iter()
                               .map(|record| record.raw()[idx])
                               .fold(f64::NEG_INFINITY, fold_max)),
      None => {
        log::debug!("no '{}' column, no maximum velocity", VELOCITY);
        None
      }
    };

    Ok(Self { min_lat: lats().fold(f64::INFINITY, fold_min),
              max_lat: lats().fold(f64::NEG_INFINITY, fold_max),
              min_long: longs().fold(f64::INFINITY, fold_min),
              max_long: longs().fold(f64::NEG_INFINITY, fold_max),
              max_velocity })
  }
}


/// The contents of a VBO file.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters)]
pub struct Dataset {
  #[getset(get_copy = "pub")]
  creation_date: NaiveDateTime,
  #[getset(get = "pub")]
  headers:       Vec<String>,
  #[getset(get = "pub")]
  comments:      Vec<String>,
  #[getset(get = "pub")]
  schema:        ColumnSchema,
  #[getset(get = "pub")]
  records:       Vec<Record>,
  #[getset(get_copy = "pub")]
  bounds:        Bounds,
  /// Recoverable problems found while reading.
  #[getset(get = "pub")]
  warnings:      Vec<Warning>,
}

// CONSTRUCTION / LOADING ------------------------------------------------- //
impl Dataset {
  pub fn new(creation_date: NaiveDateTime,
             headers: Vec<String>,
             comments: Vec<String>,
             schema: ColumnSchema,
             records: Vec<Record>,
             warnings: Vec<Warning>)
             -> Result<Self> {
    let bounds = Bounds::of(&records, &schema)?;
    Ok(Self { creation_date,
              headers,
              comments,
              schema,
              records,
              bounds,
              warnings })
  }

  /// Load a .vbo file
  ///
  /// # Arguments
  /// - `path`: full path to the file to be loaded, extension `.vbo` in any
  ///   case
  ///
  /// # Returns
  /// a `Dataset` holding every record after the last midnight reset, or the
  /// first fatal error found while reading.
  pub fn load(path: &Path) -> Result<Self> {
    let extension = path.extension()
                        .and_then(|ext| ext.to_str())
                        .unwrap_or_default()
                        .to_ascii_lowercase();

    ensure!(path.exists() && path.is_file(),
            VboError::InvalidPath(format!("{} does not exist or is not a \
                                           file",
                                          path.display())));
    ensure!(extension == "vbo",
            VboError::InvalidPath(format!("only files with extension .vbo \
                                           accepted ({})",
                                          path.display())));

    Self::from_reader(BufReader::new(File::open(path)?))
  }

  /// Reads VBO data line by line from `reader`. Lines need not be valid
  /// UTF-8, invalid bytes are replaced.
  pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
    let mut parser = Parser::new();
    for line in reader.split(b'\n') {
      parser.feed(&String::from_utf8_lossy(&line?))?;
    }
    parser.finish()
  }

  /// Reads VBO data from a string.
  pub fn parse(text: &str) -> Result<Self> {
    let mut parser = Parser::new();
    for line in text.lines() {
      parser.feed(line)?;
    }
    parser.finish()
  }

  // RECORD ACCESS -------------------------------------------------------- //
  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// The values of the column named `name`, record by record.
  pub fn column(&self, name: &str) -> Result<Vec<f64>> {
    self.records
        .iter()
        .map(|record| record.number(&self.schema, name))
        .collect()
  }

  /// A new dataset containing only the records within `range`, with bounds
  /// computed for those.
  pub fn trimmed(&self, range: TrimRange) -> Result<Self> {
    let records = self.records
                      .get(range.as_range())
                      .ok_or(VboError::EmptyDataset)?
                      .to_vec();

    Self::new(self.creation_date,
              self.headers.clone(),
              self.comments.clone(),
              self.schema.clone(),
              records,
              self.warnings.clone())
  }
}
