// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{ensure, Dataset, Field, Result, Track, TrimRange, VboError};
use chrono::NaiveDateTime;
use getset::Getters;
use std::{fs::File,
          io::{Read, Write},
          path::Path};


pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATETIME_FORMAT_ISO: &str = "%Y-%m-%dT%H:%M:%S";


fn format_field(field: Field) -> String {
  match field {
    Field::Number(value) => value.to_string(),
    Field::DateTime(datetime) => datetime.format(DATETIME_FORMAT).to_string(),
  }
}

/// Writes all records of `dataset` as CSV, with the column names as header.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
  let mut csv = csv::Writer::from_writer(writer);
  csv.write_record(dataset.schema().names())?;
  for record in dataset.records() {
    csv.write_record(record.fields().map(format_field))?;
  }
  csv.flush()?;
  Ok(())
}


/// A CSV export read back in.
///
/// Rows are kept as they are, apart from positions, which are parsed up
/// front so the table can be trimmed like a `Dataset`.
#[derive(Clone, Debug, PartialEq, Getters)]
pub struct CsvTable {
  #[getset(get = "pub")]
  headers:   Vec<String>,
  #[getset(get = "pub")]
  rows:      Vec<Vec<String>>,
  positions: Vec<(f64, f64)>,
}

impl CsvTable {
  pub fn load(path: &Path) -> Result<Self> {
    ensure!(path.is_file(),
            VboError::InvalidPath(format!("{} does not exist or is not a \
                                           file",
                                          path.display())));
    Self::from_reader(File::open(path)?)
  }

  pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?
                     .iter()
                     .map(String::from)
                     .collect::<Vec<_>>();

    let rows = csv.records()
                  .map(|record| -> Result<Vec<String>> {
                    Ok(record?.iter().map(String::from).collect())
                  })
                  .collect::<Result<Vec<Vec<String>>>>()?;

    let mut table = Self { headers,
                           rows,
                           positions: Vec::new() };
    let longs = table.numbers("long_deg")?;
    let lats = table.numbers("lat_deg")?;
    table.positions = longs.into_iter().zip(lats).collect();

    Ok(table)
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Index of the column named `name`.
  pub fn column_idx(&self, name: &str) -> Result<usize> {
    self.headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| VboError::MissingColumn(name.to_string()))
  }

  /// The values of the column named `name`, parsed as numbers.
  pub fn numbers(&self, name: &str) -> Result<Vec<f64>> {
    let idx = self.column_idx(name)?;
    self.rows
        .iter()
        .enumerate()
        .map(|(row_no, row)| {
          let token = row[idx].trim();
          // header is line 1
          token.parse::<f64>()
               .map_err(|_| VboError::InvalidNumber { line:  row_no + 2,
                                                      token: token.to_string() })
        })
        .collect()
  }

  /// The values of the column named `name`, parsed as datetimes. Both the
  /// format written by `write_csv` and ISO 8601 are understood.
  pub fn datetimes(&self, name: &str) -> Result<Vec<NaiveDateTime>> {
    let idx = self.column_idx(name)?;
    self.rows
        .iter()
        .map(|row| {
          let token = row[idx].trim();
          NaiveDateTime::parse_from_str(token, DATETIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(token, DATETIME_FORMAT_ISO))
            .map_err(VboError::from)
        })
        .collect()
  }

  /// A new table containing only the rows within `range`.
  pub fn slice(&self, range: TrimRange) -> Self {
    Self { headers:   self.headers.clone(),
           rows:      self.rows[range.as_range()].to_vec(),
           positions: self.positions[range.as_range()].to_vec(), }
  }

  /// Writes the table back out, header first.
  pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&self.headers)?;
    for row in &self.rows {
      csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
  }
}

impl Track for CsvTable {
  fn len(&self) -> usize {
    self.positions.len()
  }

  fn position(&self, idx: usize) -> (f64, f64) {
    self.positions[idx]
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Trimmer, Warning};
  use pretty_assertions::assert_eq;

  const VBO_PATH: &str = "./testdata/short_journey.vbo";

  fn exported() -> (Dataset, Vec<u8>) {
    let dataset = Dataset::load(Path::new(VBO_PATH)).unwrap();
    let mut buffer = Vec::new();
    write_csv(&dataset, &mut buffer).unwrap();
    (dataset, buffer)
  }

  #[test]
  fn write_csv_test() {
    let (_, buffer) = exported();
    let text = String::from_utf8(buffer).unwrap();
    let lines = text.lines().collect::<Vec<_>>();

    assert_eq!(15, lines.len());
    assert_eq!("sats,time,lat,long,velocity,heading,height,vert_vel,\
                time_of_day,datetime,timestamp,lat_deg,long_deg",
               lines[0]);
    assert!(lines[1].starts_with("9,0,3144,90.6,0,0,112.5,0,0,\
                                  2015-03-14 00:00:00,1426291200,52.4,-1.5"));
    assert!(lines[14].starts_with("9,1.3,3144.275,90.6,0,358.5,113.8,0,1.3,\
                                   2015-03-14 00:00:01,1426291201,"));
  }

  #[test]
  fn from_reader_test() {
    let (dataset, buffer) = exported();
    let table = CsvTable::from_reader(buffer.as_slice()).unwrap();

    assert_eq!(dataset.schema().names(), table.headers().as_slice());
    assert_eq!(dataset.len(), table.len());
    assert_eq!(Track::len(&dataset), Track::len(&table));
    for idx in 0..table.len() {
      assert_eq!(dataset.position(idx), table.position(idx));
    }

    assert_eq!(dataset.column("velocity").unwrap(),
               table.numbers("velocity").unwrap());
    assert_eq!(dataset.records()
                      .iter()
                      .map(|record| record.datetime())
                      .collect::<Vec<_>>(),
               table.datetimes("datetime").unwrap());

    // and back out again, unchanged
    let mut again = Vec::new();
    table.write_csv(&mut again).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(),
               String::from_utf8(again).unwrap());
  }

  #[test]
  fn from_reader_invalid_test() {
    let csv = "time,lat_deg\n1,52.4\n";
    assert_eq!(Err(VboError::MissingColumn("long_deg".to_string())),
               CsvTable::from_reader(csv.as_bytes()));

    let csv = "lat_deg,long_deg\n52.4,-1.5\n52.4,west\n";
    assert_eq!(Err(VboError::InvalidNumber { line:  3,
                                             token: "west".to_string(), }),
               CsvTable::from_reader(csv.as_bytes()));

    let csv = "lat_deg,long_deg\n52.4,-1.5,7\n";
    assert!(matches!(CsvTable::from_reader(csv.as_bytes()),
                     Err(VboError::Csv(_))));

    let csv = "lat_deg,long_deg,datetime\n52.4,-1.5,2015-03-14T09:26:53\n\
               52.4,-1.5,yesterday\n";
    let table = CsvTable::from_reader(csv.as_bytes()).unwrap();
    assert!(matches!(table.datetimes("datetime"), Err(VboError::Date(_))));
  }

  #[test]
  fn trim_table_test() {
    let (_, buffer) = exported();
    let table = CsvTable::from_reader(buffer.as_slice()).unwrap();

    let start = "-1.51,52.4,50".parse().unwrap();
    let trim = Trimmer::new(Some(start), None).trim(&table);
    assert_eq!(TrimRange::new(4, 14), trim.range());
    assert_eq!(Vec::<Warning>::new(), *trim.warnings());

    let journey = table.slice(trim.range());
    assert_eq!(10, journey.len());
    assert_eq!(table.headers(), journey.headers());
    assert_eq!(&table.rows()[4], &journey.rows()[0]);
    assert_eq!(table.position(13), journey.position(9));
  }
}
