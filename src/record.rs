// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{ensure, ColumnSchema, Result, VboError};
use chrono::{NaiveDateTime, TimeZone, Utc};
use getset::{CopyGetters, Getters};
use serde::Serialize;


/// A single value of a record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
  Number(f64),
  DateTime(NaiveDateTime),
}

impl Field {
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Number(value) => Some(*value),
      Self::DateTime(_) => None,
    }
  }
}


/// Time of day as packed into the `time` column, `HHMMSS.ss`.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Clock {
  hours:   u32,
  minutes: u32,
  seconds: f64,
}

impl Clock {
  /// Unpacks `value`, which was parsed from `token`. The fractional seconds
  /// are taken from the text of the token so they come out as written.
  pub fn unpack(line: usize, token: &str, value: f64) -> Result<Self> {
    let invalid = VboError::InvalidClock { line, value };
    ensure!(value.is_finite() && value >= 0.0, invalid);

    let packed = value.trunc() as u64;
    let (hours, minutes, whole) =
      (packed / 10_000, (packed % 10_000) / 100, packed % 100);
    ensure!(hours < 24 && minutes < 60 && whole < 60, invalid);

    let seconds = match token.split_once('.') {
      Some((_, fraction))
        if !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit()) =>
      {
        format!("{}.{}", whole, fraction).parse::<f64>()
                                         .map_err(|_| invalid.clone())?
      }
      _ => whole as f64 + value.fract(),
    };

    Ok(Self { hours: hours as u32,
              minutes: minutes as u32,
              seconds })
  }

  /// Seconds since midnight.
  pub fn time_of_day(&self) -> f64 {
    3600.0 * self.hours as f64 + 60.0 * self.minutes as f64 + self.seconds
  }

  /// The clock placed on the day of `created`, dropping fractional seconds.
  pub fn on_day_of(&self, created: NaiveDateTime) -> Option<NaiveDateTime> {
    created.date()
           .and_hms_opt(self.hours, self.minutes, self.seconds.trunc() as u32)
  }
}


/// One line of the `[data]` section with its derived values.
///
/// Raw values keep the positions of the columns in the file. The derived
/// values follow in the order of `schema::DERIVED_COLUMNS`, which is how
/// `field` and `fields` number them.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters)]
pub struct Record {
  #[getset(get = "pub")]
  raw:         Vec<f64>,
  #[getset(get_copy = "pub")]
  time_of_day: f64,
  #[getset(get_copy = "pub")]
  datetime:    NaiveDateTime,
  #[getset(get_copy = "pub")]
  timestamp:   f64,
  #[getset(get_copy = "pub")]
  lat_deg:     f64,
  #[getset(get_copy = "pub")]
  long_deg:    f64,
}

impl Record {
  /// Derive a record from a data line
  ///
  /// # Arguments
  /// - `line`: number of the line in the file, for error messages
  /// - `tokens`: the whitespace separated fields of the line
  /// - `schema`: the column names the tokens belong to
  /// - `created`: the file creation date, only its date part is used
  ///
  /// # Returns
  /// the raw values plus time of day, datetime, timestamp and the position
  /// in degrees, or an error if a token is not a number or the time column
  /// is not a valid `HHMMSS.ss`.
  pub fn derive(line: usize,
                tokens: &[&str],
                schema: &ColumnSchema,
                created: NaiveDateTime)
                -> Result<Self> {
    ensure!(tokens.len() == schema.raw_len(),
            VboError::ColumnCount { expected: schema.raw_len(),
                                    found:    tokens.len(), });

    let raw = tokens.iter()
                    .map(|token| {
                      token.parse::<f64>()
                           .map_err(|_| VboError::InvalidNumber { line,
                                                                  token: token.to_string() })
                    })
                    .collect::<Result<Vec<f64>>>()?;

    let time_idx = schema.time_idx();
    let clock = Clock::unpack(line, tokens[time_idx], raw[time_idx])?;
    let datetime = clock.on_day_of(created)
                        .ok_or(VboError::InvalidClock { line,
                                                        value: raw[time_idx] })?;

    // positions come in minutes, with west positive
    let lat_deg = raw[schema.lat_idx()] / 60.0;
    let long_deg = -raw[schema.long_idx()] / 60.0;

    Ok(Self { time_of_day: clock.time_of_day(),
              datetime,
              timestamp: Utc.from_utc_datetime(&datetime).timestamp() as f64,
              lat_deg,
              long_deg,
              raw })
  }

  /// Number of fields, raw and derived.
  pub fn len(&self) -> usize {
    self.raw.len() + 5
  }

  /// A record at exactly midnight marks the start of valid data; everything
  /// recorded before it was logged without a GPS fix.
  pub fn is_sentinel(&self) -> bool {
    self.time_of_day == 0.0
  }

  /// The field at schema position `idx`.
  pub fn field(&self, idx: usize) -> Option<Field> {
    if let Some(&value) = self.raw.get(idx) {
      return Some(Field::Number(value));
    }
    match idx - self.raw.len() {
      0 => Some(Field::Number(self.time_of_day)),
      1 => Some(Field::DateTime(self.datetime)),
      2 => Some(Field::Number(self.timestamp)),
      3 => Some(Field::Number(self.lat_deg)),
      4 => Some(Field::Number(self.long_deg)),
      _ => None,
    }
  }

  /// All fields, in schema order.
  pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
    (0..self.len()).filter_map(move |idx| self.field(idx))
  }

  /// The field named `name`.
  pub fn get(&self, schema: &ColumnSchema, name: &str) -> Result<Field> {
    let idx = schema.require(name)?;
    self.field(idx)
        .ok_or_else(|| VboError::MissingColumn(name.to_string()))
  }

  /// The numeric field named `name`, `datetime` is not one.
  pub fn number(&self, schema: &ColumnSchema, name: &str) -> Result<f64> {
    self.get(schema, name)?
        .as_f64()
        .ok_or_else(|| VboError::MissingColumn(name.to_string()))
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use pretty_assertions::assert_eq;

  fn schema() -> ColumnSchema {
    ColumnSchema::from_line("sats time lat long velocity heading height")
      .unwrap()
  }

  fn created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 3, 14).unwrap()
                                        .and_hms_opt(9, 26, 53)
                                        .unwrap()
  }

  #[test]
  fn clock_test() {
    let clock = Clock::unpack(1, "123456.78", 123456.78).unwrap();
    assert_eq!(12, clock.hours());
    assert_eq!(34, clock.minutes());
    assert_eq!(56.78, clock.seconds());
    assert!((clock.time_of_day() - 45296.78).abs() < 1e-9);

    let clock = Clock::unpack(1, "000000.00", 0.0).unwrap();
    assert_eq!(0.0, clock.time_of_day());

    // no leading zeros and no fraction work just as well
    let clock = Clock::unpack(1, "95901", 95901.0).unwrap();
    assert_eq!((9, 59, 1.0),
               (clock.hours(), clock.minutes(), clock.seconds()));

    assert_eq!(created().date().and_hms_opt(12, 34, 56),
               Clock::unpack(1, "123456.78", 123456.78).unwrap()
                                                       .on_day_of(created()));
  }

  #[test]
  fn clock_invalid_test() {
    for &(token, value) in &[("246000.00", 246000.0),
                             ("126000.00", 126000.0),
                             ("123460.00", 123460.0),
                             ("-10.00", -10.0)]
    {
      assert_eq!(Err(VboError::InvalidClock { line: 7, value }),
                 Clock::unpack(7, token, value));
    }
  }

  #[test]
  fn derive_test() {
    let schema = schema();
    let tokens = ["008", "123456.78", "+03144.50800", "+00090.60600",
                  "042.150", "271.60", "+00123.45"];
    let record = Record::derive(3, &tokens, &schema, created()).unwrap();

    assert_eq!(&vec![8.0, 123456.78, 3144.508, 90.606, 42.15, 271.6, 123.45],
               record.raw());
    assert!((record.time_of_day() - 45296.78).abs() < 1e-9);
    assert_eq!(NaiveDate::from_ymd_opt(2015, 3, 14).unwrap()
                                                   .and_hms_opt(12, 34, 56)
                                                   .unwrap(),
               record.datetime());
    assert_eq!(1426336496.0, record.timestamp());
    assert!((record.lat_deg() - 52.408466).abs() < 1e-6);
    assert!((record.long_deg() + 1.5101).abs() < 1e-6);
    assert_eq!(false, record.is_sentinel());

    assert_eq!(12, record.len());
    assert_eq!(record.len(), record.fields().count());
    assert_eq!(Some(Field::Number(42.15)), record.field(4));
    assert_eq!(Some(Field::Number(record.time_of_day())), record.field(7));
    assert_eq!(Some(Field::DateTime(record.datetime())), record.field(8));
    assert_eq!(None, record.field(12));

    assert_eq!(Ok(42.15), record.number(&schema, "velocity"));
    assert_eq!(Ok(record.long_deg()), record.number(&schema, "long_deg"));
    assert_eq!(Err(VboError::MissingColumn("datetime".to_string())),
               record.number(&schema, "datetime"));
    assert_eq!(Err(VboError::MissingColumn("sats_used".to_string())),
               record.get(&schema, "sats_used"));
  }

  #[test]
  fn degree_round_trip_test() {
    let schema = schema();
    for &minutes in &[0.0, 1.0, 3144.508, 5399.99, 10799.999999, -1234.5678] {
      let lat = minutes.to_string();
      let long = minutes.to_string();
      let tokens = ["008", "000001.00", lat.as_str(), long.as_str(), "0", "0",
                    "0"];
      let record = Record::derive(1, &tokens, &schema, created()).unwrap();

      assert!((record.lat_deg() * 60.0 - minutes).abs() < 1e-9);
      assert!((-record.long_deg() * 60.0 - minutes).abs() < 1e-9);
    }
  }

  #[test]
  fn derive_sentinel_test() {
    let tokens = ["000", "000000.00", "0", "0", "0", "0", "0"];
    let record = Record::derive(1, &tokens, &schema(), created()).unwrap();
    assert!(record.is_sentinel());
    assert_eq!(created().date().and_hms_opt(0, 0, 0).unwrap(),
               record.datetime());
  }

  #[test]
  fn derive_invalid_test() {
    let schema = schema();

    let tokens = ["008", "123456.78", "3144.5", "90.6", "fast", "0", "0"];
    assert_eq!(Err(VboError::InvalidNumber { line:  9,
                                             token: "fast".to_string(), }),
               Record::derive(9, &tokens, &schema, created()));

    let tokens = ["008", "123456.78", "3144.5", "90.6"];
    assert_eq!(Err(VboError::ColumnCount { expected: 7,
                                           found:    4, }),
               Record::derive(9, &tokens, &schema, created()));
  }
}
