// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use std::{error, fmt, result};


/// The crate's result type, erroring with a `VboError`.
pub type Result<T> = result::Result<T, VboError>;


/// Everything that makes reading, trimming or exporting VBO data fail.
///
/// All of these abort processing of the current file. Conditions which are
/// recoverable are not errors but `Warning`s, see below.
#[derive(Clone, Debug, PartialEq)]
pub enum VboError {
  /// One of the three fixed leading columns (`time`, `lat`, `long`) is not
  /// where it has to be.
  SchemaInvariant {
    position: usize,
    expected: &'static str,
    found:    Option<String>,
  },
  DuplicateColumn(String),
  /// The established data line width does not match the column names.
  ColumnCount { expected: usize, found: usize },
  InvalidNumber { line: usize, token: String },
  /// The `time` column does not decompose into a valid time of day.
  InvalidClock { line: usize, value: f64 },
  MissingSchema { line: usize },
  MissingCreationDate { line: usize },
  MissingColumn(String),
  EmptyDataset,
  InvalidZone(String),
  InvalidStride,
  InvalidPath(String),
  Io(String),
  Date(String),
  Csv(String),
  Json(String),
}

impl fmt::Display for VboError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::SchemaInvariant { position,
                              expected,
                              found, } => {
        write!(f,
               "column {} must be '{}', found '{}'",
               position,
               expected,
               found.as_deref().unwrap_or("<nothing>"))
      }
      Self::DuplicateColumn(name) => write!(f, "duplicate column '{}'", name),
      Self::ColumnCount { expected, found } => {
        write!(f,
               "data lines have {} fields but {} columns are named",
               found, expected)
      }
      Self::InvalidNumber { line, token } => {
        write!(f, "line {}: '{}' is not a number", line, token)
      }
      Self::InvalidClock { line, value } => {
        write!(f, "line {}: {} is not a valid HHMMSS.ss time", line, value)
      }
      Self::MissingSchema { line } => {
        write!(f, "line {}: data found before column names", line)
      }
      Self::MissingCreationDate { line } => {
        write!(f, "line {}: data found before file creation date", line)
      }
      Self::MissingColumn(name) => write!(f, "no column '{}' found", name),
      Self::EmptyDataset => write!(f, "dataset contains no records"),
      Self::InvalidZone(msg) => write!(f, "invalid zone: {}", msg),
      Self::InvalidStride => write!(f, "stride must be at least 1"),
      Self::InvalidPath(msg) => write!(f, "invalid path: {}", msg),
      Self::Io(msg) | Self::Date(msg) | Self::Csv(msg) | Self::Json(msg) => {
        write!(f, "{}", msg)
      }
    }
  }
}

impl error::Error for VboError {}


/// This macro - internal use only - generates the implementation of the
/// `From` trait for `VboError` for a given list of types and the variant they
/// end up in.
macro_rules! implement_from {
  ($($ErrType:ty => $Variant:ident),*) => {$(
    impl From<$ErrType> for VboError {
      fn from(error: $ErrType) -> Self {
        Self::$Variant(error.to_string())
      }
    }
  )*}
}

implement_from!(std::io::Error => Io,
                chrono::ParseError => Date,
                csv::Error => Csv,
                serde_json::Error => Json);


/// The `ensure!` macro returns the given `VboError` early if the condition
/// does not hold:
///
/// ```ignore
/// ensure!(stride > 0, VboError::InvalidStride);
/// ```
#[macro_export]
macro_rules! ensure {
  ($cond:expr, $err:expr) => {
    if !($cond) {
      return Err($err);
    }
  };
}


/// Recoverable conditions. These are logged when they occur and handed back
/// alongside the result, processing carries on.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
  /// A data line with the wrong number of fields was skipped. This is
  /// usually the last line, cut short when the logger lost power.
  TruncatedLine {
    line:     usize,
    expected: usize,
    found:    usize,
  },
  /// The track never left the start zone, nothing was trimmed at the front.
  StartZoneNotLeft,
  /// The track never entered the end zone, nothing was trimmed at the back.
  EndZoneNotReached,
}

impl fmt::Display for Warning {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::TruncatedLine { line,
                            expected,
                            found, } => {
        write!(f,
               "line {}: skipping data line with {} instead of {} fields",
               line, found, expected)
      }
      Self::StartZoneNotLeft => write!(f, "no start point found"),
      Self::EndZoneNotReached => write!(f, "no end point found"),
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn display_test() {
    let err = VboError::SchemaInvariant { position: 1,
                                          expected: "time",
                                          found:    Some("lat".to_string()), };
    assert_eq!("column 1 must be 'time', found 'lat'", &format!("{}", err));

    let err = VboError::SchemaInvariant { position: 3,
                                          expected: "long",
                                          found:    None, };
    assert_eq!("column 3 must be 'long', found '<nothing>'",
               &format!("{}", err));

    let warning = Warning::TruncatedLine { line:     42,
                                           expected: 12,
                                           found:    7, };
    assert_eq!("line 42: skipping data line with 7 instead of 12 fields",
               &format!("{}", warning));
  }

  #[test]
  fn from_test() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "warblgarbl");
    assert_eq!(VboError::Io("warblgarbl".to_string()), VboError::from(io));

    let date = chrono::NaiveDate::parse_from_str("garbl", "%d/%m/%Y")
      .unwrap_err();
    assert!(matches!(VboError::from(date), VboError::Date(_)));
  }

  #[test]
  fn ensure_test() {
    fn wrapper(cond: bool) -> Result<()> {
      ensure!(cond, VboError::InvalidStride);
      Ok(())
    }

    assert_eq!(wrapper(true), Ok(()));
    assert_eq!(wrapper(false), Err(VboError::InvalidStride));
  }
}
