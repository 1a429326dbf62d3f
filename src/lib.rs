// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

mod dataset;
mod error;
mod geofence;
mod parser;
mod record;
mod schema;
mod section;
mod track;

pub mod csv_table;
pub mod geojson;
pub mod gpx;

pub use csv_table::CsvTable;
pub use dataset::{Bounds, Dataset};
pub use error::{Result, VboError, Warning};
pub use geofence::{arrival, departure, haversine, GeoZone, Trim, TrimRange, Trimmer};
pub use record::{Clock, Field, Record};
pub use schema::{ColumnSchema, DERIVED_COLUMNS};
pub use section::{Line, Section};
pub use track::Track;
