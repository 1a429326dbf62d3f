// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use clap::{Parser, Subcommand};
use env_logger::Env;
use eyre::{Result, WrapErr};
use std::{fs::File,
          io::{self, BufWriter, Write},
          path::{Path, PathBuf}};
use vbox::{csv_table::{self, CsvTable},
           geojson::{self, DEFAULT_STRIDE},
           gpx::{self, Gpx},
           Dataset,
           GeoZone,
           Trimmer};


#[derive(Debug, Parser)]
#[command(author, version, about = "Read, convert and trim Racelogic VBOX logs")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Read a .vbo file and export it
  Read {
    vbo_file: PathBuf,
    /// Write all records as CSV
    #[arg(short, long)]
    csv:      Option<PathBuf>,
    /// Write the track as GPX
    #[arg(short = 'p', long)]
    gpx:      Option<PathBuf>,
    /// Write every n-th point as GeoJSON line segments
    #[arg(short, long)]
    geo:      Option<PathBuf>,
    #[arg(short, long, default_value_t = DEFAULT_STRIDE)]
    stride:   usize,
  },
  /// Cut a CSV export down to the part between leaving the start zone and
  /// entering the end zone
  Trim {
    csv_file: PathBuf,
    /// Start zone as long,lat,radius (degrees, degrees, metres)
    #[arg(short, long, allow_hyphen_values = true)]
    start:    Option<GeoZone>,
    /// End zone as long,lat,radius (degrees, degrees, metres)
    #[arg(short, long, allow_hyphen_values = true)]
    end:      Option<GeoZone>,
    /// Output file, stdout if not given
    #[arg(short, long)]
    out:      Option<PathBuf>,
  },
  /// Convert a CSV export to GPX
  Csv2gpx {
    csv_file: PathBuf,
    /// Output file, stdout if not given
    #[arg(short, long)]
    out:      Option<PathBuf>,
  },
}


fn create(path: &Path) -> Result<BufWriter<File>> {
  let file = File::create(path).wrap_err_with(|| {
                                  format!("could not create {}",
                                          path.display())
                                })?;
  Ok(BufWriter::new(file))
}

fn output(path: Option<&Path>) -> Result<Box<dyn Write>> {
  Ok(match path {
    Some(path) => Box::new(create(path)?),
    None => Box::new(io::stdout()),
  })
}


fn read(vbo_file: &Path,
        csv: Option<&Path>,
        gpx: Option<&Path>,
        geo: Option<&Path>,
        stride: usize)
        -> Result<()> {
  let dataset = Dataset::load(vbo_file).wrap_err_with(|| {
                                           format!("could not read {}",
                                                   vbo_file.display())
                                         })?;
  log::info!("read {} points from {}", dataset.len(), vbo_file.display());

  if let Some(path) = csv {
    csv_table::write_csv(&dataset, create(path)?)?;
  }
  if let Some(path) = gpx {
    gpx::write_gpx(&dataset, create(path)?)?;
  }
  if let Some(path) = geo {
    geojson::write_geojson(&dataset, stride, create(path)?)?;
  }
  Ok(())
}

fn trim(csv_file: &Path,
        start: Option<GeoZone>,
        end: Option<GeoZone>,
        out: Option<&Path>)
        -> Result<()> {
  let table = CsvTable::load(csv_file).wrap_err_with(|| {
                                         format!("could not read {}",
                                                 csv_file.display())
                                       })?;
  log::info!("read {} points from {}", table.len(), csv_file.display());

  let trim = Trimmer::new(start, end).trim(&table);
  let journey = table.slice(trim.range());
  log::info!("journey: {} points, from {} to {}",
             journey.len(),
             trim.range().start(),
             trim.range().end());

  journey.write_csv(output(out)?)?;
  Ok(())
}

fn csv2gpx(csv_file: &Path, out: Option<&Path>) -> Result<()> {
  let table = CsvTable::load(csv_file).wrap_err_with(|| {
                                         format!("could not read {}",
                                                 csv_file.display())
                                       })?;
  log::info!("read {} points from {}", table.len(), csv_file.display());

  Gpx::from_table(&table)?.write(output(out)?)?;
  Ok(())
}


fn main() -> Result<()> {
  color_eyre::install()?;
  env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

  match Cli::parse().command {
    Command::Read { vbo_file,
                    csv,
                    gpx,
                    geo,
                    stride, } => read(&vbo_file,
                                      csv.as_deref(),
                                      gpx.as_deref(),
                                      geo.as_deref(),
                                      stride),
    Command::Trim { csv_file,
                    start,
                    end,
                    out, } => trim(&csv_file, start, end, out.as_deref()),
    Command::Csv2gpx { csv_file, out } => csv2gpx(&csv_file, out.as_deref()),
  }
}
