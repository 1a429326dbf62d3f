// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::Result;
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;


lazy_static! {
  static ref SECTION_RE: Regex = Regex::new(r"^\[([\s\w]+)\]").unwrap();
}

const CREATED_PREFIX: &str = "File created on";
const CREATED_FORMAT: &str = "%d/%m/%Y @ %H:%M:%S";


/// The region of a VBO file a line belongs to.
///
/// Files contain more sections than the four we care about (`[channel
/// units]`, `[laptiming]`, `[avifile]` and so on). Those are kept as
/// `Unrecognized` and whatever they contain is ignored.
#[derive(Clone, Debug, PartialEq)]
pub enum Section {
  /// Before the first bracketed label.
  None,
  Header,
  Comments,
  ColumnNames,
  Data,
  Unrecognized(String),
}

impl Section {
  pub fn from_label(label: &str) -> Self {
    match label {
      "header" => Self::Header,
      "comments" => Self::Comments,
      "column names" => Self::ColumnNames,
      "data" => Self::Data,
      other => Self::Unrecognized(other.to_string()),
    }
  }
}

impl Default for Section {
  fn default() -> Self {
    Self::None
  }
}


/// What a single (stripped) line of a VBO file is.
#[derive(Clone, Debug, PartialEq)]
pub enum Line<'a> {
  /// A bracketed label starting a new section.
  Label(Section),
  /// The `File created on ...` line found before any section.
  Created(NaiveDateTime),
  /// Anything else, to be handled by whatever the current section is.
  Content(&'a str),
}


/// Keeps track of the current section while walking through the lines of a
/// file, one at a time.
#[derive(Debug, Default)]
pub struct Classifier {
  section: Section,
}

impl Classifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn section(&self) -> &Section {
    &self.section
  }

  /// Classifies `line` and moves to a new section if it is a label. The
  /// returned `Section` is the one the line has to be handled in.
  pub fn classify<'a>(&mut self, line: &'a str) -> Result<(Section, Line<'a>)> {
    if let Some(label) = SECTION_RE.captures(line).and_then(|c| c.get(1)) {
      self.section = Section::from_label(label.as_str());
      return Ok((self.section.clone(), Line::Label(self.section.clone())));
    }

    if self.section == Section::None && line.starts_with(CREATED_PREFIX) {
      return Ok((Section::None, Line::Created(parse_created(line)?)));
    }

    Ok((self.section.clone(), Line::Content(line)))
  }
}


/// Parses the date out of a `File created on DD/MM/YYYY @ HH:MM:SS` line.
pub fn parse_created(line: &str) -> Result<NaiveDateTime> {
  let date = line.trim_start_matches(CREATED_PREFIX).trim();
  Ok(NaiveDateTime::parse_from_str(date, CREATED_FORMAT)?)
}
