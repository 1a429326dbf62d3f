// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{dataset::{accumulate, Step},
            ensure,
            section::{Classifier, Line, Section},
            ColumnSchema,
            Dataset,
            Record,
            Result,
            VboError,
            Warning};
use chrono::NaiveDateTime;
use std::mem;


/// Single pass over the lines of a VBO file.
///
/// Lines are fed one at a time; `finish` hands out the `Dataset`. Anything
/// fatal is returned from `feed` right away, anything recoverable ends up in
/// the dataset's warnings.
#[derive(Debug, Default)]
pub struct Parser {
  classifier:     Classifier,
  line_no:        usize,
  creation_date:  Option<NaiveDateTime>,
  headers:        Vec<String>,
  comments:       Vec<String>,
  schema:         Option<ColumnSchema>,
  expected_width: Option<usize>,
  records:        Vec<Record>,
  warnings:       Vec<Warning>,
}

impl Parser {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn feed(&mut self, raw_line: &str) -> Result<()> {
    self.line_no += 1;

    let (section, line) = self.classifier.classify(raw_line.trim())?;
    match line {
      Line::Label(_) => Ok(()),
      Line::Created(created) => {
        self.creation_date = Some(created);
        Ok(())
      }
      Line::Content("") => Ok(()),
      Line::Content(content) => self.content(&section, content),
    }
  }

  pub fn finish(self) -> Result<Dataset> {
    let schema = self.schema.ok_or(VboError::EmptyDataset)?;
    let creation_date = self.creation_date.ok_or(VboError::EmptyDataset)?;

    Dataset::new(creation_date,
                 self.headers,
                 self.comments,
                 schema,
                 self.records,
                 self.warnings)
  }

  fn content(&mut self, section: &Section, content: &str) -> Result<()> {
    match section {
      Section::Header => self.headers.push(content.to_string()),
      Section::Comments => self.comments.push(content.to_string()),
      Section::ColumnNames => {
        if self.schema.is_none() {
          self.schema = Some(ColumnSchema::from_line(content)?);
        } else {
          log::debug!("line {}: column names already known, ignoring",
                      self.line_no);
        }
      }
      Section::Data => self.data(content)?,
      Section::None | Section::Unrecognized(_) => {}
    }
    Ok(())
  }

  fn data(&mut self, content: &str) -> Result<()> {
    let line = self.line_no;
    let schema = self.schema
                     .as_ref()
                     .ok_or(VboError::MissingSchema { line })?;
    let created = self.creation_date
                      .ok_or(VboError::MissingCreationDate { line })?;

    let tokens = content.split_whitespace().collect::<Vec<_>>();
    let expected = match self.expected_width {
      Some(width) => width,
      None => {
        ensure!(tokens.len() == schema.raw_len(),
                VboError::ColumnCount { expected: schema.raw_len(),
                                        found:    tokens.len(), });
        self.expected_width = Some(tokens.len());
        tokens.len()
      }
    };

    if tokens.len() != expected {
      let warning = Warning::TruncatedLine { line,
                                             expected,
                                             found: tokens.len() };
      log::warn!("{}", warning);
      self.warnings.push(warning);
      return Ok(());
    }

    let record = Record::derive(line, &tokens, schema, created)?;
    self.records = accumulate(mem::take(&mut self.records), Step::of(record));
    Ok(())
  }
}
