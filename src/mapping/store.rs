//! In-memory mapping store

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use super::error::{MappingError, MappingResult};

/// How a non-integer page column is treated during load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Fail the whole load with [`MappingError::InvalidPage`]
    Strict,
    /// Log the bad row and discard the whole table (empty store)
    #[default]
    Lenient,
}

/// Counters emitted after a load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries present in the final table
    pub loaded: usize,
    /// Rows with fewer than two fields
    pub skipped_short_rows: usize,
    /// Rows whose consumer number replaced an earlier row
    pub overridden_duplicates: usize,
    /// Lenient load threw the table away after a bad page column
    pub discarded: bool,
}

/// Immutable consumer -> page table
///
/// Page indices are stored as parsed; bounds against the reference
/// document are checked per request since the document may arrive later.
#[derive(Debug, Clone, Default)]
pub struct MappingStore {
    entries: HashMap<String, i64>,
}

impl MappingStore {
    /// Create an empty store
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from a CSV file on disk
    pub fn load<P: AsRef<Path>>(path: P, mode: LoadMode) -> MappingResult<(Self, LoadReport)> {
        let file = File::open(path.as_ref())?;
        let (store, report) = Self::from_reader(file, mode)?;

        tracing::info!(
            path = %path.as_ref().display(),
            loaded = report.loaded,
            skipped_short_rows = report.skipped_short_rows,
            overridden_duplicates = report.overridden_duplicates,
            discarded = report.discarded,
            "Loaded consumer mapping"
        );

        Ok((store, report))
    }

    /// Parse the table from any reader
    ///
    /// The first row is a header and is skipped. Blank lines are ignored,
    /// rows with fewer than two fields are skipped, extra fields are ignored,
    /// and a repeated consumer number overrides the earlier row.
    pub fn from_reader<R: Read>(reader: R, mode: LoadMode) -> MappingResult<(Self, LoadReport)> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut entries = HashMap::new();
        let mut report = LoadReport::default();

        for result in csv_reader.records() {
            let record = result?;

            let (Some(consumer), Some(page)) = (record.get(0), record.get(1)) else {
                report.skipped_short_rows += 1;
                continue;
            };

            let page = match page.parse::<i64>() {
                Ok(page) => page,
                Err(_) => {
                    let line = record.position().map(|p| p.line()).unwrap_or(0);
                    let err = MappingError::InvalidPage {
                        line,
                        value: page.to_string(),
                    };

                    match mode {
                        LoadMode::Strict => return Err(err),
                        LoadMode::Lenient => {
                            tracing::warn!("Discarding consumer mapping: {}", err);
                            return Ok((
                                Self::empty(),
                                LoadReport {
                                    discarded: true,
                                    ..report
                                },
                            ));
                        }
                    }
                }
            };

            if entries.insert(consumer.to_string(), page).is_some() {
                report.overridden_duplicates += 1;
            }
        }

        if report.overridden_duplicates > 0 {
            tracing::warn!(
                "{} duplicate consumer numbers in mapping, last row wins",
                report.overridden_duplicates
            );
        }

        report.loaded = entries.len();
        Ok((Self { entries }, report))
    }

    /// Exact, case-sensitive lookup of a trimmed consumer number
    pub fn lookup(&self, identifier: &str) -> Option<i64> {
        self.entries.get(identifier.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, i64)> for MappingStore {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
