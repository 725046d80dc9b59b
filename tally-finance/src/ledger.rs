//! Two-column ledger CSV: `category,transaction`.
//!
//! The first line is a header and is written back byte for byte, and its line
//! ending is reused for every row. Rows with a category are hand-labelled and
//! feed the [`CategoryMap`]; rows without one are waiting to be classified.

use anyhow::{bail, Context, Result};
use csv::Terminator;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use tally_core::CategoryLabel;
use tally_ingest::merchant_key;

use crate::category_map::CategoryMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub category: String,
    pub transaction: String,
}

impl LedgerRow {
    pub fn is_labelled(&self) -> bool {
        !self.category.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Ledger {
    /// Raw header line, terminator included
    pub header: String,
    pub rows: Vec<LedgerRow>,
}

impl Ledger {
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut rdr = BufReader::new(rdr);
        let mut header = String::new();
        if rdr.read_line(&mut header).context("reading header row")? == 0 {
            bail!("ledger is empty (expected a header row)");
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(rdr);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            if record.len() != 2 {
                // positions restart after the header line
                let line = record.position().map(|p| p.line() + 1).unwrap_or(0);
                bail!(
                    "line {}: expected 2 columns (category, transaction), found {}",
                    line,
                    record.len()
                );
            }
            rows.push(LedgerRow {
                category: record[0].to_string(),
                transaction: record[1].to_string(),
            });
        }

        Ok(Self { header, rows })
    }

    /// Whether the input used `\r\n` line endings
    pub fn uses_crlf(&self) -> bool {
        self.header.ends_with("\r\n")
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        w.write_all(self.header.as_bytes())?;
        if self.rows.is_empty() {
            return Ok(());
        }
        if !self.header.ends_with('\n') {
            w.write_all(b"\n")?;
        }

        let terminator = if self.uses_crlf() {
            Terminator::CRLF
        } else {
            Terminator::Any(b'\n')
        };
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(terminator)
            .from_writer(w);
        for row in &self.rows {
            wtr.write_record([row.category.as_str(), row.transaction.as_str()])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Map learned from the labelled rows, keyed by merchant
    pub fn category_map(&self) -> CategoryMap {
        self.labelled()
            .map(|row| (merchant_key(&row.transaction), CategoryLabel::new(&row.category)))
            .collect()
    }

    pub fn labelled(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter().filter(|r| r.is_labelled())
    }

    pub fn unlabelled_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_labelled()).count()
    }
}

pub fn read_ledger(path: impl AsRef<Path>) -> Result<Ledger> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ledger::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

pub fn write_ledger(path: impl AsRef<Path>, ledger: &Ledger) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    ledger
        .write_to(file)
        .with_context(|| format!("writing {}", path.display()))
}
