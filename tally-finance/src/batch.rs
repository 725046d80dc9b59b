//! Batch drivers: categorize a ledger CSV, or resolve merchants for a column of
//! transactions. One row at a time, one external request in flight.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::classifier::{Classifier, LabelSource};
use crate::ledger::{read_ledger, write_ledger, Ledger};
use crate::resolver::{MerchantLookup, MerchantResolver};
use crate::services::{CategorySource, PlaceSearch};

/// Counts from one categorize run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorizeSummary {
    /// Keys in the learned map
    pub learned: usize,
    pub local: usize,
    pub external: usize,
    pub unknown: usize,
}

impl CategorizeSummary {
    pub fn classified(&self) -> usize {
        self.local + self.external + self.unknown
    }
}

/// Fill every unlabelled row of `ledger` in place.
pub fn categorize_rows(ledger: &mut Ledger, sources: &[&dyn CategorySource]) -> CategorizeSummary {
    let map = ledger.category_map();
    let classifier = Classifier::new(&map, sources.to_vec());
    let mut summary = CategorizeSummary {
        learned: map.len(),
        ..Default::default()
    };

    for row in ledger.rows.iter_mut().filter(|r| !r.is_labelled()) {
        let result = classifier.classify(&row.transaction);
        debug!(transaction = %row.transaction, label = %result.label, "classified");
        match result.source {
            LabelSource::LocalMap => summary.local += 1,
            LabelSource::External(_) => summary.external += 1,
            LabelSource::Fallback => summary.unknown += 1,
        }
        row.category = result.label.to_string();
    }

    summary
}

/// Read → learn from labelled rows → classify the rest → write.
///
/// Nothing is written if reading fails; the output holds the header once,
/// followed by all rows in input order.
pub fn categorize_ledger(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    sources: &[&dyn CategorySource],
) -> Result<CategorizeSummary> {
    let mut ledger = read_ledger(&input)?;
    info!(
        rows = ledger.rows.len(),
        unlabelled = ledger.unlabelled_count(),
        "loaded {}",
        input.as_ref().display()
    );

    let summary = categorize_rows(&mut ledger, sources);
    write_ledger(&output, &ledger)?;

    info!(
        learned = summary.learned,
        local = summary.local,
        external = summary.external,
        unknown = summary.unknown,
        "wrote {}",
        output.as_ref().display()
    );
    Ok(summary)
}

/// One transaction from a resolve run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRow {
    pub transaction: String,
    pub lookup: Option<MerchantLookup>,
}

/// Resolve the merchant of every transaction in the first column of a CSV
/// (the first row is a header and is skipped).
pub fn resolve_ledger<P: PlaceSearch>(
    input: impl AsRef<Path>,
    resolver: &MerchantResolver<P>,
) -> Result<Vec<ResolvedRow>> {
    let input = input.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(input)
        .with_context(|| format!("opening {}", input.display()))?;

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("parsing {}", input.display()))?;
        let transaction = record.get(0).unwrap_or("").trim();
        if transaction.is_empty() {
            continue;
        }
        out.push(ResolvedRow {
            transaction: transaction.to_string(),
            lookup: resolver.lookup_transaction(transaction),
        });
    }

    let resolved = out
        .iter()
        .filter(|r| r.lookup.as_ref().is_some_and(|l| l.resolved.is_some()))
        .count();
    info!(rows = out.len(), resolved, "resolved merchants from {}", input.display());
    Ok(out)
}

/// Write resolve results as `transaction,merchant,place_id,processor`.
/// Unparsed or unresolved fields are left empty.
pub fn write_resolved<W: Write>(w: W, rows: &[ResolvedRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(["transaction", "merchant", "place_id", "processor"])?;
    for row in rows {
        let resolved = row.lookup.as_ref().and_then(|l| l.resolved.as_ref());
        let merchant = resolved.map(|r| r.name.as_str()).unwrap_or("");
        let place_id = resolved.and_then(|r| r.place_id.as_deref()).unwrap_or("");
        let processor = row
            .lookup
            .as_ref()
            .and_then(|l| l.processor_name)
            .unwrap_or("");
        wtr.write_record([row.transaction.as_str(), merchant, place_id, processor])?;
    }
    wtr.flush()?;
    Ok(())
}
