use std::io::{BufRead, Write};

use serde::Serialize;
use thiserror::Error;

use crate::catalog::PropertySelection;
use crate::domain::InputRecord;
use crate::error::MolpropError;
use crate::interrupt::{AbortPrompt, AbortSignal};
use crate::pubchem::{CompoundClient, CompoundRecord};
use crate::report::{CompoundReport, ReportWriter};
use crate::stats::RunCounters;
use crate::xref::extract_ids;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Aborted,
}

/// How a run ended and the counters its statistics are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub counters: RunCounters,
}

/// Why a single molecule ended up as a not-found entry.
#[derive(Debug, Error)]
pub enum ItemFailure {
    #[error("lookup failed: {0}")]
    Lookup(MolpropError),
    #[error("extraction failed: {0}")]
    Extraction(MolpropError),
}

#[derive(Clone)]
pub struct App<C: CompoundClient> {
    client: C,
}

impl<C: CompoundClient> App<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Resolves every molecule of `input` in order and reports it.
    ///
    /// Per-item failures are counted and reported as not found. The abort signal is polled
    /// before each molecule, once its lookup has returned, and after the input runs out; a
    /// confirmed abort at the post-lookup point drops the in-flight molecule from both the
    /// report and the counters.
    pub fn run<R, F, D>(
        &self,
        input: R,
        selection: &PropertySelection,
        report: &mut ReportWriter<F, D>,
        abort: &AbortSignal,
        prompt: &mut dyn AbortPrompt,
    ) -> Result<RunOutcome, MolpropError>
    where
        R: BufRead,
        F: Write,
        D: Write,
    {
        let mut counters = RunCounters::default();
        tracing::info!(properties = selection.len(), "run started");

        for line in input.split(b'\n') {
            if abort.take() && prompt.confirm_quit(counters)? {
                return Ok(finish(RunStatus::Aborted, counters));
            }

            let line = line.map_err(|err| MolpropError::InputRead(err.to_string()))?;
            // undecodable bytes become U+FFFD instead of failing the run
            let line = String::from_utf8_lossy(&line);
            let Ok(record) = line.parse::<InputRecord>() else {
                continue;
            };

            let index = counters.start_item();
            report.begin(index, record.label())?;
            tracing::debug!(index, structure = record.structure(), "looking up compound");
            let lookup = self.client.lookup(record.structure());

            if abort.take() && prompt.confirm_quit(counters.without_in_flight())? {
                report.discard();
                return Ok(finish(RunStatus::Aborted, counters.without_in_flight()));
            }

            match resolve_item(lookup, selection) {
                Ok(compound) => report.write_compound(&compound)?,
                Err(failure) => {
                    counters.record_error();
                    tracing::warn!(index, structure = record.structure(), %failure, "compound not resolved");
                    report.write_not_found()?;
                }
            }
            report.commit()?;
        }

        if abort.take() && prompt.confirm_quit(counters)? {
            return Ok(finish(RunStatus::Aborted, counters));
        }
        Ok(finish(RunStatus::Completed, counters))
    }
}

/// Turns a lookup result into a report block. Any selected property the compound lacks
/// fails the whole item.
pub fn resolve_item(
    lookup: Result<CompoundRecord, MolpropError>,
    selection: &PropertySelection,
) -> Result<CompoundReport, ItemFailure> {
    let compound = lookup.map_err(ItemFailure::Lookup)?;
    let secondary_ids = extract_ids(compound.synonyms());
    let properties = selection
        .iter()
        .map(|def| {
            compound
                .property(def)
                .map(|value| (def.name, value))
                .ok_or_else(|| {
                    ItemFailure::Extraction(MolpropError::MissingProperty {
                        property: def.name.to_string(),
                        cid: compound.cid(),
                    })
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CompoundReport {
        cid: compound.cid(),
        secondary_ids,
        properties,
    })
}

fn finish(status: RunStatus, counters: RunCounters) -> RunOutcome {
    tracing::info!(
        ?status,
        processed = counters.processed,
        errors = counters.errors,
        "run finished"
    );
    RunOutcome { status, counters }
}
