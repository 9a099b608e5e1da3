//! Line-by-line bulletin import.

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;

use emsr_catalogue::{MeasureDraft, MeasureStore, Origin};
use tracing::{debug, info, warn};

use crate::config::{ImportConfig, JunkPolicy};
use crate::error::IsfError;
use crate::fields::{parse_measure_block, parse_origin_block};
use crate::line::{EVENT_HEADER, LineType, classify};
use crate::report::{EntityKind, ImportReport};
use crate::state::ParserState;

/// Streams a bulletin into `store`.
///
/// The store is committed every `commit_every` lines and once at the end.
/// Line-level errors are collected in the returned report and parsing
/// resumes at the next event.
///
/// # Errors
///
/// Returns the first fatal error (duplicate key, read failure, or junk
/// under [`JunkPolicy::Fatal`]) after rolling back the uncommitted batch.
#[tracing::instrument(skip_all, fields(catalogue = config.catalogue()))]
pub fn import_events<R, S>(
    reader: R,
    store: &mut S,
    config: &ImportConfig,
) -> Result<ImportReport, IsfError>
where
    R: BufRead,
    S: MeasureStore,
{
    config.validate()?;
    let mut importer = Importer::new(store, config);

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                importer.store.rollback();
                return Err(e.into());
            }
        };
        importer.report.set_lines(line_no);
        if let Err(e) = importer.feed(&line, line_no) {
            warn!(line = line_no, error = %e, "import aborted");
            importer.store.rollback();
            return Err(e);
        }
        if line_no % config.commit_every() == 0 {
            importer.store.commit();
        }
    }
    importer.store.commit();

    let report = importer.report;
    info!(
        lines = report.lines(),
        events = report.created(EntityKind::Event),
        origins = report.created(EntityKind::Origin),
        measures = report.created(EntityKind::Measure),
        errors = report.errors().len(),
        "import finished"
    );
    Ok(report)
}

struct Importer<'a, S> {
    store: &'a mut S,
    config: &'a ImportConfig,
    state: ParserState,
    /// A catalogue header has been read since the last `STOP`.
    started: bool,
    /// Skipping the remains of a rejected event.
    recovering: bool,
    event: Option<String>,
    /// Origins of the current event by bulletin origin id.
    origins: HashMap<String, Arc<Origin>>,
    report: ImportReport,
}

impl<'a, S: MeasureStore> Importer<'a, S> {
    fn new(store: &'a mut S, config: &'a ImportConfig) -> Self {
        Self {
            store,
            config,
            state: ParserState::Start,
            started: false,
            recovering: false,
            event: None,
            origins: HashMap::new(),
            report: ImportReport::default(),
        }
    }

    /// Processes one line. Only fatal errors are returned.
    fn feed(&mut self, line: &str, line_no: usize) -> Result<(), IsfError> {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            return Ok(());
        }
        let kind = classify(line);
        match self.state.next(kind, self.started) {
            Some(next) => self.accept(kind, next, line, line_no),
            None => self.reject(kind, line, line_no),
        }
    }

    fn accept(
        &mut self,
        kind: LineType,
        next: ParserState,
        line: &str,
        line_no: usize,
    ) -> Result<(), IsfError> {
        match self.handle(kind, line, line_no) {
            Ok(()) => {
                self.state = next;
                if matches!(kind, LineType::EventHeader | LineType::CatalogueHeader) {
                    self.recovering = false;
                }
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping rest of event");
                self.report.push_error(e);
                self.reset();
                Ok(())
            }
        }
    }

    fn reject(&mut self, kind: LineType, line: &str, line_no: usize) -> Result<(), IsfError> {
        let error = IsfError::UnexpectedLine {
            line: line_no,
            state: self.state,
            kind,
        };

        if self.state != ParserState::Start {
            warn!(line = line_no, error = %error, "skipping rest of event");
            self.report.push_error(error);
            self.reset();
            // the offending line may itself open the next event
            return match ParserState::Start.next(kind, self.started) {
                Some(next) => self.accept(kind, next, line, line_no),
                None => Ok(()),
            };
        }

        if self.recovering {
            debug!(line = line_no, %kind, "skipped");
            return Ok(());
        }
        match self.config.junk_policy() {
            JunkPolicy::Skip => {
                debug!(line = line_no, %kind, "skipped");
                Ok(())
            }
            JunkPolicy::Record => {
                self.report.push_error(error);
                Ok(())
            }
            JunkPolicy::Fatal => Err(error),
        }
    }

    fn reset(&mut self) {
        self.state = ParserState::Start;
        self.recovering = true;
        self.event = None;
        self.origins.clear();
    }

    fn handle(&mut self, kind: LineType, line: &str, line_no: usize) -> Result<(), IsfError> {
        match kind {
            LineType::CatalogueHeader => {
                self.started = true;
                Ok(())
            }
            LineType::EventHeader => self.event_header(line, line_no),
            LineType::OriginBlock => self.origin_block(line, line_no),
            LineType::MeasureBlock | LineType::MeasureUnknownScaleBlock => {
                self.measure_block(line, line_no)
            }
            LineType::Stop => {
                self.started = false;
                self.event = None;
                self.origins.clear();
                Ok(())
            }
            LineType::OriginHeader | LineType::MeasureHeader | LineType::Comment => Ok(()),
            // never accepted by the transition table
            LineType::Junk => Ok(()),
        }
    }

    fn event_header(&mut self, line: &str, line_no: usize) -> Result<(), IsfError> {
        let caps = EVENT_HEADER
            .captures(line)
            .ok_or_else(|| IsfError::InvalidField {
                line: line_no,
                field: "event header",
                value: line.to_string(),
            })?;
        let key = &caps[1];
        let name = caps.get(2).map_or("", |m| m.as_str().trim());
        let (_, created) = self
            .store
            .get_or_create_event(self.config.catalogue(), key, name);
        self.report.count(EntityKind::Event, created);
        debug!(line = line_no, event = key, created, "event");

        self.event = Some(key.to_string());
        self.origins.clear();
        Ok(())
    }

    fn origin_block(&mut self, line: &str, line_no: usize) -> Result<(), IsfError> {
        let Some(event_key) = self.event.as_deref() else {
            return Err(IsfError::UnexpectedLine {
                line: line_no,
                state: self.state,
                kind: LineType::OriginBlock,
            });
        };
        let origin = parse_origin_block(line, event_key, line_no)?;
        if !origin.author.is_empty() {
            let (_, created) = self.store.get_or_create_agency(&origin.author);
            self.report.count(EntityKind::Agency, created);
        }
        let origin = self
            .store
            .insert_origin(origin)
            .map_err(|source| IsfError::Store {
                line: line_no,
                source,
            })?;
        self.report.count(EntityKind::Origin, true);
        self.origins.insert(origin.source_key.clone(), origin);
        Ok(())
    }

    fn measure_block(&mut self, line: &str, line_no: usize) -> Result<(), IsfError> {
        let record = parse_measure_block(line, line_no)?;
        let origin = self
            .origins
            .get(&record.origin_key)
            .cloned()
            .ok_or_else(|| IsfError::UnknownOrigin {
                line: line_no,
                origin: record.origin_key.clone(),
            })?;
        let (_, created) = self.store.get_or_create_agency(&record.author);
        self.report.count(EntityKind::Agency, created);

        let mut draft = MeasureDraft::new(record.author, origin, record.scale, record.value);
        draft.standard_error = record.standard_error;
        draft.stations = record.stations;
        self.store
            .insert_measure(draft)
            .map_err(|source| IsfError::Store {
                line: line_no,
                source,
            })?;
        self.report.count(EntityKind::Measure, true);
        Ok(())
    }
}
