//! End-to-end wiring of the conversion and metadata pipelines
//!
//! Enumeration finishes before any task is submitted. Completions are
//! consumed on the calling thread, which feeds the progress tracker and the
//! aggregator, and reports are written only after the pool has drained.

use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;

use crate::classifier::Classifier;
use crate::config::{ConvertConfig, MetadataConfig};
use crate::enrich::{apply_enrichment, Enricher, Enrichment, ENRICHMENT_HEADER};
use crate::error::PipelineError;
use crate::library::{build_summary, LibrarySummary};
use crate::models::{AudioMetadataRecord, FailureEntry, Outcome, RunReport};
use crate::pool::{TaskResult, WorkerPool};
use crate::progress::{FinishEvent, ItemEvent, PipelineObserver, ProgressTracker};
use crate::report::{write_conversion_reports, write_json, write_text, ResultAggregator, RunContext};
use crate::scanner;
use crate::tags::{extract_record, TagReader};
use crate::transcode::Transcoder;

/// How a run ended
#[derive(Debug)]
pub enum RunStatus<T> {
    /// The input tree held nothing to process; no reports were written
    NoFiles,
    Completed(T),
}

impl<T> RunStatus<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            RunStatus::Completed(run) => Some(run),
            RunStatus::NoFiles => None,
        }
    }
}

/// Result of a conversion run
#[derive(Debug)]
pub struct ConversionRun {
    pub report: RunReport,
    pub errors: Vec<FailureEntry>,
    /// Error report first, then the summary
    pub report_paths: Vec<PathBuf>,
}

/// Result of a metadata run
#[derive(Debug)]
pub struct MetadataRun {
    /// Records in enumeration order
    pub records: Vec<AudioMetadataRecord>,
    pub summary: LibrarySummary,
    pub enrichment: Option<Enrichment>,
    pub report_paths: Vec<PathBuf>,
}

/// Transcode or copy every file under the input root
pub fn run_conversion(
    config: &ConvertConfig,
    transcoder: &dyn Transcoder,
    observer: &mut dyn PipelineObserver,
    context: &RunContext,
) -> Result<RunStatus<ConversionRun>, PipelineError> {
    let items = scanner::discover(&config.input_dir, &config.output_dir)?;
    if items.is_empty() {
        info!("No files found to process in {:?}", config.input_dir);
        return Ok(RunStatus::NoFiles);
    }

    let pool = WorkerPool::new(config.effective_workers())?;
    info!("Processing {} files with {} workers", items.len(), pool.workers());

    let classifier = Classifier::new(config, transcoder);
    let plan = classifier.plan(&items);
    let mut tracker = ProgressTracker::new(items.len() as u64);
    let mut aggregator = ResultAggregator::new();
    let start = Instant::now();

    observer.on_start("convert", items.len() as u64);
    pool.dispatch(
        &plan,
        |planned| classifier.classify_planned(planned),
        |completion| {
            let outcome = match completion.result {
                TaskResult::Done(outcome) => outcome,
                TaskResult::Panicked(message) => {
                    Outcome::error(items[completion.index].source.clone(), message)
                }
            };

            let error_message = match &outcome {
                Outcome::Error { source, message } => {
                    error!("Failed to process {:?}: {}", source, message);
                    Some(message.as_str())
                }
                _ => None,
            };

            let snapshot = tracker.record(start.elapsed());
            observer.on_item(
                &snapshot,
                &ItemEvent {
                    status: outcome.kind().as_str(),
                    path: outcome.path(),
                    error: error_message,
                },
            );
            aggregator.record(&outcome);
        },
    );

    let elapsed = start.elapsed();
    let (report, errors) = aggregator.finish(elapsed);
    let report_paths = write_conversion_reports(context, &report, &errors)?;

    info!(
        "Completed {} files in {}s ({} failed). Output in {:?}",
        report.total_files_processed,
        report.total_time_sec,
        report.error_count(),
        config.output_dir
    );
    observer.on_finish(&FinishEvent {
        processed: report.total_files_processed,
        failed: report.error_count(),
        elapsed,
        reports: report_paths.clone(),
    });

    Ok(RunStatus::Completed(ConversionRun {
        report,
        errors,
        report_paths,
    }))
}

/// Extract metadata from every audio file and summarize the library
pub fn run_metadata(
    config: &MetadataConfig,
    reader: &dyn TagReader,
    enricher: Option<&dyn Enricher>,
    observer: &mut dyn PipelineObserver,
    context: &RunContext,
) -> Result<RunStatus<MetadataRun>, PipelineError> {
    info!("Searching for audio files in {:?}", config.music_dir);
    let files = scanner::discover_audio(&config.music_dir, |ext| config.is_audio(ext))?;
    info!("Audio files found: {}", files.len());
    if files.is_empty() {
        return Ok(RunStatus::NoFiles);
    }

    let pool = WorkerPool::new(config.effective_workers())?;
    let mut tracker = ProgressTracker::new(files.len() as u64);
    let mut indexed: Vec<(usize, AudioMetadataRecord)> = Vec::with_capacity(files.len());
    let start = Instant::now();

    observer.on_start("metadata", files.len() as u64);
    pool.dispatch(
        &files,
        |path| extract_record(reader, path),
        |completion| {
            let record = match completion.result {
                TaskResult::Done(record) => record,
                TaskResult::Panicked(message) => {
                    let path = &files[completion.index];
                    log::warn!("Tag extraction panicked on {:?}: {}", path, message);
                    None
                }
            };

            let snapshot = tracker.record(start.elapsed());
            observer.on_item(
                &snapshot,
                &ItemEvent {
                    status: if record.is_some() { "analyzed" } else { "unreadable" },
                    path: &files[completion.index],
                    error: None,
                },
            );
            if let Some(record) = record {
                indexed.push((completion.index, record));
            }
        },
    );

    let elapsed = start.elapsed();
    indexed.sort_by_key(|(index, _)| *index);
    let records: Vec<AudioMetadataRecord> = indexed.into_iter().map(|(_, r)| r).collect();

    let mut summary = build_summary(&records, elapsed);
    let mut report_paths = Vec::new();

    let enrichment = match enricher {
        Some(enricher) => {
            info!("Requesting AI analysis, this may take a moment...");
            let enrichment = apply_enrichment(&mut summary, enricher);
            if let Enrichment::Text(text) = &enrichment {
                let path = context.enrichment_text();
                write_text(&path, &format!("{}{}", ENRICHMENT_HEADER, text))?;
                report_paths.push(path);
            }
            Some(enrichment)
        }
        None => None,
    };

    let summary_path = context.metadata_summary();
    write_json(&summary_path, &summary)?;
    let records_path = context.metadata_report();
    write_json(&records_path, &records)?;
    report_paths.push(summary_path);
    report_paths.push(records_path);

    info!(
        "Analyzed {} of {} files in {:.2}s",
        records.len(),
        files.len(),
        elapsed.as_secs_f64()
    );
    observer.on_finish(&FinishEvent {
        processed: files.len() as u64,
        failed: 0,
        elapsed,
        reports: report_paths.clone(),
    });

    Ok(RunStatus::Completed(MetadataRun {
        records,
        summary,
        enrichment,
        report_paths,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EnrichError, ItemError, PipelineErrorKind};
    use crate::models::OutcomeKind;
    use crate::progress::{NullObserver, ProgressSnapshot};
    use crate::tags::{RawAudio, TagContainer};
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    /// Writes the source name into the destination, or fails for configured names
    struct FakeTranscoder {
        fail: HashSet<&'static str>,
        panic_on: Option<&'static str>,
        delay: Duration,
    }

    impl FakeTranscoder {
        fn ok() -> Self {
            Self {
                fail: HashSet::new(),
                panic_on: None,
                delay: Duration::ZERO,
            }
        }

        fn failing(names: &[&'static str]) -> Self {
            Self {
                fail: names.iter().copied().collect(),
                ..Self::ok()
            }
        }
    }

    impl Transcoder for FakeTranscoder {
        fn transcode(&self, input: &Path, output: &Path) -> Result<(), ItemError> {
            let name = input.file_name().unwrap().to_str().unwrap();
            if self.panic_on == Some(name) {
                panic!("encoder crashed on {}", name);
            }
            if self.fail.contains(name) {
                let message = format!("ffmpeg exited 1 for {}", name);
                return Err(ItemError::TransformFailure(message));
            }
            std::thread::sleep(self.delay);
            fs::write(output, name).map_err(ItemError::Io)
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        started: Option<u64>,
        completed: Vec<u64>,
        statuses: Vec<String>,
        finished: Option<u64>,
    }

    impl RecordingObserver {
        fn count(&self, kind: OutcomeKind) -> usize {
            self.statuses.iter().filter(|s| *s == kind.as_str()).count()
        }
    }

    impl PipelineObserver for RecordingObserver {
        fn on_start(&mut self, _pipeline: &str, total: u64) {
            self.started = Some(total);
        }

        fn on_item(&mut self, snapshot: &ProgressSnapshot, event: &ItemEvent<'_>) {
            self.completed.push(snapshot.completed);
            self.statuses.push(event.status.to_string());
        }

        fn on_finish(&mut self, event: &FinishEvent) {
            self.finished = Some(event.processed);
        }
    }

    fn tree(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            let path = dir.path().join(f);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, vec![0u8; 24_000]).unwrap();
        }
        dir
    }

    fn convert_config(input: &Path, output: &Path) -> ConvertConfig {
        ConvertConfig::builder()
            .input_dir(input)
            .output_dir(output)
            .transform_extensions(["flac", "wav"])
            .num_workers(3)
            .show_progress(false)
            .build()
    }

    /// Run a conversion that is expected to find files
    fn convert(
        config: &ConvertConfig,
        transcoder: &dyn Transcoder,
        observer: &mut dyn PipelineObserver,
        ctx: &RunContext,
    ) -> ConversionRun {
        run_conversion(config, transcoder, observer, ctx)
            .unwrap()
            .completed()
            .unwrap()
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn kinds(report: &RunReport) -> (usize, usize, usize, usize) {
        (
            report.converted.len(),
            report.copied.len(),
            report.skipped.len(),
            report.failed.len(),
        )
    }

    #[test]
    fn test_end_to_end_conversion() {
        let input = tree(&["a.flac", "b.jpg", "c.wav"]);
        let output = tempfile::tempdir().unwrap();
        let logs = tempfile::tempdir().unwrap();
        let config = convert_config(input.path(), output.path());
        let ctx = RunContext::new(logs.path());
        let mut observer = RecordingObserver::default();

        let run = convert(&config, &FakeTranscoder::ok(), &mut observer, &ctx);

        assert!(output.path().join("a.mp3").exists());
        assert!(output.path().join("b.jpg").exists());
        assert!(output.path().join("c.mp3").exists());
        assert_eq!(kinds(&run.report), (2, 1, 0, 0));
        assert_eq!(run.report.total_files_processed, 3);
        assert!(run.errors.is_empty());

        let converted: HashSet<_> = run.report.converted.iter().cloned().collect();
        let expected: HashSet<_> = ["a.mp3", "c.mp3"]
            .iter()
            .map(|n| output.path().join(n).to_string_lossy().to_string())
            .collect();
        assert_eq!(converted, expected);

        assert_eq!(observer.started, Some(3));
        assert_eq!(observer.completed, vec![1, 2, 3]);
        assert_eq!(observer.finished, Some(3));

        assert_eq!(read_json(&run.report_paths[0]), serde_json::json!([]));
        let summary = read_json(&run.report_paths[1]);
        assert_eq!(summary["total_files_processed"], 3);
        assert_eq!(summary["converted"].as_array().unwrap().len(), 2);
        assert_eq!(summary["copied"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_failure_is_isolated() {
        let input = tree(&["a.flac", "b.jpg", "c.wav"]);
        let output = tempfile::tempdir().unwrap();
        let logs = tempfile::tempdir().unwrap();
        let config = convert_config(input.path(), output.path());
        let ctx = RunContext::new(logs.path());

        let transcoder = FakeTranscoder::failing(&["a.flac"]);
        let run = convert(&config, &transcoder, &mut NullObserver, &ctx);

        assert_eq!(kinds(&run.report), (1, 1, 0, 1));
        assert_eq!(run.report.total_files_processed, 3);
        assert_eq!(run.errors.len(), 1);
        assert_eq!(run.errors[0].file, "a.flac");
        assert!(run.errors[0].error.contains("exited 1"));
        assert!(!output.path().join("a.mp3").exists());

        let errors = read_json(&run.report_paths[0]);
        assert_eq!(errors.as_array().unwrap().len(), 1);
        assert_eq!(errors[0]["file"], "a.flac");
    }

    #[test]
    fn test_panicking_transcode_becomes_error_entry() {
        let input = tree(&["boom.flac", "ok.wav", "cover.jpg"]);
        let output = tempfile::tempdir().unwrap();
        let logs = tempfile::tempdir().unwrap();
        let config = convert_config(input.path(), output.path());
        let ctx = RunContext::new(logs.path());
        let mut observer = RecordingObserver::default();

        let transcoder = FakeTranscoder {
            panic_on: Some("boom.flac"),
            ..FakeTranscoder::ok()
        };
        let run = convert(&config, &transcoder, &mut observer, &ctx);

        assert_eq!(kinds(&run.report), (1, 1, 0, 1));
        assert_eq!(run.report.total_files_processed, 3);
        assert_eq!(run.errors[0].file, "boom.flac");
        assert_eq!(run.errors[0].error, "encoder crashed on boom.flac");
        assert_eq!(observer.count(OutcomeKind::Failed), 1);
        assert_eq!(observer.completed, vec![1, 2, 3]);
    }

    #[test]
    fn test_shared_destination_is_written_once() {
        let input = tree(&["a.flac", "a.wav"]);
        let output = tempfile::tempdir().unwrap();
        let logs = tempfile::tempdir().unwrap();
        let config = convert_config(input.path(), output.path());
        let ctx = RunContext::new(logs.path());

        let transcoder = FakeTranscoder {
            delay: Duration::from_millis(50),
            ..FakeTranscoder::ok()
        };
        let run = convert(&config, &transcoder, &mut NullObserver, &ctx);

        assert_eq!(kinds(&run.report), (1, 0, 0, 1));
        let destination = output.path().join("a.mp3");
        assert_eq!(
            run.report.converted,
            vec![destination.to_string_lossy().to_string()]
        );
        assert_eq!(fs::read_to_string(&destination).unwrap(), "a.flac");
        assert_eq!(run.errors[0].file, "a.wav");
        assert!(run.errors[0].error.contains("already claimed"));

        // The losing item keeps losing on a re-run; the winner is skipped
        let again = convert(&config, &transcoder, &mut NullObserver, &ctx);
        assert_eq!(kinds(&again.report), (0, 0, 1, 1));
        assert_eq!(fs::read_to_string(&destination).unwrap(), "a.flac");
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let input = tree(&["Album/01.flac", "Album/cover.jpg", "Album/02.WAV", "notes.txt"]);
        let output = tempfile::tempdir().unwrap();
        let logs = tempfile::tempdir().unwrap();
        let config = convert_config(input.path(), output.path());
        let ctx = RunContext::new(logs.path());

        let first = convert(&config, &FakeTranscoder::ok(), &mut NullObserver, &ctx);
        assert_eq!(kinds(&first.report), (2, 2, 0, 0));

        let marker = output.path().join("Album/01.mp3");
        fs::write(&marker, b"first run").unwrap();

        let transcoder = FakeTranscoder::failing(&["01.flac", "02.WAV"]);
        let second = convert(&config, &transcoder, &mut NullObserver, &ctx);
        assert_eq!(kinds(&second.report), (0, 0, 4, 0));
        assert_eq!(fs::read(&marker).unwrap(), b"first run");
    }

    #[test]
    fn test_classification_follows_extension() {
        let input = tree(&["x.flac", "y.FLAC", "z.mp3", "w.ogg", "v.wav"]);
        let output = tempfile::tempdir().unwrap();
        let logs = tempfile::tempdir().unwrap();
        let config = convert_config(input.path(), output.path());
        let ctx = RunContext::new(logs.path());
        let mut observer = RecordingObserver::default();

        convert(&config, &FakeTranscoder::failing(&["v.wav"]), &mut observer, &ctx);

        assert_eq!(observer.count(OutcomeKind::Converted), 2);
        assert_eq!(observer.count(OutcomeKind::Copied), 2);
        assert_eq!(observer.count(OutcomeKind::Failed), 1);
    }

    #[test]
    fn test_empty_tree_reports_no_files() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let logs = tempfile::tempdir().unwrap();
        let config = convert_config(input.path(), output.path());
        let ctx = RunContext::new(logs.path());

        let status = run_conversion(&config, &FakeTranscoder::ok(), &mut NullObserver, &ctx);
        assert!(matches!(status.unwrap(), RunStatus::NoFiles));
        assert_eq!(fs::read_dir(logs.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let output = tempfile::tempdir().unwrap();
        let config = convert_config(Path::new("/no/such/input"), output.path());
        let ctx = RunContext::new(output.path());

        let err = run_conversion(&config, &FakeTranscoder::ok(), &mut NullObserver, &ctx)
            .unwrap_err();
        assert_eq!(err.kind, PipelineErrorKind::InvalidInput);
    }

    #[test]
    fn test_unwritable_reports_are_fatal() {
        let input = tree(&["a.jpg"]);
        let output = tempfile::tempdir().unwrap();
        let blocker = output.path().join("logs-file");
        fs::write(&blocker, b"x").unwrap();
        let config = convert_config(input.path(), &output.path().join("out"));
        let ctx = RunContext::new(&blocker);

        let err = run_conversion(&config, &FakeTranscoder::ok(), &mut NullObserver, &ctx)
            .unwrap_err();
        assert_eq!(err.kind, PipelineErrorKind::ReportWrite);
    }

    /// Reads tags from an in-memory table keyed by file name
    struct FakeTagReader;

    impl TagReader for FakeTagReader {
        fn read(&self, path: &Path) -> Option<RawAudio> {
            let name = path.file_name()?.to_str()?;
            let (artist, genre, track) = match name {
                "01.mp3" => ("Soda Stereo", "Rock", "1/10"),
                "02.flac" => ("Soda Stereo", "Rock", "2"),
                "03.ogg" => ("Cerati", "Pop", "x"),
                "crash.mp3" => panic!("parser crashed on {}", name),
                _ => return None,
            };
            let tags: TagContainer = [("artist", artist), ("genre", genre), ("TRCK", track)]
                .into_iter()
                .collect();
            Some(RawAudio {
                tags,
                duration: 0.0,
                bitrate: 0,
            })
        }
    }

    struct CountingEnricher {
        reply: Result<&'static str, ()>,
        calls: std::cell::Cell<usize>,
    }

    impl CountingEnricher {
        fn new(reply: Result<&'static str, ()>) -> Self {
            Self {
                reply,
                calls: std::cell::Cell::new(0),
            }
        }
    }

    impl Enricher for CountingEnricher {
        fn enrich(&self, _summary: &LibrarySummary) -> Result<String, EnrichError> {
            self.calls.set(self.calls.get() + 1);
            self.reply
                .map(str::to_string)
                .map_err(|_| EnrichError::Request("offline".to_string()))
        }
    }

    fn metadata_config(root: &Path) -> MetadataConfig {
        MetadataConfig::builder()
            .music_dir(root)
            .num_workers(2)
            .show_progress(false)
            .build()
    }

    /// Run a metadata analysis that is expected to find files
    fn analyze(
        root: &Path,
        enricher: Option<&dyn Enricher>,
        observer: &mut dyn PipelineObserver,
        ctx: &RunContext,
    ) -> MetadataRun {
        run_metadata(&metadata_config(root), &FakeTagReader, enricher, observer, ctx)
            .unwrap()
            .completed()
            .unwrap()
    }

    #[test]
    fn test_metadata_pipeline_without_enrichment() {
        let music = tree(&["a/01.mp3", "a/02.flac", "b/03.ogg", "b/broken.wav", "cover.jpg"]);
        let out = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(out.path());
        let mut observer = RecordingObserver::default();

        let run = analyze(music.path(), None, &mut observer, &ctx);

        // cover.jpg is never enumerated; broken.wav yields no record
        assert_eq!(observer.started, Some(4));
        assert_eq!(run.records.len(), 3);
        assert!(run.records[0].path.ends_with("01.mp3"));
        assert_eq!(run.records[0].track, "1/10");
        assert_eq!(run.records[2].track, "");
        assert!(run.records.iter().all(|r| r.bitrate == 192));
        assert_eq!(run.records[0].duration, 24_000.0 * 8.0 / 192_000.0);

        assert_eq!(run.summary.archivos_analizados, 3);
        assert_eq!(run.summary.artistas_unicos, 2);
        assert_eq!(run.summary.genero_predominante, "Rock");
        assert!(run.summary.analisis_ia.is_none());
        assert!(run.enrichment.is_none());
        assert!(!ctx.enrichment_text().exists());

        let summary = read_json(&ctx.metadata_summary());
        assert_eq!(summary["archivos_analizados"], 3);
        assert!(summary.get("analisis_ia").is_none());
        let records = read_json(&ctx.metadata_report());
        assert_eq!(records.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_panicking_tag_reader_yields_no_record() {
        let music = tree(&["01.mp3", "02.flac", "crash.mp3"]);
        let out = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(out.path());
        let mut observer = RecordingObserver::default();

        let run = analyze(music.path(), None, &mut observer, &ctx);

        assert_eq!(run.records.len(), 2);
        assert!(run.records.iter().all(|r| !r.path.ends_with("crash.mp3")));
        assert_eq!(run.summary.archivos_analizados, 2);
        assert_eq!(observer.completed, vec![1, 2, 3]);
        assert_eq!(
            observer.statuses.iter().filter(|s| *s == "unreadable").count(),
            1
        );
    }

    #[test]
    fn test_metadata_enrichment_success_writes_text() {
        let music = tree(&["01.mp3"]);
        let out = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(out.path());
        let enricher = CountingEnricher::new(Ok("Perfil rockero"));

        let run = analyze(music.path(), Some(&enricher), &mut NullObserver, &ctx);

        assert_eq!(enricher.calls.get(), 1);
        assert_eq!(run.summary.analisis_ia.as_deref(), Some("Perfil rockero"));
        let text = fs::read_to_string(ctx.enrichment_text()).unwrap();
        assert_eq!(text, "Análisis de IA:\n\nPerfil rockero");
        assert_eq!(run.report_paths.len(), 3);
    }

    #[test]
    fn test_metadata_enrichment_failure_uses_placeholder() {
        let music = tree(&["01.mp3", "02.flac"]);
        let out = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(out.path());
        let enricher = CountingEnricher::new(Err(()));

        let run = analyze(music.path(), Some(&enricher), &mut NullObserver, &ctx);

        assert_eq!(run.enrichment, Some(Enrichment::Placeholder));
        assert_eq!(run.summary.archivos_analizados, 2);
        assert_eq!(
            run.summary.analisis_ia.as_deref(),
            Some(crate::enrich::ENRICHMENT_PLACEHOLDER)
        );
        assert!(!ctx.enrichment_text().exists());
        assert_eq!(run.report_paths.len(), 2);
    }

    #[test]
    fn test_metadata_without_audio_reports_no_files() {
        let music = tree(&["cover.jpg"]);
        let out = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(out.path());

        let config = metadata_config(music.path());
        let status = run_metadata(&config, &FakeTagReader, None, &mut NullObserver, &ctx);
        assert!(matches!(status.unwrap(), RunStatus::NoFiles));
    }
}
