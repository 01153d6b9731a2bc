use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gclog::{Engine, Event, PipelineMetrics};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};

/// Destination for JSON lines, shared by every scan task.
pub type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

pub fn stdout_sink() -> Sink {
    Arc::new(Mutex::new(Box::new(std::io::stdout())))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    pub path: String,
    pub events: u64,
    pub unknown: u64,
    /// Sum of durations of events that stopped application threads.
    pub total_pause_ms: u64,
}

#[derive(Serialize)]
struct EventLine<'a> {
    file: &'a str,
    event: &'a Event,
}

/// Read one log file and write its events to the sink. Blocking.
pub fn scan_file(
    path: &Path,
    engine: &Engine,
    include_unknown: bool,
    sink: &Sink,
) -> ScanResult<FileReport> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| ScanError::Open {
        path: display.clone(),
        source,
    })?;

    // The engine consumes plain strings; the first read error stops the
    // input and is reported once the timeline is drained.
    let read_error: Arc<Mutex<Option<std::io::Error>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&read_error);
    let lines = BufReader::new(file)
        .split(b'\n')
        .map_while(move |chunk| match chunk {
            Ok(bytes) => {
                let mut text = String::from_utf8_lossy(&bytes).into_owned();
                if text.ends_with('\r') {
                    text.pop();
                }
                Some(text)
            }
            Err(e) => {
                *slot.lock() = Some(e);
                None
            }
        });

    let mut report = FileReport {
        path: display.clone(),
        ..FileReport::default()
    };

    for event in engine.run(lines)? {
        report.events += 1;
        if event.is_unknown() {
            report.unknown += 1;
            if !include_unknown {
                continue;
            }
        }
        if event.is_blocking() {
            report.total_pause_ms += event.duration_ms().map_or(0, u64::from);
        }

        let mut out = sink.lock();
        serde_json::to_writer(
            &mut *out,
            &EventLine {
                file: &display,
                event: &event,
            },
        )?;
        out.write_all(b"\n")?;
    }

    if let Some(source) = read_error.lock().take() {
        return Err(ScanError::Read {
            path: display,
            source,
        });
    }

    debug!(
        path = %report.path,
        events = report.events,
        unknown = report.unknown,
        "Finished scanning file"
    );
    Ok(report)
}

/// Scan every path with at most `max_parallel_files` files in flight.
/// Results come back in the order the paths were given.
pub async fn scan_files(
    paths: Vec<PathBuf>,
    config: &ScanConfig,
    metrics: Arc<PipelineMetrics>,
    sink: Sink,
) -> Vec<(PathBuf, ScanResult<FileReport>)> {
    let engine = Engine::with_metrics(config.engine.clone(), metrics);
    let semaphore = Arc::new(Semaphore::new(config.max_parallel_files.max(1)));
    let include_unknown = config.output.include_unknown;

    info!(files = paths.len(), parallel = config.max_parallel_files, "Starting scan");

    let mut tasks = JoinSet::new();
    let mut task_index = HashMap::with_capacity(paths.len());
    for (index, path) in paths.iter().cloned().enumerate() {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let engine = engine.clone();
        let sink = Arc::clone(&sink);
        let handle = tasks.spawn_blocking(move || {
            let _permit = permit;
            let result = scan_file(&path, &engine, include_unknown, &sink);
            (index, result)
        });
        task_index.insert(handle.id(), index);
    }

    let mut slots: Vec<Option<ScanResult<FileReport>>> = paths.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => {
                warn!(error = %e, "Scan task failed");
                if let Some(&index) = task_index.get(&e.id()) {
                    slots[index] = Some(Err(ScanError::Join(e)));
                }
            }
        }
    }

    if let Err(e) = sink.lock().flush() {
        warn!(error = %e, "Failed to flush event output");
    }

    paths
        .into_iter()
        .zip(slots)
        .map(|(path, slot)| (path, slot.unwrap_or(Err(ScanError::Cancelled))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture() -> (SharedBuf, Sink) {
        let buf = SharedBuf::default();
        let sink: Sink = Arc::new(Mutex::new(Box::new(buf.clone())));
        (buf, sink)
    }

    fn output_lines(buf: &SharedBuf) -> Vec<serde_json::Value> {
        let bytes = buf.0.lock().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn test_scan_file_writes_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            dir.path(),
            "gc.log",
            &[
                "1.219: [GC 1.219: [ParNew",
                "Desired survivor size 2228224 bytes, new threshold 1 (max 15)",
                ": 17024K->2112K(19136K), 0.0222560 secs] 17024K->3046K(83008K), 0.0223810 secs]",
                "251.781: [CMS-concurrent-mark-start]",
                "something else entirely",
            ],
        );
        let (buf, sink) = capture();

        let report = scan_file(&path, &Engine::default(), true, &sink).unwrap();
        assert_eq!(report.events, 3);
        assert_eq!(report.unknown, 1);
        assert_eq!(report.total_pause_ms, 22);

        let out = output_lines(&buf);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["event"]["body"]["kind"], "par_new");
        assert_eq!(out[1]["event"]["body"]["kind"], "cms_concurrent_start");
        assert_eq!(out[2]["event"]["body"]["kind"], "unknown");
        assert!(out[0]["file"].as_str().unwrap().ends_with("gc.log"));
    }

    #[test]
    fn test_scan_file_can_skip_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            dir.path(),
            "gc.log",
            &["106.129: [GC remark, 0.0450170 secs]", "not a gc line"],
        );
        let (buf, sink) = capture();

        let report = scan_file(&path, &Engine::default(), false, &sink).unwrap();
        assert_eq!(report.events, 2);
        assert_eq!(report.unknown, 1);
        assert_eq!(output_lines(&buf).len(), 1);
    }

    #[test]
    fn test_scan_file_strips_carriage_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.log");
        std::fs::write(&path, "251.781: [CMS-concurrent-mark-start]\r\n").unwrap();
        let (buf, sink) = capture();

        scan_file(&path, &Engine::default(), true, &sink).unwrap();
        let out = output_lines(&buf);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["event"]["raw_text"], "251.781: [CMS-concurrent-mark-start]");
    }

    #[test]
    fn test_scan_file_missing_path() {
        let (_, sink) = capture();
        let err = scan_file(Path::new("/nonexistent/gc.log"), &Engine::default(), true, &sink)
            .unwrap_err();
        assert!(matches!(err, ScanError::Open { .. }));
    }

    #[tokio::test]
    async fn test_scan_files_keeps_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_log(dir.path(), "a.log", &["106.129: [GC remark, 0.0450170 secs]"]);
        let missing = dir.path().join("missing.log");
        let second = write_log(
            dir.path(),
            "b.log",
            &[
                "251.781: [CMS-concurrent-mark-start]",
                "Total time for which application threads were stopped: 0.0017810 seconds",
            ],
        );
        let (buf, sink) = capture();
        let metrics = Arc::new(PipelineMetrics::new());
        let config = ScanConfig {
            max_parallel_files: 2,
            ..ScanConfig::default()
        };

        let results = scan_files(
            vec![first.clone(), missing.clone(), second.clone()],
            &config,
            Arc::clone(&metrics),
            sink,
        )
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, first);
        assert_eq!(results[1].0, missing);
        assert_eq!(results[2].0, second);
        assert_eq!(results[0].1.as_ref().unwrap().events, 1);
        assert!(matches!(results[1].1, Err(ScanError::Open { .. })));
        assert_eq!(results[2].1.as_ref().unwrap().events, 2);

        assert_eq!(output_lines(&buf).len(), 3);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events, 3);
        assert_eq!(snapshot.lines_read, 3);
    }
}
