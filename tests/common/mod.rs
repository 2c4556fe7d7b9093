//! Fake tools and recording fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use filetime::FileTime;
use tempfile::TempDir;

use autocut::{
    CutDetector, DurationProbe, IndexRebuilder, Orchestrator, PolicyConfig, Recording, ToolError,
    Toolset,
};

pub const SCHEDULED_INFO: &str =
    "C S19.2E-1-1089-12003\nT Some episode\n@ <epgsearch><channel>1</channel></epgsearch>\n";

/// How often each fake tool was called
#[derive(Debug, Default)]
pub struct Calls {
    pub cutter: AtomicUsize,
    pub probe: AtomicUsize,
    pub indexer: AtomicUsize,
}

impl Calls {
    pub fn cutter(&self) -> usize {
        self.cutter.load(Ordering::SeqCst)
    }

    pub fn probe(&self) -> usize {
        self.probe.load(Ordering::SeqCst)
    }

    pub fn indexer(&self) -> usize {
        self.indexer.load(Ordering::SeqCst)
    }

    pub fn any(&self) -> usize {
        self.cutter() + self.probe() + self.indexer()
    }
}

/// What the fake markad does
#[derive(Debug, Clone)]
pub enum CutterBehavior {
    /// Write a marks file with this many lines and the cut output
    Cut { marks: usize },

    /// Write the marks file but no cut output
    MarksOnly { marks: usize },

    /// Exit non-zero without writing anything
    Fail,

    /// Binary not found
    Missing,
}

pub struct FakeCutter {
    pub behavior: CutterBehavior,
    pub calls: Arc<Calls>,
}

#[async_trait]
impl CutDetector for FakeCutter {
    fn name(&self) -> &str {
        "fake-markad"
    }

    async fn detect_cuts(&self, recording: &Path) -> Result<(), ToolError> {
        self.calls.cutter.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            CutterBehavior::Cut { marks } => {
                write_marks(recording, marks);
                let rec = Recording::new(recording);
                std::fs::write(rec.cut_output().unwrap(), b"cut").unwrap();
                Ok(())
            }
            CutterBehavior::MarksOnly { marks } => {
                write_marks(recording, marks);
                Ok(())
            }
            CutterBehavior::Fail => Err(ToolError::Failed {
                tool: "fake-markad".to_string(),
                exit_code: 1,
                stderr: "no logo found".to_string(),
            }),
            CutterBehavior::Missing => Err(ToolError::Spawn {
                tool: "fake-markad".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
        }
    }
}

fn write_marks(recording: &Path, marks: usize) {
    let lines: String = (0..marks)
        .map(|i| format!("0:{:02}:00.00 mark\n", i))
        .collect();
    std::fs::write(recording.join("marks"), lines).unwrap();
}

/// Durations looked up by file name
pub struct FakeProbe {
    pub durations: HashMap<String, f64>,
    pub calls: Arc<Calls>,
}

#[async_trait]
impl DurationProbe for FakeProbe {
    fn name(&self) -> &str {
        "fake-ffprobe"
    }

    async fn probe_duration(&self, media: &Path) -> Result<f64, ToolError> {
        self.calls.probe.fetch_add(1, Ordering::SeqCst);
        let name = media.file_name().unwrap().to_string_lossy().into_owned();
        self.durations.get(&name).copied().ok_or(ToolError::Parse {
            tool: "fake-ffprobe".to_string(),
            output: "N/A".to_string(),
        })
    }
}

pub struct FakeIndexer {
    pub fail: bool,
    pub calls: Arc<Calls>,
}

#[async_trait]
impl IndexRebuilder for FakeIndexer {
    fn name(&self) -> &str {
        "fake-vdr"
    }

    async fn rebuild_index(&self, _recording: &Path) -> Result<(), ToolError> {
        self.calls.indexer.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ToolError::Failed {
                tool: "fake-vdr".to_string(),
                exit_code: 2,
                stderr: "cannot write index".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for an orchestrator wired to fakes
pub struct Harness {
    pub cutter: CutterBehavior,
    pub durations: HashMap<String, f64>,
    pub indexer_fails: bool,
    pub dry_run: bool,
    pub calls: Arc<Calls>,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            cutter: CutterBehavior::Cut { marks: 5 },
            durations: durations(&[1200.0, 1200.0, 1200.0], "Some_episode", 2200.0),
            indexer_fails: false,
            dry_run: false,
            calls: Arc::new(Calls::default()),
        }
    }
}

impl Harness {
    pub fn orchestrator(&self) -> Orchestrator {
        let tools = Toolset {
            cutter: Box::new(FakeCutter {
                behavior: self.cutter.clone(),
                calls: self.calls.clone(),
            }),
            probe: Box::new(FakeProbe {
                durations: self.durations.clone(),
                calls: self.calls.clone(),
            }),
            indexer: Box::new(FakeIndexer {
                fail: self.indexer_fails,
                calls: self.calls.clone(),
            }),
        };
        Orchestrator::new(tools, PolicyConfig::default()).with_dry_run(self.dry_run)
    }
}

/// Segment durations for 00001.ts.. plus the cut output of `episode`
pub fn durations(segments: &[f64], episode: &str, cut: f64) -> HashMap<String, f64> {
    let mut map: HashMap<String, f64> = segments
        .iter()
        .enumerate()
        .map(|(i, secs)| (format!("{:05}.ts", i + 1), *secs))
        .collect();
    map.insert(format!("{}.ts", episode), cut);
    map
}

/// Create `<root>/<episode>/2021-07-26.20.03.6-0.rec` with three segments,
/// a scheduler `info` and an index last written three hours ago
pub fn make_recording(root: &Path, episode: &str) -> Recording {
    let dir: PathBuf = root.join(episode).join("2021-07-26.20.03.6-0.rec");
    std::fs::create_dir_all(&dir).unwrap();

    for name in ["00001.ts", "00002.ts", "00003.ts"] {
        std::fs::write(dir.join(name), b"original").unwrap();
    }
    std::fs::write(dir.join("info"), SCHEDULED_INFO).unwrap();
    std::fs::write(dir.join("index"), b"index").unwrap();
    set_index_age(&Recording::new(&dir), Duration::from_secs(3 * 3600));

    Recording::new(dir.canonicalize().unwrap())
}

/// Backdate the index mtime
pub fn set_index_age(recording: &Recording, age: Duration) {
    let mtime = FileTime::from_system_time(SystemTime::now() - age);
    filetime::set_file_mtime(recording.index_path(), mtime).unwrap();
}

/// Names of all `.ts` files left in the recording
pub fn ts_files(recording: &Recording) -> Vec<String> {
    recording
        .media_files()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

pub fn series_root() -> TempDir {
    TempDir::new().unwrap()
}
