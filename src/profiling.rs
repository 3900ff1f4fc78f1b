//! Instrumentation hooks bracketing a run
//!
//! The orchestrator never touches these. The binary arms them before
//! the run and disarms them after; the on-disk formats belong to the
//! external profilers (pprof flamegraphs, dhat JSON), not to this
//! crate.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::BenchError;

/// Samples the CPU for the lifetime of the guard and writes a
/// flamegraph on [`stop`](CpuProfiler::stop).
pub struct CpuProfiler {
    guard: pprof::ProfilerGuard<'static>,
    path: PathBuf,
}

impl CpuProfiler {
    /// Sampling frequency in Hz.
    const FREQUENCY: i32 = 100;

    /// Start sampling. The profile lands at `path` on stop.
    pub fn start(path: &Path) -> Result<Self, BenchError> {
        let guard = pprof::ProfilerGuardBuilder::default()
            .frequency(Self::FREQUENCY)
            .blocklist(&["libc", "libgcc", "pthread", "vdso"])
            .build()?;
        Ok(Self {
            guard,
            path: path.to_path_buf(),
        })
    }

    /// Stop sampling and write the flamegraph.
    pub fn stop(self) -> Result<(), BenchError> {
        let report = self.guard.report().build()?;
        let file = File::create(&self.path).map_err(|source| BenchError::ProfileCreate {
            path: self.path.clone(),
            source,
        })?;
        report.flamegraph(file)?;
        Ok(())
    }
}

impl fmt::Debug for CpuProfiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuProfiler")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Records heap activity for the lifetime of the guard; the profile is
/// written when the guard drops.
#[cfg(feature = "heap-profile")]
pub struct HeapProfiler {
    _profiler: dhat::Profiler,
}

#[cfg(feature = "heap-profile")]
impl HeapProfiler {
    /// Start recording. The profile lands at `path` when the guard
    /// drops at the end of the process.
    pub fn start(path: &Path) -> Result<Self, BenchError> {
        // dhat writes only on drop; surface an unwritable path before
        // any work happens.
        File::create(path).map_err(|source| BenchError::ProfileCreate {
            path: path.to_path_buf(),
            source,
        })?;
        let profiler = dhat::Profiler::builder()
            .file_name(path.to_path_buf())
            .build();
        Ok(Self {
            _profiler: profiler,
        })
    }
}

#[cfg(feature = "heap-profile")]
impl fmt::Debug for HeapProfiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapProfiler").finish_non_exhaustive()
    }
}

/// Stub used when the crate is built without the `heap-profile`
/// feature.
#[cfg(not(feature = "heap-profile"))]
#[derive(Debug)]
pub struct HeapProfiler {}

#[cfg(not(feature = "heap-profile"))]
impl HeapProfiler {
    /// Always fails: heap recording needs the `heap-profile` feature.
    pub fn start(_path: &Path) -> Result<Self, BenchError> {
        Err(BenchError::HeapProfileDisabled)
    }
}
