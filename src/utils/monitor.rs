#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ResourceStats {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

/// Process CPU/memory snapshots logged around a crawl.
#[cfg(feature = "cli")]
pub struct ResourceMonitor {
    system: Option<Mutex<System>>,
    pid: Option<Pid>,
    started: Instant,
    peak_memory_mb: AtomicU64,
}

#[cfg(feature = "cli")]
impl ResourceMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = sysinfo::get_current_pid().ok();
        let system = (enabled && pid.is_some()).then(|| {
            let mut system = System::new_with_specifics(RefreshKind::everything());
            system.refresh_all();
            Mutex::new(system)
        });

        Self {
            system,
            pid,
            started: Instant::now(),
            peak_memory_mb: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.system.is_some()
    }

    pub fn snapshot(&self) -> Option<ResourceStats> {
        let mut system = self.system.as_ref()?.lock().ok()?;
        system.refresh_all();
        let process = system.process(self.pid?)?;

        let memory_mb = process.memory() / 1024 / 1024;
        let peak = self.peak_memory_mb.fetch_max(memory_mb, Ordering::Relaxed).max(memory_mb);

        Some(ResourceStats {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: peak,
            elapsed: self.started.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.snapshot() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_mb,
                stats.peak_memory_mb,
                stats.elapsed
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.snapshot() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.elapsed,
                stats.peak_memory_mb
            );
        }
    }
}

// 非 CLI 環境使用空實現
#[cfg(not(feature = "cli"))]
pub struct ResourceMonitor;

#[cfg(not(feature = "cli"))]
impl ResourceMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}
}
