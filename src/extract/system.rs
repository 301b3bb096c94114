//! CPU, memory, battery and Python environment probes.
//!
//! CPU and memory go through `sysinfo` on every platform. Battery reads sysfs
//! and is Linux-only; elsewhere the field is simply omitted.

use std::path::Path;
use std::time::Duration;

use sysinfo::System;

use super::command::command_version;

const PYTHON_TIMEOUT: Duration = Duration::from_millis(500);
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Whole-percent busy figure, e.g. `45%`.
pub fn format_cpu(usage: f32) -> Option<String> {
    usage
        .is_finite()
        .then(|| format!("{:.0}%", usage.clamp(0.0, 100.0)))
}

/// `NNNMB` under 1 GB, else `N.NGB`.
pub fn format_memory(used_bytes: u64) -> String {
    let used_mb = used_bytes as f64 / BYTES_PER_MB;
    if used_mb < 1024.0 {
        format!("{:.0}MB", used_mb)
    } else {
        format!("{:.1}GB", used_mb / 1024.0)
    }
}

/// Global CPU usage from two samples one refresh interval apart.
pub fn cpu_usage() -> Option<String> {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    if sys.cpus().is_empty() {
        return None;
    }
    format_cpu(sys.global_cpu_usage())
}

/// Used memory (total minus available).
pub fn memory_usage() -> Option<String> {
    let mut sys = System::new();
    sys.refresh_memory();
    if sys.total_memory() == 0 {
        return None;
    }
    Some(format_memory(sys.used_memory()))
}

#[cfg(target_os = "linux")]
pub fn battery() -> Option<String> {
    battery_in(Path::new("/sys/class/power_supply"))
}

#[cfg(not(target_os = "linux"))]
pub fn battery() -> Option<String> {
    None
}

/// First `BAT*` supply under `dir` with a readable capacity.
pub fn battery_in(dir: &Path) -> Option<String> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("BAT"))
        .map(|e| e.path())
        .collect();
    entries.sort();

    entries.iter().find_map(|path| {
        let capacity = std::fs::read_to_string(path.join("capacity")).ok()?;
        let capacity: u8 = capacity.trim().parse().ok()?;
        Some(format!("{}%", capacity))
    })
}

/// `python3 --version` without the `Python ` prefix.
pub fn python_version() -> Option<String> {
    let line = command_version("python3", PYTHON_TIMEOUT)?;
    let version = line.strip_prefix("Python ").unwrap_or(&line).trim();
    (!version.is_empty()).then(|| version.to_string())
}

/// Name of the active virtualenv, from `$VIRTUAL_ENV`.
pub fn python_venv() -> Option<String> {
    let path = std::env::var_os("VIRTUAL_ENV").filter(|p| !p.is_empty())?;
    venv_name(Path::new(&path))
}

pub fn venv_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

pub fn datetime() -> Option<String> {
    Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_format_cpu() {
        assert_eq!(format_cpu(45.4), Some("45%".into()));
        assert_eq!(format_cpu(0.0), Some("0%".into()));
        assert_eq!(format_cpu(f32::NAN), None);
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory(8_384_000 * 1024), "8.0GB");
        assert_eq!(format_memory(512_000 * 1024), "500MB");
    }

    #[test]
    fn test_host_readings_are_formatted() {
        if let Some(mem) = memory_usage() {
            assert!(mem.ends_with("MB") || mem.ends_with("GB"), "{}", mem);
        }
        if let Some(cpu) = cpu_usage() {
            assert!(cpu.ends_with('%'), "{}", cpu);
        }
    }

    #[test]
    fn test_battery_in() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("AC")).unwrap();
        std::fs::create_dir(dir.path().join("BAT0")).unwrap();
        std::fs::write(dir.path().join("BAT0/capacity"), "85\n").unwrap();
        assert_eq!(battery_in(dir.path()), Some("85%".into()));

        let empty = TempDir::new().unwrap();
        assert_eq!(battery_in(empty.path()), None);
    }

    #[test]
    fn test_venv_name() {
        assert_eq!(venv_name(Path::new("/home/u/proj/.venv")), Some(".venv".into()));
    }

    #[test]
    fn test_datetime_shape() {
        let now = datetime().unwrap();
        assert_eq!(now.len(), 19);
        assert_eq!(&now[4..5], "-");
        assert_eq!(&now[10..11], " ");
    }
}
