//! Battery readout from the kernel power-supply class

use std::fs;
use std::path::PathBuf;

use tracing::debug;

/// Raw battery reading as reported by the platform.
///
/// Missing fields default to -1, matching what the event source reports
/// when it has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReading {
    pub level: i64,
    pub scale: i64,
}

impl BatteryReading {
    /// Reading with both fields missing
    pub const UNKNOWN: Self = Self {
        level: -1,
        scale: -1,
    };

    pub fn new(level: i64, scale: i64) -> Self {
        Self { level, scale }
    }

    /// Battery fraction in [0, 1], or `None` when the reading is unusable.
    ///
    /// A non-positive scale or a negative level means the level is unknown,
    /// not that anything failed.
    pub fn fraction(&self) -> Option<f64> {
        if self.level < 0 || self.scale <= 0 {
            return None;
        }
        Some((self.level as f64 / self.scale as f64).clamp(0.0, 1.0))
    }
}

/// Source of battery readings
pub trait BatteryProbe: Send + Sync {
    /// Read the current battery level; never fails, unusable values are
    /// reported as [`BatteryReading::UNKNOWN`]
    fn read(&self) -> BatteryReading;
}

/// Probe reading charge counters from a power-supply sysfs directory.
///
/// Prefers the energy counters, falls back to charge counters, and finally
/// to the precomputed `capacity` percentage.
pub struct SysfsBatteryProbe {
    dir: PathBuf,
}

impl SysfsBatteryProbe {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_value(&self, name: &str) -> Option<i64> {
        let raw = fs::read_to_string(self.dir.join(name)).ok()?;
        raw.trim().parse().ok()
    }
}

impl BatteryProbe for SysfsBatteryProbe {
    fn read(&self) -> BatteryReading {
        for (now, full) in [("energy_now", "energy_full"), ("charge_now", "charge_full")] {
            if let (Some(level), Some(scale)) = (self.read_value(now), self.read_value(full)) {
                return BatteryReading::new(level, scale);
            }
        }
        if let Some(percent) = self.read_value("capacity") {
            return BatteryReading::new(percent, 100);
        }
        debug!(dir = %self.dir.display(), "no readable battery counters");
        BatteryReading::UNKNOWN
    }
}

/// Check whether the probe yields a usable reading.
///
/// Used at startup for a diagnostic only; an unusable battery source is a
/// degraded mode, not an error.
pub fn probe_status(probe: &dyn BatteryProbe) -> Result<(), String> {
    match probe.read().fraction() {
        Some(_) => Ok(()),
        None => Err("battery supply reports no usable level".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn fraction_of_half_full_battery() {
        assert_eq!(BatteryReading::new(50, 100).fraction(), Some(0.5));
    }

    #[test]
    fn zero_scale_is_unknown() {
        assert_eq!(BatteryReading::new(50, 0).fraction(), None);
    }

    #[test]
    fn missing_fields_are_unknown() {
        assert_eq!(BatteryReading::UNKNOWN.fraction(), None);
        assert_eq!(BatteryReading::new(-1, 100).fraction(), None);
        assert_eq!(BatteryReading::new(50, -1).fraction(), None);
    }

    #[test]
    fn overfull_reading_is_clamped() {
        assert_eq!(BatteryReading::new(110, 100).fraction(), Some(1.0));
    }

    #[test]
    fn sysfs_probe_prefers_energy_counters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("energy_now"), "401000\n").unwrap();
        fs::write(dir.path().join("energy_full"), "802000\n").unwrap();
        fs::write(dir.path().join("capacity"), "99\n").unwrap();

        let probe = SysfsBatteryProbe::new(dir.path());
        assert_eq!(probe.read(), BatteryReading::new(401000, 802000));
    }

    #[test]
    fn sysfs_probe_falls_back_to_charge_then_capacity() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("charge_now"), "30\n").unwrap();
        fs::write(dir.path().join("charge_full"), "60\n").unwrap();
        let probe = SysfsBatteryProbe::new(dir.path());
        assert_eq!(probe.read(), BatteryReading::new(30, 60));

        fs::remove_file(dir.path().join("charge_now")).unwrap();
        fs::write(dir.path().join("capacity"), "75\n").unwrap();
        assert_eq!(probe.read(), BatteryReading::new(75, 100));
    }

    #[test]
    fn sysfs_probe_reports_unknown_for_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let probe = SysfsBatteryProbe::new(dir.path());
        assert_eq!(probe.read(), BatteryReading::UNKNOWN);
        assert!(probe_status(&probe).is_err());
    }
}
