//! Energy-model parameters
//!
//! The model needs two numbers per architecture: the board power budget and
//! the DRAM access energy. Defaults are the values used in the paper; a TOML
//! file can override any table or field, and whatever it leaves out keeps the
//! default of the same architecture:
//!
//! ```toml
//! [cpu]
//! power_w = 250.0
//! mem_energy_pj_bit = 22.0
//!
//! [gpu]
//! power_w = 250.0
//! mem_energy_pj_bit = 5.9
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{NpbError, Result};
use crate::record::Arch;

/// Cost-model parameters for one architecture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchParams {
    /// Board power (W), assumed constant over the run
    pub power_w: f64,
    /// Memory access energy (pJ per bit transferred)
    pub mem_energy_pj_bit: f64,
}

impl ArchParams {
    fn validate(&self, arch: Arch) -> Result<()> {
        if !self.power_w.is_finite() || self.power_w <= 0.0 {
            return Err(NpbError::InvalidConfiguration(format!(
                "[{arch}] power_w must be a positive number, got {}",
                self.power_w
            )));
        }
        if !self.mem_energy_pj_bit.is_finite() || self.mem_energy_pj_bit < 0.0 {
            return Err(NpbError::InvalidConfiguration(format!(
                "[{arch}] mem_energy_pj_bit must be non-negative, got {}",
                self.mem_energy_pj_bit
            )));
        }
        Ok(())
    }
}

/// One `[cpu]`/`[gpu]` table as written, before defaults are filled in
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArchOverrides {
    power_w: Option<f64>,
    mem_energy_pj_bit: Option<f64>,
}

impl ArchOverrides {
    fn over(self, base: ArchParams) -> ArchParams {
        ArchParams {
            power_w: self.power_w.unwrap_or(base.power_w),
            mem_energy_pj_bit: self.mem_energy_pj_bit.unwrap_or(base.mem_energy_pj_bit),
        }
    }
}

fn cpu_params<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<ArchParams, D::Error> {
    ArchOverrides::deserialize(de).map(|o| o.over(EnergyModelConfig::default_cpu()))
}

fn gpu_params<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<ArchParams, D::Error> {
    ArchOverrides::deserialize(de).map(|o| o.over(EnergyModelConfig::default_gpu()))
}

/// Per-architecture energy model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnergyModelConfig {
    /// Host processor parameters
    #[serde(default = "EnergyModelConfig::default_cpu", deserialize_with = "cpu_params")]
    pub cpu: ArchParams,
    /// Accelerator parameters
    #[serde(default = "EnergyModelConfig::default_gpu", deserialize_with = "gpu_params")]
    pub gpu: ArchParams,
}

impl EnergyModelConfig {
    fn default_cpu() -> ArchParams {
        ArchParams {
            power_w: 250.0,
            mem_energy_pj_bit: 22.0,
        }
    }

    fn default_gpu() -> ArchParams {
        ArchParams {
            power_w: 250.0,
            mem_energy_pj_bit: 5.9,
        }
    }

    /// Parameters for `arch`
    #[must_use]
    pub fn params(&self, arch: Arch) -> &ArchParams {
        match arch {
            Arch::Cpu => &self.cpu,
            Arch::Gpu => &self.gpu,
        }
    }

    /// Reject parameters the model cannot use
    pub fn validate(&self) -> Result<()> {
        for arch in Arch::ALL {
            self.params(arch).validate(arch)?;
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents).map_err(|e| NpbError::FormatError {
            reason: format!("energy model: {e}"),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NpbError::FormatError {
            reason: format!("energy model: {e}"),
        })
    }

    /// Defaults when `path` is `None`, otherwise the parsed file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path).map_err(|e| NpbError::IoError {
            message: format!("Failed to read config '{}': {e}", path.display()),
        })?;
        let cfg = Self::from_toml(&contents)?;
        tracing::info!(path = %path.display(), "loaded energy model");
        Ok(cfg)
    }
}

impl Default for EnergyModelConfig {
    fn default() -> Self {
        Self {
            cpu: Self::default_cpu(),
            gpu: Self::default_gpu(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_paper() {
        let cfg = EnergyModelConfig::default();
        assert_eq!(cfg.params(Arch::Cpu).power_w, 250.0);
        assert_eq!(cfg.params(Arch::Cpu).mem_energy_pj_bit, 22.0);
        assert_eq!(cfg.params(Arch::Gpu).power_w, 250.0);
        assert_eq!(cfg.params(Arch::Gpu).mem_energy_pj_bit, 5.9);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let cfg = EnergyModelConfig::from_toml("[gpu]\npower_w = 400.0\nmem_energy_pj_bit = 7.0\n")
            .unwrap();
        assert_eq!(cfg.gpu.power_w, 400.0);
        assert_eq!(cfg.gpu.mem_energy_pj_bit, 7.0);
        assert_eq!(cfg.cpu, EnergyModelConfig::default_cpu());
    }

    #[test]
    fn test_missing_field_takes_same_arch_default() {
        let cfg = EnergyModelConfig::from_toml("[gpu]\npower_w = 400.0\n").unwrap();
        assert_eq!(cfg.gpu.power_w, 400.0);
        assert_eq!(cfg.gpu.mem_energy_pj_bit, 5.9);

        let cfg = EnergyModelConfig::from_toml("[cpu]\nmem_energy_pj_bit = 18.5\n").unwrap();
        assert_eq!(cfg.cpu.power_w, 250.0);
        assert_eq!(cfg.cpu.mem_energy_pj_bit, 18.5);
        assert_eq!(cfg.gpu, EnergyModelConfig::default_gpu());
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = EnergyModelConfig::from_toml("[cpu]\npower = 300.0\n").unwrap_err();
        assert!(matches!(err, NpbError::FormatError { .. }));
    }

    #[test]
    fn test_empty_file_is_default() {
        let cfg = EnergyModelConfig::from_toml("").unwrap();
        assert_eq!(cfg, EnergyModelConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_power() {
        let err =
            EnergyModelConfig::from_toml("[cpu]\npower_w = 0.0\nmem_energy_pj_bit = 22.0\n")
                .unwrap_err();
        assert!(matches!(err, NpbError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_negative_memory_energy() {
        let mut cfg = EnergyModelConfig::default();
        cfg.gpu.mem_energy_pj_bit = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_table() {
        let err = EnergyModelConfig::from_toml("[tpu]\npower_w = 1.0\n").unwrap_err();
        assert!(matches!(err, NpbError::FormatError { .. }));
    }

    #[test]
    fn test_toml_roundtrip() {
        let cfg = EnergyModelConfig::default();
        let text = cfg.to_toml().unwrap();
        assert!(text.contains("[cpu]"));
        assert_eq!(EnergyModelConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn test_load_none_and_file() {
        assert_eq!(
            EnergyModelConfig::load(None).unwrap(),
            EnergyModelConfig::default()
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cpu]\npower_w = 280.0\nmem_energy_pj_bit = 20.0").unwrap();
        let cfg = EnergyModelConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.cpu.power_w, 280.0);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = EnergyModelConfig::load(Some(Path::new("/nonexistent/model.toml"))).unwrap_err();
        assert!(matches!(err, NpbError::IoError { .. }));
    }
}
