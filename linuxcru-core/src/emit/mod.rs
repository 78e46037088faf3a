//! Configuration emitter.
//!
//! Renders a [`Modeline`] into a [`ConfigurationFragment`]: an ordered list
//! of typed [`Directive`]s whose `Display` output is the text an external
//! writer drops into `xorg.conf.d` (or `modprobe.d` for the kernel module
//! dialect). Rendering is pure; the same inputs always produce
//! byte-identical text.
//!
//! ```text
//! # 1920x1080 59.96 Hz (CVT) hsync: 67.16 kHz; pclk: 173.00 MHz
//!
//! Section "Monitor"
//!     Identifier "HDMI-0"
//!     Option "PreferredMode" "1920x1080_60.00"
//!     Modeline "1920x1080_60.00" 173.00 1920 2048 2248 2576 1080 1083 1088 1120 -HSync +VSync
//! EndSection
//! ```

mod nvidia;
mod xorg;
mod xrandr;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::types::{BlankingMode, Modeline};

pub use xrandr::ModeRegistration;

// =============================================================================
// TARGET DIALECT
// =============================================================================

/// Configuration syntax to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetDialect {
    /// Plain Xorg `Monitor` section
    #[default]
    Generic,
    /// Xorg `Monitor` and `Screen` sections for the proprietary NVIDIA driver
    Nvidia,
    /// `modprobe.d` options line for the NVIDIA kernel module
    #[serde(rename = "nvidia-modprobe")]
    NvidiaModprobe,
}

impl TargetDialect {
    pub const ALL: [TargetDialect; 3] = [Self::Generic, Self::Nvidia, Self::NvidiaModprobe];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetDialect::Generic => "generic",
            TargetDialect::Nvidia => "nvidia",
            TargetDialect::NvidiaModprobe => "nvidia-modprobe",
        }
    }
}

impl fmt::Display for TargetDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetDialect {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generic" | "xorg" => Ok(Self::Generic),
            "nvidia" | "vendor" => Ok(Self::Nvidia),
            "nvidia-modprobe" | "modprobe" => Ok(Self::NvidiaModprobe),
            _ => Err(RenderError::UnknownDialect(s.to_string())),
        }
    }
}

// =============================================================================
// DIRECTIVES
// =============================================================================

/// One line of rendered configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Directive {
    /// `# text`
    Comment(String),
    /// Empty separator line
    Blank,
    /// `Section "name"`
    SectionStart(String),
    /// `EndSection`
    SectionEnd,
    /// `Key "value"`
    Entry { key: String, value: String },
    /// `Modeline "name" <timings>`
    Modeline { name: String, timings: Modeline },
    /// `Option "key" "value"`
    Option { key: String, value: String },
    /// `options module key="value"` (modprobe.d syntax)
    ModuleOption {
        module: String,
        key: String,
        value: String,
    },
}

impl Directive {
    pub fn comment(text: impl Into<String>) -> Self {
        Directive::Comment(text.into())
    }

    pub fn section(name: impl Into<String>) -> Self {
        Directive::SectionStart(name.into())
    }

    pub fn entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Directive::Entry {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn option(key: impl Into<String>, value: impl Into<String>) -> Self {
        Directive::Option {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Comment(text) => write!(f, "# {}", text),
            Directive::Blank => Ok(()),
            Directive::SectionStart(name) => write!(f, "Section \"{}\"", name),
            Directive::SectionEnd => f.write_str("EndSection"),
            Directive::Entry { key, value } => write!(f, "{} \"{}\"", key, value),
            Directive::Modeline { name, timings } => write!(f, "Modeline \"{}\" {}", name, timings),
            Directive::Option { key, value } => write!(f, "Option \"{}\" \"{}\"", key, value),
            Directive::ModuleOption { module, key, value } => {
                write!(f, "options {} {}=\"{}\"", module, key, value)
            }
        }
    }
}

// =============================================================================
// FRAGMENT
// =============================================================================

/// Rendered configuration for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationFragment {
    mode_name: String,
    dialect: TargetDialect,
    directives: Vec<Directive>,
}

impl ConfigurationFragment {
    pub fn mode_name(&self) -> &str {
        &self.mode_name
    }

    pub fn dialect(&self) -> TargetDialect {
        self.dialect
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

/// Directives inside a section are indented by four spaces.
impl fmt::Display for ConfigurationFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0usize;
        for directive in &self.directives {
            if matches!(directive, Directive::SectionEnd) {
                depth = depth.saturating_sub(1);
            }
            if matches!(directive, Directive::Blank) {
                writeln!(f)?;
            } else {
                writeln!(f, "{:indent$}{}", "", directive, indent = depth * 4)?;
            }
            if matches!(directive, Directive::SectionStart(_)) {
                depth += 1;
            }
        }
        Ok(())
    }
}

/// Extra rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Ask the driver to skip its own EDID and clock checks (vendor dialect only).
    pub force_enable: bool,
}

// =============================================================================
// RENDERING
// =============================================================================

/// Render a modeline for a dialect given by name.
///
/// Accepts `generic`/`xorg`, `nvidia`/`vendor` and `nvidia-modprobe`/`modprobe`.
pub fn render(
    modeline: &Modeline,
    target_dialect: &str,
    display_name: &str,
) -> Result<ConfigurationFragment, RenderError> {
    let dialect = target_dialect.parse()?;
    Ok(render_dialect(modeline, dialect, display_name, &RenderOptions::default()))
}

/// Render a modeline for a known dialect.
pub fn render_dialect(
    modeline: &Modeline,
    dialect: TargetDialect,
    display_name: &str,
    options: &RenderOptions,
) -> ConfigurationFragment {
    let directives = match dialect {
        TargetDialect::Generic => {
            xorg::MonitorSectionBuilder::new(modeline, display_name).build()
        }
        TargetDialect::Nvidia => {
            nvidia::NvidiaConfigBuilder::new(modeline, display_name, options).build()
        }
        TargetDialect::NvidiaModprobe => nvidia::module_options(modeline),
    };

    ConfigurationFragment {
        mode_name: modeline.name(),
        dialect,
        directives,
    }
}

/// Summary comment in the style of the X.Org `cvt` tool.
fn summary_comment(modeline: &Modeline) -> Directive {
    let label = match modeline.blanking() {
        BlankingMode::Standard => "CVT",
        BlankingMode::Reduced => "CVT-RB",
        BlankingMode::ReducedV2 => "CVT-RBv2",
    };
    let hsync_centi_khz = (modeline.horizontal_frequency_hz() + 5) / 10;

    Directive::Comment(format!(
        "{}x{} {} Hz ({}) hsync: {}.{:02} kHz; pclk: {} MHz",
        modeline.horizontal().active,
        modeline.vertical().active,
        modeline.actual_refresh(),
        label,
        hsync_centi_khz / 100,
        hsync_centi_khz % 100,
        modeline.pixel_clock()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::compute_modeline;
    use crate::types::Resolution;

    fn modeline_1080p() -> Modeline {
        compute_modeline(&Resolution::at_hz(1920, 1080, 60), BlankingMode::Standard).unwrap()
    }

    #[test]
    fn test_dialect_parsing() {
        assert_eq!("generic".parse::<TargetDialect>().unwrap(), TargetDialect::Generic);
        assert_eq!("Xorg".parse::<TargetDialect>().unwrap(), TargetDialect::Generic);
        assert_eq!("vendor".parse::<TargetDialect>().unwrap(), TargetDialect::Nvidia);
        assert_eq!("modprobe".parse::<TargetDialect>().unwrap(), TargetDialect::NvidiaModprobe);
        for dialect in TargetDialect::ALL {
            assert_eq!(dialect.as_str().parse::<TargetDialect>().unwrap(), dialect);
        }
        assert_eq!(
            "wayland".parse::<TargetDialect>(),
            Err(RenderError::UnknownDialect("wayland".to_string()))
        );
    }

    #[test]
    fn test_generic_render() {
        let fragment = render(&modeline_1080p(), "generic", "HDMI-0").unwrap();

        let expected = "\
# 1920x1080 59.96 Hz (CVT) hsync: 67.16 kHz; pclk: 173.00 MHz

Section \"Monitor\"
    Identifier \"HDMI-0\"
    Option \"PreferredMode\" \"1920x1080_60.00\"
    Modeline \"1920x1080_60.00\" 173.00 1920 2048 2248 2576 1080 1083 1088 1120 -HSync +VSync
EndSection
";
        assert_eq!(fragment.to_string(), expected);
        assert_eq!(fragment.mode_name(), "1920x1080_60.00");
        assert_eq!(fragment.dialect(), TargetDialect::Generic);
    }

    #[test]
    fn test_modprobe_render() {
        let fragment = render(&modeline_1080p(), "nvidia-modprobe", "HDMI-0").unwrap();

        let expected = "\
# Kernel module configuration (/etc/modprobe.d/nvidia.conf)
options nvidia NVreg_RegistryDwords=\"CustomEDID=1920x1080_60.00;EnableBrightnessControl=1\"
";
        assert_eq!(fragment.to_string(), expected);
        assert_eq!(fragment.mode_name(), "1920x1080_60.00");
        assert_eq!(fragment.dialect(), TargetDialect::NvidiaModprobe);
    }

    #[test]
    fn test_unknown_dialect() {
        assert!(matches!(
            render(&modeline_1080p(), "amdgpu-pro", "DP-1"),
            Err(RenderError::UnknownDialect(name)) if name == "amdgpu-pro"
        ));
    }

    #[test]
    fn test_summary_comment_labels() {
        let reduced =
            compute_modeline(&Resolution::at_hz(1920, 1080, 60), BlankingMode::Reduced).unwrap();
        assert_eq!(
            summary_comment(&reduced).to_string(),
            "# 1920x1080 59.93 Hz (CVT-RB) hsync: 66.59 kHz; pclk: 138.50 MHz"
        );
    }
}
