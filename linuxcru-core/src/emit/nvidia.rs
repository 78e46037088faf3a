//! NVIDIA proprietary driver dialect.
//!
//! Extends the generic `Monitor` section with the driver's exact-timing
//! option and, when force-enable is requested, the mode validation
//! relaxations that stop the driver from discarding non-EDID modes. A
//! `Screen` section ties the monitor to the default device.
//!
//! The kernel module options line is rendered separately, since it goes to
//! `/etc/modprobe.d/nvidia.conf` rather than `xorg.conf.d`.

use super::xorg::MonitorSectionBuilder;
use super::{Directive, RenderOptions};
use crate::types::Modeline;

/// Mode validation checks the driver skips under force-enable.
const FORCED_MODE_VALIDATION: &str = "AllowNonEdidModes,NoMaxPClkCheck,NoEdidMaxPClkCheck,\
NoMaxSizeCheck,NoHorizSyncCheck,NoVertRefreshCheck";

const SCREEN_IDENTIFIER: &str = "Screen0";
const DEVICE_IDENTIFIER: &str = "Device0";

/// Builder for the NVIDIA `Monitor` + `Screen` configuration.
pub(super) struct NvidiaConfigBuilder<'a> {
    monitor: MonitorSectionBuilder<'a>,
    display_name: &'a str,
    force_enable: bool,
}

impl<'a> NvidiaConfigBuilder<'a> {
    pub(super) fn new(
        modeline: &'a Modeline,
        display_name: &'a str,
        options: &RenderOptions,
    ) -> Self {
        Self {
            monitor: MonitorSectionBuilder::new(modeline, display_name),
            display_name,
            force_enable: options.force_enable,
        }
    }

    pub(super) fn build(&self) -> Vec<Directive> {
        let mut directives = self.monitor.header();

        directives.push(Directive::section("Monitor"));
        directives.extend(self.monitor.monitor_entries());
        directives.push(Directive::option("ExactModeTimingsDVI", "True"));
        if self.force_enable {
            directives.push(Directive::option("ModeValidation", FORCED_MODE_VALIDATION));
            directives.push(Directive::option("IgnoreEDID", "True"));
        }
        directives.push(Directive::SectionEnd);

        directives.push(Directive::Blank);
        directives.extend(self.build_screen_section());
        directives
    }

    fn build_screen_section(&self) -> Vec<Directive> {
        vec![
            Directive::section("Screen"),
            Directive::entry("Identifier", SCREEN_IDENTIFIER),
            Directive::entry("Device", DEVICE_IDENTIFIER),
            Directive::entry("Monitor", self.display_name),
            Directive::option("AllowIndirectGLXProtocol", "off"),
            Directive::option("TripleBuffer", "on"),
            Directive::SectionEnd,
        ]
    }
}

/// `NVreg_RegistryDwords` entries pointing the kernel module at a mode.
pub(super) fn module_options(modeline: &Modeline) -> Vec<Directive> {
    vec![
        Directive::comment("Kernel module configuration (/etc/modprobe.d/nvidia.conf)"),
        Directive::ModuleOption {
            module: "nvidia".to_string(),
            key: "NVreg_RegistryDwords".to_string(),
            value: format!("CustomEDID={};EnableBrightnessControl=1", modeline.name()),
        },
    ]
}
