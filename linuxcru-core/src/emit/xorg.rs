//! Generic Xorg `Monitor` section.

use super::{summary_comment, Directive};
use crate::types::Modeline;

/// Builder for a plain Xorg `Monitor` section.
pub(super) struct MonitorSectionBuilder<'a> {
    modeline: &'a Modeline,
    display_name: &'a str,
}

impl<'a> MonitorSectionBuilder<'a> {
    pub(super) fn new(modeline: &'a Modeline, display_name: &'a str) -> Self {
        Self {
            modeline,
            display_name,
        }
    }

    /// Build the complete fragment: summary comment plus the section.
    pub(super) fn build(&self) -> Vec<Directive> {
        let mut directives = self.header();
        directives.push(Directive::section("Monitor"));
        directives.extend(self.monitor_entries());
        directives.push(Directive::SectionEnd);
        directives
    }

    /// Summary comment followed by a blank separator.
    pub(super) fn header(&self) -> Vec<Directive> {
        vec![summary_comment(self.modeline), Directive::Blank]
    }

    /// Entries inside the `Monitor` section, without the section delimiters.
    pub(super) fn monitor_entries(&self) -> Vec<Directive> {
        let name = self.modeline.name();
        vec![
            Directive::entry("Identifier", self.display_name),
            Directive::option("PreferredMode", name.clone()),
            Directive::Modeline {
                name,
                timings: *self.modeline,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::compute_modeline;
    use crate::types::{BlankingMode, Resolution};

    #[test]
    fn test_monitor_entries() {
        let modeline =
            compute_modeline(&Resolution::at_hz(2560, 1440, 144), BlankingMode::Reduced).unwrap();
        let entries = MonitorSectionBuilder::new(&modeline, "DP-2").monitor_entries();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].to_string(), "Identifier \"DP-2\"");
        assert_eq!(
            entries[1].to_string(),
            "Option \"PreferredMode\" \"2560x1440R_144.00\""
        );
        assert!(entries[2].to_string().starts_with("Modeline \"2560x1440R_144.00\" 604.00 2560 "));
    }

    #[test]
    fn test_build_wraps_section() {
        let modeline =
            compute_modeline(&Resolution::at_hz(1024, 768, 60), BlankingMode::Standard).unwrap();
        let directives = MonitorSectionBuilder::new(&modeline, "VGA-1").build();

        assert!(matches!(directives[0], Directive::Comment(_)));
        assert_eq!(directives[1], Directive::Blank);
        assert_eq!(directives[2], Directive::section("Monitor"));
        assert_eq!(directives.last(), Some(&Directive::SectionEnd));
    }
}
