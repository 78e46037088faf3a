//! `xrandr` mode registration commands.
//!
//! Pure data: the argument vectors an external applier passes to `xrandr`
//! to add a mode at runtime without touching any configuration file.

use serde::Serialize;

use crate::types::Modeline;

/// Argument vectors for registering and selecting a mode with `xrandr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeRegistration {
    /// `xrandr --newmode <name> <clock> <timings...> <flags>`
    pub new_mode: Vec<String>,
    /// `xrandr --addmode <output> <name>`
    pub add_mode: Vec<String>,
    /// `xrandr --output <output> --mode <name>`
    pub select_mode: Vec<String>,
}

impl ModeRegistration {
    /// Build the three commands for `modeline` on `output`.
    pub fn new(modeline: &Modeline, output: &str) -> Self {
        let name = modeline.name();

        let mut new_mode = vec!["xrandr".to_string(), "--newmode".to_string(), name.clone()];
        new_mode.extend(modeline.to_string().split_whitespace().map(str::to_string));

        Self {
            new_mode,
            add_mode: vec![
                "xrandr".to_string(),
                "--addmode".to_string(),
                output.to_string(),
                name.clone(),
            ],
            select_mode: vec![
                "xrandr".to_string(),
                "--output".to_string(),
                output.to_string(),
                "--mode".to_string(),
                name,
            ],
        }
    }

    /// Commands in the order they must run.
    pub fn commands(&self) -> [&[String]; 3] {
        [
            self.new_mode.as_slice(),
            self.add_mode.as_slice(),
            self.select_mode.as_slice(),
        ]
    }

    /// Shell-ready lines; mode names never contain characters needing quotes.
    pub fn to_shell_lines(&self) -> Vec<String> {
        self.commands().iter().map(|argv| argv.join(" ")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::compute_modeline;
    use crate::types::{BlankingMode, Resolution};

    #[test]
    fn test_registration_commands() {
        let modeline =
            compute_modeline(&Resolution::at_hz(1920, 1080, 60), BlankingMode::Standard).unwrap();
        let registration = ModeRegistration::new(&modeline, "HDMI-0");

        assert_eq!(
            registration.to_shell_lines(),
            vec![
                "xrandr --newmode 1920x1080_60.00 173.00 1920 2048 2248 2576 1080 1083 1088 1120 -HSync +VSync",
                "xrandr --addmode HDMI-0 1920x1080_60.00",
                "xrandr --output HDMI-0 --mode 1920x1080_60.00",
            ]
        );
        assert_eq!(registration.new_mode.len(), 14);
    }
}
