//! Request execution: selection, validation and output.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use linuxcru_core::{
    render_dialect, ModeRegistration, Modeline, RenderOptions, Resolution, ValidationOutcome,
};

use crate::cli::{Args, OutputFormat};
use crate::config::Config;
use crate::policy::{select_modeline, SelectionRequest};

/// JSON report printed with `--format json`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub mode_name: String,
    pub display: String,
    pub modeline: Modeline,
    pub outcome: ValidationOutcome,
    pub from_quirk: bool,
    pub fragment: String,
    pub registration: ModeRegistration,
}

/// Run one request and return the text to print.
pub fn execute(args: &Args, config: &Config) -> Result<String> {
    let constraint = config.load_constraint()?;
    let dialect = config.target_dialect()?;

    let request = SelectionRequest {
        resolution: Resolution::new(args.width, args.height, args.refresh),
        blanking: config.blanking,
        constraint: constraint.as_ref(),
        force_enable: config.force_enable,
        use_quirks: config.quirks,
    };

    let selection = select_modeline(&request)?;
    if let Some(issue) = selection.outcome.issue() {
        warn!(issue = %issue, "Modeline exceeds declared display capabilities");
    }

    let options = RenderOptions {
        force_enable: config.force_enable,
    };
    let fragment = render_dialect(&selection.modeline, dialect, &config.display, &options);
    let registration = ModeRegistration::new(&selection.modeline, &config.display);

    info!(
        mode = %fragment.mode_name(),
        dialect = %dialect,
        display = %config.display,
        "Rendered configuration"
    );

    let text = match args.format {
        OutputFormat::Json => {
            let report = Report {
                mode_name: fragment.mode_name().to_string(),
                display: config.display.clone(),
                modeline: selection.modeline,
                outcome: selection.outcome,
                from_quirk: selection.from_quirk,
                fragment: fragment.to_string(),
                registration,
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            json
        }
        OutputFormat::Text if args.xrandr => {
            let mut lines = registration.to_shell_lines().join("\n");
            lines.push('\n');
            lines
        }
        OutputFormat::Text => fragment.to_string(),
    };

    Ok(text)
}

/// Print to stdout or write to a caller-chosen file.
///
/// System configuration directories are refused; installing the fragment is
/// left to the caller.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    let Some(path) = output else {
        print!("{}", text);
        return Ok(());
    };

    if path.starts_with("/etc") {
        bail!("Refusing to write under /etc: {}", path.display());
    }

    std::fs::write(path, text)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    info!(path = %path.display(), "Output written");

    Ok(())
}
