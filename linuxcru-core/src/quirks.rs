//! Hand-tuned modelines for panels whose firmware rejects CVT output.
//!
//! Quirks are opt-in: the timing calculator never consults this table.
//! Callers check [`lookup`] first and fall back to
//! [`compute_modeline`](crate::timing::compute_modeline).

use tracing::debug;

use crate::types::{
    AxisTiming, BlankingMode, Modeline, PixelClock, RefreshRate, Resolution, SyncPolarity,
};

/// A known panel with fixed timings over a refresh range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayQuirk {
    /// Human-readable panel name
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Lowest matching refresh rate (inclusive)
    pub min_refresh: RefreshRate,
    /// Highest matching refresh rate (inclusive)
    pub max_refresh: RefreshRate,
    pub horizontal: AxisTiming,
    pub vertical: AxisTiming,
    pub h_sync: SyncPolarity,
    pub v_sync: SyncPolarity,
}

/// Shipped quirk table.
pub static QUIRKS: &[DisplayQuirk] = &[DisplayQuirk {
    name: "Samsung S95B OLED",
    width: 3840,
    height: 2160,
    min_refresh: RefreshRate::from_hz(120),
    max_refresh: RefreshRate::from_hz(144),
    horizontal: AxisTiming {
        active: 3840,
        sync_start: 3848,
        sync_end: 3880,
        total: 3920,
    },
    vertical: AxisTiming {
        active: 2160,
        sync_start: 2300,
        sync_end: 2308,
        total: 2314,
    },
    h_sync: SyncPolarity::Positive,
    v_sync: SyncPolarity::Negative,
}];

/// Pixel clocks are rounded down to 10 kHz so they print exactly.
const CLOCK_STEP_KHZ: u64 = 10;

impl DisplayQuirk {
    /// Whether this quirk covers the requested resolution.
    pub fn matches(&self, resolution: &Resolution) -> bool {
        resolution.width == self.width
            && resolution.height == self.height
            && (self.min_refresh..=self.max_refresh).contains(&resolution.refresh)
    }

    /// Build the override modeline at `refresh`.
    ///
    /// The clock is `h_total * v_total * refresh`, rounded down.
    pub fn modeline(&self, refresh: RefreshRate) -> Option<Modeline> {
        let frame = u64::from(self.horizontal.total) * u64::from(self.vertical.total);
        let khz = frame * u64::from(refresh.millihertz()) / 1_000_000;
        let khz = u32::try_from(khz - khz % CLOCK_STEP_KHZ).ok()?;

        Modeline::from_parts(
            PixelClock::from_khz(khz),
            self.horizontal,
            self.vertical,
            self.h_sync,
            self.v_sync,
            BlankingMode::Reduced,
            refresh,
        )
        .ok()
    }
}

/// Find a quirk override for the requested resolution.
pub fn lookup(resolution: &Resolution) -> Option<Modeline> {
    let quirk = QUIRKS.iter().find(|quirk| quirk.matches(resolution))?;
    debug!(quirk = quirk.name, resolution = %resolution, "Using display quirk");
    quirk.modeline(resolution.refresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quirk_timings_are_ordered() {
        for quirk in QUIRKS {
            assert!(quirk.horizontal.is_ordered(), "{}", quirk.name);
            assert!(quirk.vertical.is_ordered(), "{}", quirk.name);
            assert!(quirk.min_refresh <= quirk.max_refresh);
        }
    }

    #[test]
    fn test_s95b_at_144() {
        let modeline = lookup(&Resolution::at_hz(3840, 2160, 144)).unwrap();
        assert_eq!(
            modeline.to_string(),
            "1306.20 3840 3848 3880 3920 2160 2300 2308 2314 +HSync -VSync"
        );
    }

    #[test]
    fn test_s95b_clock_tracks_refresh() {
        let modeline = lookup(&Resolution::at_hz(3840, 2160, 120)).unwrap();
        // 3920 * 2314 * 120 = 1088.50 MHz (rounded down)
        assert_eq!(modeline.pixel_clock().khz(), 1_088_500);
    }

    #[test]
    fn test_no_quirk_outside_range() {
        assert!(lookup(&Resolution::at_hz(3840, 2160, 60)).is_none());
        assert!(lookup(&Resolution::at_hz(3840, 2160, 165)).is_none());
        assert!(lookup(&Resolution::at_hz(2560, 1440, 144)).is_none());
    }
}
