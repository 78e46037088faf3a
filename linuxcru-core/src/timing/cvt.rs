//! CVT timing calculation.
//!
//! The horizontal period is kept as an exact fraction of microseconds
//! (`num / den`) and every rounding step is an integer floor, so identical
//! inputs always produce identical modelines.

use tracing::debug;

use super::tables::{
    aspect_vsync_lines, BlankingProfile, ClockBasis, HorizontalBlanking, VSyncWidth,
    VerticalBlanking,
};
use crate::error::{Result, TimingError};
use crate::types::{AxisTiming, BlankingMode, Modeline, PixelClock, RefreshRate, Resolution};

/// Smallest accepted width or height.
pub const MIN_DIMENSION: u32 = 8;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 32_768;

/// Microseconds per second, scaled by the millihertz refresh unit.
const MICROS_PER_SECOND_MILLI: u128 = 1_000_000_000;

/// Estimated horizontal period in microseconds, as an exact fraction.
#[derive(Debug, Clone, Copy)]
struct LinePeriod {
    num: u128,
    den: u128,
}

impl LinePeriod {
    /// `(1e6 / refresh - min_vblank_us) / lines`, with refresh in millihertz.
    fn estimate(refresh_mhz: u32, min_vblank_us: u32, lines: u32) -> Self {
        let refresh = u128::from(refresh_mhz);
        Self {
            num: MICROS_PER_SECOND_MILLI - u128::from(min_vblank_us) * refresh,
            den: refresh * u128::from(lines),
        }
    }

    /// Number of whole lines needed to cover `interval_us`, plus one.
    fn lines_covering(&self, interval_us: u32) -> u32 {
        let lines = u128::from(interval_us) * self.den / self.num + 1;
        u32::try_from(lines).unwrap_or(u32::MAX)
    }
}

/// Compute a CVT modeline for the requested resolution and blanking mode.
///
/// Horizontal pixels are rounded down to the mode's character cell
/// granularity. The pixel clock is always rounded down.
pub fn compute_modeline(resolution: &Resolution, blanking: BlankingMode) -> Result<Modeline> {
    let profile = BlankingProfile::for_mode(blanking);
    check_inputs(resolution)?;

    let refresh_mhz = resolution.refresh.millihertz();
    let width = resolution.width - resolution.width % profile.cell_granularity;
    let height = resolution.height;

    debug!(
        width = resolution.width,
        height,
        refresh = %resolution.refresh,
        blanking = %blanking,
        "Computing CVT modeline"
    );

    let vsync = match profile.vsync {
        VSyncWidth::AspectRatio => aspect_vsync_lines(resolution.width, height),
        VSyncWidth::Fixed(lines) => lines,
    };

    let period = LinePeriod::estimate(
        refresh_mhz,
        profile.min_vblank_us,
        height + profile.vertical.period_estimate_lines(),
    );

    let vertical = vertical_timing(profile, &period, height, vsync);
    let horizontal = horizontal_timing(profile, &period, width);
    let pixel_clock = pixel_clock(profile, &period, &horizontal, &vertical, refresh_mhz)?;

    let modeline = Modeline::from_parts(
        pixel_clock,
        horizontal,
        vertical,
        profile.h_sync,
        profile.v_sync,
        blanking,
        resolution.refresh,
    )?;

    debug!(
        name = %modeline.name(),
        clock_khz = pixel_clock.khz(),
        h_total = horizontal.total,
        v_total = vertical.total,
        "Computed modeline"
    );

    Ok(modeline)
}

fn check_inputs(resolution: &Resolution) -> Result<()> {
    let refresh = resolution.refresh;
    if refresh < RefreshRate::MIN || refresh > RefreshRate::MAX {
        return Err(TimingError::RefreshOutOfRange {
            millihertz: refresh.millihertz(),
            min_millihertz: RefreshRate::MIN.millihertz(),
            max_millihertz: RefreshRate::MAX.millihertz(),
        });
    }

    if resolution.width < MIN_DIMENSION || resolution.height < MIN_DIMENSION {
        return Err(TimingError::ResolutionTooSmall {
            width: resolution.width,
            height: resolution.height,
            min: MIN_DIMENSION,
        });
    }

    if resolution.width > MAX_DIMENSION || resolution.height > MAX_DIMENSION {
        return Err(TimingError::ResolutionTooLarge {
            width: resolution.width,
            height: resolution.height,
            max: MAX_DIMENSION,
        });
    }

    Ok(())
}

fn vertical_timing(
    profile: &BlankingProfile,
    period: &LinePeriod,
    height: u32,
    vsync: u32,
) -> AxisTiming {
    let interval_lines = period.lines_covering(profile.min_vblank_us);

    let (front_porch, blanking) = match profile.vertical {
        VerticalBlanking::SyncAndBackPorch {
            front_porch,
            min_back_porch,
        } => {
            let sync_and_back_porch = interval_lines.max(vsync + min_back_porch);
            (front_porch, front_porch + sync_and_back_porch)
        }
        VerticalBlanking::FixedFrontPorch {
            front_porch,
            min_back_porch,
        } => {
            let blanking = interval_lines.max(front_porch + vsync + min_back_porch);
            (front_porch, blanking)
        }
        VerticalBlanking::FixedBackPorch {
            min_front_porch,
            back_porch,
        } => {
            let blanking = interval_lines.max(min_front_porch + vsync + back_porch);
            (blanking - vsync - back_porch, blanking)
        }
    };

    let sync_start = height + front_porch;
    AxisTiming {
        active: height,
        sync_start,
        sync_end: sync_start + vsync,
        total: height + blanking,
    }
}

fn horizontal_timing(profile: &BlankingProfile, period: &LinePeriod, width: u32) -> AxisTiming {
    match profile.horizontal {
        HorizontalBlanking::DutyCycle {
            c_prime,
            m_prime,
            min_percent,
            sync_percent,
        } => {
            let blank = duty_cycle_blanking(period, width, c_prime, m_prime, min_percent);
            let blank = blank - blank % (2 * profile.cell_granularity);
            let total = width + blank;

            let sync = total * sync_percent / 100;
            let sync = sync - sync % profile.cell_granularity;
            let sync_end = width + blank / 2;

            AxisTiming {
                active: width,
                sync_start: sync_end - sync,
                sync_end,
                total,
            }
        }
        HorizontalBlanking::Fixed {
            blank,
            sync,
            front_porch,
        } => AxisTiming {
            active: width,
            sync_start: width + front_porch,
            sync_end: width + front_porch + sync,
            total: width + blank,
        },
    }
}

/// `floor(width * d / (100 - d))` with the ideal duty cycle
/// `d = C' - M' * period / 1000`, clamped to at least `min_percent`.
fn duty_cycle_blanking(
    period: &LinePeriod,
    width: u32,
    c_prime: u32,
    m_prime: u32,
    min_percent: u32,
) -> u32 {
    let width = u128::from(width);
    // d = duty / scale, with scale = 1000 * den
    let scale = 1000 * period.den;
    let ideal = u128::from(c_prime) * scale;
    let slope = u128::from(m_prime) * period.num;
    let floor = u128::from(min_percent) * scale;

    let blank = if ideal > slope && ideal - slope > floor {
        let duty = ideal - slope;
        width * duty / (100 * scale - duty)
    } else {
        width * u128::from(min_percent) / u128::from(100 - min_percent)
    };
    u32::try_from(blank).unwrap_or(u32::MAX)
}

fn pixel_clock(
    profile: &BlankingProfile,
    period: &LinePeriod,
    horizontal: &AxisTiming,
    vertical: &AxisTiming,
    refresh_mhz: u32,
) -> Result<PixelClock> {
    let khz = match profile.clock_basis {
        ClockBasis::LinePeriod => u128::from(horizontal.total) * 1000 * period.den / period.num,
        ClockBasis::FrameProduct => {
            u128::from(horizontal.total) * u128::from(vertical.total) * u128::from(refresh_mhz)
                / 1_000_000
        }
    };
    let step = u128::from(profile.clock_step_khz);
    let khz = khz - khz % step;
    if khz == 0 {
        return Err(TimingError::PixelClockUnderflow {
            width: horizontal.active,
            height: vertical.active,
            millihertz: refresh_mhz,
        });
    }

    u32::try_from(khz)
        .map(PixelClock::from_khz)
        .map_err(|_| TimingError::ResolutionTooLarge {
            width: horizontal.active,
            height: vertical.active,
            max: MAX_DIMENSION,
        })
}
