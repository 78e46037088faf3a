//! CVT constant tables, one profile per blanking mode.
//!
//! Values follow VESA CVT 1.2 as implemented by the X.Org `cvt` utility.
//! Every profile is immutable `static` data and is shared freely between
//! threads.

use crate::types::{BlankingMode, SyncPolarity};

/// How the vertical sync pulse width is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VSyncWidth {
    /// Derived from the aspect ratio of the requested resolution.
    AspectRatio,
    /// Fixed number of lines.
    Fixed(u32),
}

/// How the vertical blanking interval is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalBlanking {
    /// The minimum interval covers sync plus back porch; the front porch is
    /// fixed and added on top.
    SyncAndBackPorch { front_porch: u32, min_back_porch: u32 },
    /// The minimum interval covers the whole blanking period; the front
    /// porch is fixed and the back porch absorbs the remainder.
    FixedFrontPorch { front_porch: u32, min_back_porch: u32 },
    /// The minimum interval covers the whole blanking period; the back
    /// porch is fixed and the front porch absorbs the remainder.
    FixedBackPorch { min_front_porch: u32, back_porch: u32 },
}

impl VerticalBlanking {
    /// Lines added to the active height when estimating the line period.
    pub fn period_estimate_lines(&self) -> u32 {
        match self {
            VerticalBlanking::SyncAndBackPorch { front_porch, .. } => *front_porch,
            VerticalBlanking::FixedFrontPorch { .. } | VerticalBlanking::FixedBackPorch { .. } => 0,
        }
    }
}

/// How the horizontal blanking period is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalBlanking {
    /// CRT-style blanking from the ideal duty cycle formula
    /// `C' - M' * H_period / 1000` (percent, period in microseconds).
    DutyCycle {
        c_prime: u32,
        m_prime: u32,
        min_percent: u32,
        sync_percent: u32,
    },
    /// Fixed pixel counts.
    Fixed {
        blank: u32,
        sync: u32,
        front_porch: u32,
    },
}

/// What the pixel clock is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockBasis {
    /// `h_total / H_period`, the CVT 1.1 definition.
    LinePeriod,
    /// `h_total * v_total * refresh`, the CVT-RBv2 definition.
    FrameProduct,
}

/// Constant table for one CVT blanking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankingProfile {
    /// Blanking mode this profile describes.
    pub mode: BlankingMode,
    /// Horizontal character cell granularity in pixels.
    pub cell_granularity: u32,
    /// Minimum vertical blanking time in microseconds.
    pub min_vblank_us: u32,
    /// Vertical blanking layout.
    pub vertical: VerticalBlanking,
    /// Vertical sync width rule.
    pub vsync: VSyncWidth,
    /// Horizontal blanking rule.
    pub horizontal: HorizontalBlanking,
    /// Pixel clock derivation.
    pub clock_basis: ClockBasis,
    /// Pixel clock is rounded down to a multiple of this step.
    pub clock_step_khz: u32,
    /// Horizontal sync polarity.
    pub h_sync: SyncPolarity,
    /// Vertical sync polarity.
    pub v_sync: SyncPolarity,
}

/// CVT default blanking.
pub static STANDARD: BlankingProfile = BlankingProfile {
    mode: BlankingMode::Standard,
    cell_granularity: 8,
    min_vblank_us: 550,
    vertical: VerticalBlanking::SyncAndBackPorch {
        front_porch: 3,
        min_back_porch: 3,
    },
    vsync: VSyncWidth::AspectRatio,
    horizontal: HorizontalBlanking::DutyCycle {
        c_prime: 30,
        m_prime: 300,
        min_percent: 20,
        sync_percent: 8,
    },
    clock_basis: ClockBasis::LinePeriod,
    clock_step_khz: 250,
    h_sync: SyncPolarity::Negative,
    v_sync: SyncPolarity::Positive,
};

/// CVT reduced blanking.
pub static REDUCED: BlankingProfile = BlankingProfile {
    mode: BlankingMode::Reduced,
    cell_granularity: 8,
    min_vblank_us: 460,
    vertical: VerticalBlanking::FixedFrontPorch {
        front_porch: 3,
        min_back_porch: 6,
    },
    vsync: VSyncWidth::AspectRatio,
    horizontal: HorizontalBlanking::Fixed {
        blank: 160,
        sync: 32,
        front_porch: 48,
    },
    clock_basis: ClockBasis::LinePeriod,
    clock_step_khz: 250,
    h_sync: SyncPolarity::Positive,
    v_sync: SyncPolarity::Negative,
};

/// CVT reduced blanking, version 2.
pub static REDUCED_V2: BlankingProfile = BlankingProfile {
    mode: BlankingMode::ReducedV2,
    cell_granularity: 1,
    min_vblank_us: 460,
    vertical: VerticalBlanking::FixedBackPorch {
        min_front_porch: 1,
        back_porch: 6,
    },
    vsync: VSyncWidth::Fixed(8),
    horizontal: HorizontalBlanking::Fixed {
        blank: 80,
        sync: 32,
        front_porch: 8,
    },
    clock_basis: ClockBasis::FrameProduct,
    // RBv2 allows 1 kHz steps; 10 kHz keeps the clock exact at two MHz decimals.
    clock_step_khz: 10,
    h_sync: SyncPolarity::Positive,
    v_sync: SyncPolarity::Negative,
};

impl BlankingProfile {
    /// Look up the constant table for a blanking mode.
    pub fn for_mode(mode: BlankingMode) -> &'static BlankingProfile {
        match mode {
            BlankingMode::Standard => &STANDARD,
            BlankingMode::Reduced => &REDUCED,
            BlankingMode::ReducedV2 => &REDUCED_V2,
        }
    }
}

/// Vertical sync width for the aspect ratio of `width` x `height`.
///
/// Matches the CVT table: 4:3 → 4, 16:9 → 5, 16:10 → 6, 5:4 and 15:9 → 7,
/// anything else → 10.
pub fn aspect_vsync_lines(width: u32, height: u32) -> u32 {
    let (w, h) = (u64::from(width), u64::from(height));
    if h % 3 == 0 && h * 4 / 3 == w {
        4
    } else if h % 9 == 0 && h * 16 / 9 == w {
        5
    } else if h % 10 == 0 && h * 16 / 10 == w {
        6
    } else if (h % 4 == 0 && h * 5 / 4 == w) || (h % 9 == 0 && h * 15 / 9 == w) {
        7
    } else {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup() {
        for mode in BlankingMode::ALL {
            assert_eq!(BlankingProfile::for_mode(mode).mode, mode);
        }
    }

    #[test]
    fn test_aspect_vsync_lines() {
        assert_eq!(aspect_vsync_lines(1024, 768), 4);
        assert_eq!(aspect_vsync_lines(1920, 1080), 5);
        assert_eq!(aspect_vsync_lines(1920, 1200), 6);
        assert_eq!(aspect_vsync_lines(1280, 1024), 7);
        assert_eq!(aspect_vsync_lines(1200, 720), 7);
        assert_eq!(aspect_vsync_lines(3440, 1440), 10);
        assert_eq!(aspect_vsync_lines(1366, 768), 10);
    }

    #[test]
    fn test_fixed_blanking_is_consistent() {
        for profile in [&REDUCED, &REDUCED_V2] {
            if let HorizontalBlanking::Fixed { blank, sync, front_porch } = profile.horizontal {
                assert!(front_porch + sync < blank);
            } else {
                panic!("reduced profiles use fixed horizontal blanking");
            }
        }
    }
}
