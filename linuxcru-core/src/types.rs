//! Type definitions for resolution requests and computed modelines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

// =============================================================================
// REFRESH RATE
// =============================================================================

/// Refresh rate stored as an integer number of millihertz.
///
/// Fractional broadcast rates such as 59.94 Hz are held exactly
/// (`59940`), so repeated calculations never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RefreshRate(u32);

impl RefreshRate {
    /// Lowest refresh rate the timing calculator accepts (0.01 Hz).
    ///
    /// Anything lower would show as `0.00` in a mode name.
    pub const MIN: RefreshRate = RefreshRate(10);

    /// Highest refresh rate the timing calculator accepts (300 Hz).
    pub const MAX: RefreshRate = RefreshRate(300_000);

    /// Create a refresh rate from whole hertz.
    pub const fn from_hz(hz: u32) -> Self {
        Self(hz.saturating_mul(1000))
    }

    /// Create a refresh rate from millihertz.
    pub const fn from_millihertz(millihertz: u32) -> Self {
        Self(millihertz)
    }

    /// Create a refresh rate from a floating point value, rounded to the
    /// nearest millihertz.
    pub fn from_hz_f64(hz: f64) -> Result<Self> {
        if !hz.is_finite() || hz < 0.0 {
            return Err(TimingError::InvalidRefreshRate(hz.to_string()));
        }
        let millihertz = (hz * 1000.0).round();
        if millihertz > f64::from(u32::MAX) {
            return Err(TimingError::InvalidRefreshRate(hz.to_string()));
        }
        Ok(Self(millihertz as u32))
    }

    /// Refresh rate in millihertz.
    pub const fn millihertz(&self) -> u32 {
        self.0
    }

    /// Refresh rate in hertz (lossy, for display and interop only).
    pub fn as_hz_f64(&self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

impl fmt::Display for RefreshRate {
    /// Formats with exactly two decimals, rounding half up.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let centihertz = (u64::from(self.0) + 5) / 10;
        write!(f, "{}.{:02}", centihertz / 100, centihertz % 100)
    }
}

impl FromStr for RefreshRate {
    type Err = TimingError;

    /// Parse a decimal refresh rate such as `60`, `59.94` or `143.856`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TimingError::InvalidRefreshRate(s.to_string());
        let trimmed = s.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > 3
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut millis: u64 = 0;
        for (i, digit) in fraction.bytes().enumerate() {
            millis += u64::from(digit - b'0') * 10u64.pow(2 - i as u32);
        }

        let total = whole
            .checked_mul(1000)
            .and_then(|w| w.checked_add(millis))
            .ok_or_else(invalid)?;
        u32::try_from(total).map(Self).map_err(|_| invalid())
    }
}

impl TryFrom<f64> for RefreshRate {
    type Error = TimingError;

    fn try_from(hz: f64) -> Result<Self> {
        Self::from_hz_f64(hz)
    }
}

impl From<RefreshRate> for f64 {
    fn from(rate: RefreshRate) -> f64 {
        rate.as_hz_f64()
    }
}

// =============================================================================
// RESOLUTION REQUEST
// =============================================================================

/// A requested display mode: active pixels and refresh rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Active horizontal pixels
    pub width: u32,
    /// Active vertical lines
    pub height: u32,
    /// Requested vertical refresh rate
    pub refresh: RefreshRate,
}

impl Resolution {
    /// Create a new resolution request.
    pub const fn new(width: u32, height: u32, refresh: RefreshRate) -> Self {
        Self {
            width,
            height,
            refresh,
        }
    }

    /// Create a resolution request with a whole-hertz refresh rate.
    pub const fn at_hz(width: u32, height: u32, hz: u32) -> Self {
        Self::new(width, height, RefreshRate::from_hz(hz))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@{}", self.width, self.height, self.refresh)
    }
}

// =============================================================================
// BLANKING MODE
// =============================================================================

/// CVT blanking variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlankingMode {
    /// CVT default blanking (CRT-compatible)
    #[default]
    Standard,
    /// CVT reduced blanking (CVT-RB)
    Reduced,
    /// CVT reduced blanking version 2 (CVT-RBv2)
    ReducedV2,
}

impl BlankingMode {
    /// All supported blanking modes, from widest to narrowest blanking.
    pub const ALL: [BlankingMode; 3] = [Self::Standard, Self::Reduced, Self::ReducedV2];

    /// Get the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlankingMode::Standard => "standard",
            BlankingMode::Reduced => "reduced",
            BlankingMode::ReducedV2 => "reduced-v2",
        }
    }

    /// Suffix appended to the mode width/height in generated mode names.
    pub fn name_suffix(&self) -> &'static str {
        match self {
            BlankingMode::Standard => "",
            BlankingMode::Reduced => "R",
            BlankingMode::ReducedV2 => "RB2",
        }
    }
}

impl fmt::Display for BlankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlankingMode {
    type Err = TimingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "cvt" => Ok(Self::Standard),
            "reduced" | "cvt-rb" | "rb" => Ok(Self::Reduced),
            "reduced-v2" | "reduced_v2" | "cvt-rb2" | "cvt-rbv2" | "rb2" => Ok(Self::ReducedV2),
            other => Err(TimingError::UnsupportedBlankingMode(other.to_string())),
        }
    }
}

// =============================================================================
// MODELINE
// =============================================================================

/// Sync pulse polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolarity {
    Positive,
    Negative,
}

impl SyncPolarity {
    /// Sign character used in modeline flags.
    pub fn sign(&self) -> char {
        match self {
            SyncPolarity::Positive => '+',
            SyncPolarity::Negative => '-',
        }
    }
}

/// Pixel clock in kilohertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelClock(u32);

impl PixelClock {
    /// Create a pixel clock from kilohertz.
    pub const fn from_khz(khz: u32) -> Self {
        Self(khz)
    }

    /// Create a pixel clock from megahertz given as hundredths (17300 = 173.00 MHz).
    pub const fn from_centi_mhz(centi_mhz: u32) -> Self {
        Self(centi_mhz.saturating_mul(10))
    }

    /// Pixel clock in kilohertz.
    pub const fn khz(&self) -> u32 {
        self.0
    }

    /// Pixel clock in hertz.
    pub const fn hz(&self) -> u64 {
        self.0 as u64 * 1000
    }
}

impl fmt::Display for PixelClock {
    /// Formats in MHz with two decimals, truncating any sub-10 kHz remainder.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 1000, (self.0 % 1000) / 10)
    }
}

/// Timing numbers for one axis, in pixels (horizontal) or lines (vertical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisTiming {
    /// Visible pixels or lines
    pub active: u32,
    /// First pixel/line of the sync pulse
    pub sync_start: u32,
    /// First pixel/line after the sync pulse
    pub sync_end: u32,
    /// Total pixels/lines including blanking
    pub total: u32,
}

impl AxisTiming {
    /// Check `active <= sync_start < sync_end < total`.
    pub fn is_ordered(&self) -> bool {
        self.active <= self.sync_start
            && self.sync_start < self.sync_end
            && self.sync_end < self.total
    }

    /// Blanking period length.
    pub fn blanking(&self) -> u32 {
        self.total - self.active
    }

    /// Front porch length.
    pub fn front_porch(&self) -> u32 {
        self.sync_start - self.active
    }

    /// Sync pulse width.
    pub fn sync_width(&self) -> u32 {
        self.sync_end - self.sync_start
    }

    /// Back porch length.
    pub fn back_porch(&self) -> u32 {
        self.total - self.sync_end
    }

    fn check(&self, axis: &'static str) -> Result<()> {
        if self.is_ordered() {
            Ok(())
        } else {
            Err(TimingError::DegenerateTiming {
                axis,
                active: self.active,
                sync_start: self.sync_start,
                sync_end: self.sync_end,
                total: self.total,
            })
        }
    }
}

/// A complete set of display timings.
///
/// Fields are private so that a `Modeline` always satisfies the ordering
/// invariant on both axes; build one with
/// [`compute_modeline`](crate::timing::compute_modeline) or
/// [`Modeline::from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Modeline {
    pixel_clock: PixelClock,
    horizontal: AxisTiming,
    vertical: AxisTiming,
    h_sync: SyncPolarity,
    v_sync: SyncPolarity,
    interlaced: bool,
    blanking: BlankingMode,
    refresh: RefreshRate,
}

impl Modeline {
    /// Assemble a modeline from raw timings.
    ///
    /// `refresh` is the rate the mode was requested at; it only feeds the
    /// generated mode name.
    pub fn from_parts(
        pixel_clock: PixelClock,
        horizontal: AxisTiming,
        vertical: AxisTiming,
        h_sync: SyncPolarity,
        v_sync: SyncPolarity,
        blanking: BlankingMode,
        refresh: RefreshRate,
    ) -> Result<Self> {
        horizontal.check("horizontal")?;
        vertical.check("vertical")?;

        Ok(Self {
            pixel_clock,
            horizontal,
            vertical,
            h_sync,
            v_sync,
            interlaced: false,
            blanking,
            refresh,
        })
    }

    pub fn pixel_clock(&self) -> PixelClock {
        self.pixel_clock
    }

    pub fn horizontal(&self) -> &AxisTiming {
        &self.horizontal
    }

    pub fn vertical(&self) -> &AxisTiming {
        &self.vertical
    }

    pub fn h_sync(&self) -> SyncPolarity {
        self.h_sync
    }

    pub fn v_sync(&self) -> SyncPolarity {
        self.v_sync
    }

    pub fn interlaced(&self) -> bool {
        self.interlaced
    }

    pub fn blanking(&self) -> BlankingMode {
        self.blanking
    }

    /// The refresh rate this modeline was requested at.
    pub fn requested_refresh(&self) -> RefreshRate {
        self.refresh
    }

    /// Canonical mode name, e.g. `1920x1080_60.00` or `2560x1440R_144.00`.
    pub fn name(&self) -> String {
        format!(
            "{}x{}{}_{}",
            self.horizontal.active,
            self.vertical.active,
            self.blanking.name_suffix(),
            self.refresh
        )
    }

    /// Horizontal line rate produced by the rounded pixel clock, in hertz.
    pub fn horizontal_frequency_hz(&self) -> u64 {
        self.pixel_clock.hz() / u64::from(self.horizontal.total)
    }

    /// Vertical refresh produced by the rounded pixel clock (rounded down).
    pub fn actual_refresh(&self) -> RefreshRate {
        let frame = u64::from(self.horizontal.total) * u64::from(self.vertical.total);
        let millihertz = self.pixel_clock.hz() * 1000 / frame;
        RefreshRate::from_millihertz(u32::try_from(millihertz).unwrap_or(u32::MAX))
    }
}

/// Formats the pixel clock, the eight timing numbers and the sync flags in
/// Xorg modeline order (without the mode name).
impl fmt::Display for Modeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {} {}HSync {}VSync",
            self.pixel_clock,
            self.horizontal.active,
            self.horizontal.sync_start,
            self.horizontal.sync_end,
            self.horizontal.total,
            self.vertical.active,
            self.vertical.sync_start,
            self.vertical.sync_end,
            self.vertical.total,
            self.h_sync.sign(),
            self.v_sync.sign()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_rate_parsing() {
        assert_eq!("60".parse::<RefreshRate>().unwrap().millihertz(), 60_000);
        assert_eq!("59.94".parse::<RefreshRate>().unwrap().millihertz(), 59_940);
        assert_eq!("143.856".parse::<RefreshRate>().unwrap().millihertz(), 143_856);
        assert_eq!(".5".parse::<RefreshRate>().unwrap().millihertz(), 500);
        assert_eq!(" 165 ".parse::<RefreshRate>().unwrap().millihertz(), 165_000);

        assert!("".parse::<RefreshRate>().is_err());
        assert!(".".parse::<RefreshRate>().is_err());
        assert!("-60".parse::<RefreshRate>().is_err());
        assert!("60.0001".parse::<RefreshRate>().is_err());
        assert!("sixty".parse::<RefreshRate>().is_err());
        assert!("99999999".parse::<RefreshRate>().is_err());
    }

    #[test]
    fn test_refresh_rate_display() {
        assert_eq!(RefreshRate::from_hz(60).to_string(), "60.00");
        assert_eq!(RefreshRate::from_millihertz(59_940).to_string(), "59.94");
        assert_eq!(RefreshRate::from_millihertz(143_856).to_string(), "143.86");
        assert_eq!(RefreshRate::from_millihertz(59_995).to_string(), "60.00");
    }

    #[test]
    fn test_refresh_rate_from_f64() {
        assert_eq!(RefreshRate::from_hz_f64(59.94).unwrap().millihertz(), 59_940);
        assert_eq!(RefreshRate::from_hz_f64(0.0).unwrap().millihertz(), 0);
        assert!(RefreshRate::from_hz_f64(f64::NAN).is_err());
        assert!(RefreshRate::from_hz_f64(-1.0).is_err());
        assert!(RefreshRate::from_hz_f64(1e12).is_err());
    }

    #[test]
    fn test_blanking_mode_parsing() {
        assert_eq!("cvt".parse::<BlankingMode>().unwrap(), BlankingMode::Standard);
        assert_eq!("CVT-RB".parse::<BlankingMode>().unwrap(), BlankingMode::Reduced);
        assert_eq!("cvt-rb2".parse::<BlankingMode>().unwrap(), BlankingMode::ReducedV2);
        assert_eq!(
            "reduced-v3".parse::<BlankingMode>(),
            Err(TimingError::UnsupportedBlankingMode("reduced-v3".to_string()))
        );
    }

    #[test]
    fn test_pixel_clock_display_truncates() {
        assert_eq!(PixelClock::from_khz(173_000).to_string(), "173.00");
        assert_eq!(PixelClock::from_khz(138_500).to_string(), "138.50");
        assert_eq!(PixelClock::from_khz(25_175).to_string(), "25.17");
        assert_eq!(PixelClock::from_centi_mhz(130_620).khz(), 1_306_200);
    }

    #[test]
    fn test_from_parts_rejects_unordered_axis() {
        let horizontal = AxisTiming {
            active: 640,
            sync_start: 656,
            sync_end: 656,
            total: 800,
        };
        let vertical = AxisTiming {
            active: 480,
            sync_start: 490,
            sync_end: 492,
            total: 525,
        };

        let err = Modeline::from_parts(
            PixelClock::from_khz(25_170),
            horizontal,
            vertical,
            SyncPolarity::Negative,
            SyncPolarity::Negative,
            BlankingMode::Standard,
            RefreshRate::from_hz(60),
        )
        .unwrap_err();

        assert!(matches!(err, TimingError::DegenerateTiming { axis: "horizontal", .. }));
    }

    #[test]
    fn test_modeline_display_and_name() {
        let modeline = Modeline::from_parts(
            PixelClock::from_khz(25_170),
            AxisTiming {
                active: 640,
                sync_start: 656,
                sync_end: 752,
                total: 800,
            },
            AxisTiming {
                active: 480,
                sync_start: 490,
                sync_end: 492,
                total: 525,
            },
            SyncPolarity::Negative,
            SyncPolarity::Negative,
            BlankingMode::Standard,
            RefreshRate::from_hz(60),
        )
        .unwrap();

        assert_eq!(modeline.name(), "640x480_60.00");
        assert_eq!(
            modeline.to_string(),
            "25.17 640 656 752 800 480 490 492 525 -HSync -VSync"
        );
        assert_eq!(modeline.horizontal().front_porch(), 16);
        assert_eq!(modeline.horizontal().sync_width(), 96);
        assert_eq!(modeline.horizontal().back_porch(), 48);
        assert_eq!(modeline.vertical().blanking(), 45);
        assert!(!modeline.interlaced());
    }
}
