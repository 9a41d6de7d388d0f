//! Mode descriptors: one immutable data row per SSTV mode.
//!
//! Modes could be organized as a class
//! hierarchy several levels deep. Here a mode is a row in a table,
//! dispatched through the `Family` tagged union: per-family behavior
//! is a `match` arm in `body.rs`, not a virtual method.

/// Color channel selector used by `MartinLike`/`ScottieLike` line bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
}

/// Per-family timing parameters. All durations are milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Family {
    Grayscale {
        scan_ms: f64,
    },
    MartinLike {
        scan_ms: f64,
        gap_ms: f64,
        order: [Channel; 3],
    },
    ScottieLike {
        scan_ms: f64,
        gap_ms: f64,
        sync_before_red_ms: f64,
        order: [Channel; 3],
    },
    Robot36 {
        y_scan_ms: f64,
        c_scan_ms: f64,
        gap_ms: f64,
        porch_ms: f64,
        sync_porch_ms: f64,
    },
    Pd {
        porch_ms: f64,
        pixel_ms: f64,
    },
}

/// Immutable per-mode record. Constructed once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeDescriptor {
    pub vis_code: u8,
    pub width: usize,
    pub height: usize,
    /// Horizontal-sync pulse duration at the top of each line. Zero for
    /// Scottie (sync precedes red inside the body instead) and for
    /// Robot 36 (sync is absorbed into its own body producer; see the
    /// Open Question Decisions in DESIGN.md).
    pub sync_ms: f64,
    pub family: Family,
}

/// The thirteen modes this encoder supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Robot8Bw,
    Robot24Bw,
    MartinM1,
    MartinM2,
    ScottieS1,
    ScottieS2,
    Robot36,
    Pd90,
    Pd120,
    Pd160,
    Pd180,
    Pd240,
    Pd290,
}

impl Mode {
    pub const ALL: [Mode; 13] = [
        Mode::Robot8Bw,
        Mode::Robot24Bw,
        Mode::MartinM1,
        Mode::MartinM2,
        Mode::ScottieS1,
        Mode::ScottieS2,
        Mode::Robot36,
        Mode::Pd90,
        Mode::Pd120,
        Mode::Pd160,
        Mode::Pd180,
        Mode::Pd240,
        Mode::Pd290,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Robot8Bw => "Robot8BW",
            Mode::Robot24Bw => "Robot24BW",
            Mode::MartinM1 => "MartinM1",
            Mode::MartinM2 => "MartinM2",
            Mode::ScottieS1 => "ScottieS1",
            Mode::ScottieS2 => "ScottieS2",
            Mode::Robot36 => "Robot36",
            Mode::Pd90 => "PD90",
            Mode::Pd120 => "PD120",
            Mode::Pd160 => "PD160",
            Mode::Pd180 => "PD180",
            Mode::Pd240 => "PD240",
            Mode::Pd290 => "PD290",
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Returns this mode's grayscale-only status. Used by callers to
    /// decide whether to hand the encoder a `PixelField::Luma` or a
    /// `PixelField::Rgb`.
    pub fn is_grayscale(&self) -> bool {
        matches!(self.descriptor().family, Family::Grayscale { .. })
    }

    /// Authoritative mode table. Every constant here is
    /// transcribed once; nothing downstream re-derives or duplicates
    /// these values.
    pub fn descriptor(&self) -> ModeDescriptor {
        use Channel::{B, G, R};
        match self {
            Mode::Robot8Bw => ModeDescriptor {
                vis_code: 0x02,
                width: 160,
                height: 120,
                sync_ms: 7.0,
                family: Family::Grayscale { scan_ms: 60.0 },
            },
            Mode::Robot24Bw => ModeDescriptor {
                vis_code: 0x0A,
                width: 320,
                height: 240,
                sync_ms: 7.0,
                family: Family::Grayscale { scan_ms: 93.0 },
            },
            Mode::MartinM1 => ModeDescriptor {
                vis_code: 0x2C,
                width: 320,
                height: 256,
                sync_ms: 4.862,
                family: Family::MartinLike {
                    scan_ms: 146.432,
                    gap_ms: 0.572,
                    order: [G, B, R],
                },
            },
            Mode::MartinM2 => ModeDescriptor {
                vis_code: 0x28,
                width: 160,
                height: 256,
                sync_ms: 4.862,
                family: Family::MartinLike {
                    scan_ms: 73.216,
                    gap_ms: 0.572,
                    order: [G, B, R],
                },
            },
            Mode::ScottieS1 => ModeDescriptor {
                vis_code: 0x3C,
                width: 320,
                height: 256,
                sync_ms: 0.0,
                family: Family::ScottieLike {
                    scan_ms: 136.74,
                    gap_ms: 1.5,
                    sync_before_red_ms: 9.0,
                    order: [R, G, B],
                },
            },
            Mode::ScottieS2 => ModeDescriptor {
                vis_code: 0x38,
                width: 160,
                height: 256,
                sync_ms: 0.0,
                family: Family::ScottieLike {
                    scan_ms: 86.564,
                    gap_ms: 1.5,
                    sync_before_red_ms: 9.0,
                    order: [R, G, B],
                },
            },
            Mode::Robot36 => ModeDescriptor {
                vis_code: 0x08,
                width: 320,
                height: 240,
                sync_ms: 0.0,
                family: Family::Robot36 {
                    y_scan_ms: 88.0,
                    c_scan_ms: 44.0,
                    gap_ms: 4.5,
                    porch_ms: 1.5,
                    sync_porch_ms: 3.0,
                },
            },
            Mode::Pd90 => ModeDescriptor {
                vis_code: 0x63,
                width: 320,
                height: 256,
                sync_ms: 20.0,
                family: Family::Pd {
                    porch_ms: 2.08,
                    pixel_ms: 0.532,
                },
            },
            Mode::Pd120 => ModeDescriptor {
                vis_code: 0x5F,
                width: 640,
                height: 496,
                sync_ms: 20.0,
                family: Family::Pd {
                    porch_ms: 2.08,
                    pixel_ms: 0.190,
                },
            },
            Mode::Pd160 => ModeDescriptor {
                vis_code: 0x62,
                width: 512,
                height: 400,
                sync_ms: 20.0,
                family: Family::Pd {
                    porch_ms: 2.08,
                    pixel_ms: 0.382,
                },
            },
            Mode::Pd180 => ModeDescriptor {
                vis_code: 0x60,
                width: 640,
                height: 496,
                sync_ms: 20.0,
                family: Family::Pd {
                    porch_ms: 2.08,
                    pixel_ms: 0.286,
                },
            },
            Mode::Pd240 => ModeDescriptor {
                vis_code: 0x61,
                width: 640,
                height: 496,
                sync_ms: 20.0,
                family: Family::Pd {
                    porch_ms: 2.08,
                    pixel_ms: 0.382,
                },
            },
            Mode::Pd290 => ModeDescriptor {
                vis_code: 0x5E,
                width: 800,
                height: 616,
                sync_ms: 20.0,
                family: Family::Pd {
                    porch_ms: 2.08,
                    pixel_ms: 0.286,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_round_trips_through_name() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(mode.name()), Some(mode));
        }
    }

    #[test]
    fn vis_codes_are_seven_bit() {
        for mode in Mode::ALL {
            assert!(mode.descriptor().vis_code < 128);
        }
    }

    #[test]
    fn grayscale_modes_flagged_correctly() {
        assert!(Mode::Robot8Bw.is_grayscale());
        assert!(Mode::Robot24Bw.is_grayscale());
        assert!(!Mode::MartinM1.is_grayscale());
        assert!(!Mode::Robot36.is_grayscale());
    }

    #[test]
    fn pd120_geometry_matches_table() {
        let d = Mode::Pd120.descriptor();
        assert_eq!((d.width, d.height), (640, 496));
    }
}
