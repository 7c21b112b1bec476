//! Press/release debouncing
//!
//! Works on calibrated screen points. A press needs N consecutive samples
//! that stay within a tolerance of the run's first sample; a release needs
//! M consecutive empty polls.

/// Debounced transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Debounced {
    /// Press confirmed at the mean position of the run
    Press { x: u16, y: u16 },
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pressing {
        first: (u16, u16),
        count: u8,
        sum_x: u32,
        sum_y: u32,
    },
    Held,
    Releasing {
        empties: u8,
    },
}

/// Consecutive-sample debouncer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    press_samples: u8,
    release_samples: u8,
    tolerance: u16,
    phase: Phase,
}

impl Debouncer {
    /// `press_samples` below 2 is raised to 2, `release_samples` below 1 to 1
    pub fn new(press_samples: u8, release_samples: u8, tolerance: u16) -> Self {
        Self {
            press_samples: press_samples.max(2),
            release_samples: release_samples.max(1),
            tolerance,
            phase: Phase::Idle,
        }
    }

    /// Feed one poll result, `None` meaning nothing touching
    pub fn feed(&mut self, sample: Option<(u16, u16)>) -> Option<Debounced> {
        match (self.phase, sample) {
            (Phase::Idle, None) => None,
            (Phase::Idle, Some(p)) => {
                self.phase = Self::run_from(p);
                None
            }

            (Phase::Pressing { .. }, None) => {
                // Lift mid-run abandons it
                self.phase = Phase::Idle;
                None
            }
            (
                Phase::Pressing {
                    first,
                    count,
                    sum_x,
                    sum_y,
                },
                Some(p),
            ) => {
                if !self.within_tolerance(first, p) {
                    self.phase = Self::run_from(p);
                    return None;
                }
                let count = count + 1;
                let sum_x = sum_x + p.0 as u32;
                let sum_y = sum_y + p.1 as u32;
                if count >= self.press_samples {
                    self.phase = Phase::Held;
                    let n = count as u32;
                    return Some(Debounced::Press {
                        x: (sum_x / n) as u16,
                        y: (sum_y / n) as u16,
                    });
                }
                self.phase = Phase::Pressing {
                    first,
                    count,
                    sum_x,
                    sum_y,
                };
                None
            }

            (Phase::Held, Some(_)) => None,
            (Phase::Held, None) => self.count_empty(0),

            (Phase::Releasing { .. }, Some(_)) => {
                self.phase = Phase::Held;
                None
            }
            (Phase::Releasing { empties }, None) => self.count_empty(empties),
        }
    }

    fn run_from(p: (u16, u16)) -> Phase {
        Phase::Pressing {
            first: p,
            count: 1,
            sum_x: p.0 as u32,
            sum_y: p.1 as u32,
        }
    }

    fn count_empty(&mut self, empties: u8) -> Option<Debounced> {
        let empties = empties + 1;
        if empties >= self.release_samples {
            self.phase = Phase::Idle;
            Some(Debounced::Release)
        } else {
            self.phase = Phase::Releasing { empties };
            None
        }
    }

    fn within_tolerance(&self, a: (u16, u16), b: (u16, u16)) -> bool {
        a.0.abs_diff(b.0) <= self.tolerance && a.1.abs_diff(b.1) <= self.tolerance
    }
}
