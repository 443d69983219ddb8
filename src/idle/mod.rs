//! Idle report timing state machine.
//!
//! Tracks the negotiated idle period against a free-running counter and
//! answers, for every polling opportunity, whether the next scheduled report
//! should be withheld. The activation rules reproduce HID spec 7.2.4.

use log::trace;

use crate::tick::{tick_elapsed, Tick};

/// One Set Idle wire duration unit - HID spec 7.2.4
pub const SET_IDLE_UNIT_MS: u32 = 4;

//A new duration arriving within 4ms of the period boundary only takes
//effect after the next report - HID spec 7.2.4
const ACTIVATION_WINDOW_MS: u32 = 4;

/// Idle schedule state for a single HID interface.
///
/// All operations that need the current time take an explicit [`Tick`]
/// sample; the manager never reads a clock itself. Construction through
/// [`ReportSchedulerBuilder`](crate::scheduler::ReportSchedulerBuilder)
/// validates the tick rate conversions; callers constructing directly must
/// pick a `ticks_per_ms` that keeps 1020ms representable in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleManager {
    ticks_per_ms: u32,
    default_period: u32,
    activation_window: u32,
    period: u32,
    last_report: Tick,
    next_report: Tick,
    idle_active: bool,
}

impl IdleManager {
    /// `default_period` is the reporting period used outside idle
    /// suppression, in ticks. Must be greater than zero.
    #[must_use]
    pub fn new(ticks_per_ms: u32, default_period: u32) -> Self {
        Self {
            ticks_per_ms,
            default_period,
            activation_window: ACTIVATION_WINDOW_MS * ticks_per_ms,
            period: default_period,
            last_report: 0,
            next_report: 0,
            idle_active: false,
        }
    }

    /// Restores the state configured at construction.
    pub fn reset(&mut self) {
        self.period = self.default_period;
        self.last_report = 0;
        self.next_report = 0;
        self.idle_active = false;
    }

    /// Records the counter sample taken when a report was transmitted.
    pub fn capture_report_time(&mut self, now: Tick) {
        self.last_report = now;
    }

    /// Arms the next schedule point one period after the last report.
    ///
    /// Called after [`capture_report_time`](Self::capture_report_time)
    /// regardless of idle state.
    pub fn schedule_next_default(&mut self) {
        self.next_report = self.last_report.wrapping_add(self.period);
    }

    /// Applies a newly negotiated idle duration, in ticks.
    ///
    /// `now` must be sampled at request handling time; a stale sample makes
    /// the activation decision wrong.
    pub fn apply_set_idle(&mut self, duration: u32, now: Tick) {
        //duration 0 suppresses indefinitely; a duration at or beyond the
        //default interval also counts as suppression
        self.idle_active = duration == 0 || duration >= self.default_period;

        if !self.idle_active {
            self.period = self.default_period;
            trace!("Idle inactive, period restored to default");
            return;
        }

        let elapsed = tick_elapsed(self.last_report, now);
        if self.period.wrapping_sub(elapsed) < self.activation_window {
            //request arrived too close to the period boundary, the new
            //duration only takes effect after the next report
            self.next_report = self.last_report.wrapping_add(self.period);
            trace!("Set idle activation deferred until the next report");
        } else {
            //takes effect as if issued immediately after the previous report
            self.next_report = self.last_report.wrapping_add(duration);
        }

        if duration != 0 {
            self.period = duration;
        }
    }

    /// Whether the report due at `now` should be withheld.
    ///
    /// Always `false` outside idle suppression. Valid while `now` and the
    /// scheduled point are within half the counter range of each other.
    #[must_use]
    pub fn is_suppressed(&self, now: Tick) -> bool {
        self.idle_active && (self.next_report.wrapping_sub(now) as i32) > 0
    }

    #[must_use]
    pub fn idle_active(&self) -> bool {
        self.idle_active
    }

    /// The active reporting period, in ticks.
    #[must_use]
    pub fn period(&self) -> u32 {
        self.period
    }

    #[must_use]
    pub fn last_report_time(&self) -> Tick {
        self.last_report
    }

    #[must_use]
    pub fn next_report_time(&self) -> Tick {
        self.next_report
    }

    /// The active period in Set Idle wire units of 4ms, saturating at the
    /// width of the wire field.
    #[must_use]
    pub fn idle_duration_units(&self) -> u8 {
        u8::try_from(self.period / (SET_IDLE_UNIT_MS * self.ticks_per_ms)).unwrap_or(u8::MAX)
    }
}
