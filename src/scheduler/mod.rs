//! Report scheduling against the idle timing state.
//!
//! [`ReportScheduler`] is the single owner of the idle state and the seam
//! between the two triggers that touch it: the control transfer task and
//! the periodic report task. Every method takes exactly one borrow for the
//! whole group update, so keeping both triggers on one non-preemptible task
//! is enough to rule out a torn read. Callers that split the triggers
//! across an interrupt boundary should wrap the scheduler in
//! `cortex_m::interrupt::Mutex<RefCell<_>>` the same way the usual class
//! objects are shared.

use core::cell::RefCell;

use embedded_time::duration::Milliseconds;
use embedded_time::fixed_point::FixedPoint;
use log::trace;
use usb_device::control::Request;

use crate::hid_class::{SetIdleHandler, SetIdleRequest};
use crate::idle::{IdleManager, SET_IDLE_UNIT_MS};
use crate::tick::TickSource;
use crate::HidIdleError;

/// Idle duration assumed until the host negotiates one.
pub const DEFAULT_IDLE: Milliseconds = Milliseconds(500);

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// A millisecond value doesn't fit the counter width at this tick rate
    ValueOverflow,
    /// The default idle duration must be nonzero
    ZeroDefaultIdle,
}

pub type BuilderResult<B> = core::result::Result<B, BuilderError>;

/// Drives suppress-or-send decisions for the periodic report loop.
pub struct ReportScheduler<'a, S: TickSource> {
    ticks: &'a S,
    handler: SetIdleHandler,
    manager: RefCell<IdleManager>,
}

impl<'a, S: TickSource> ReportScheduler<'a, S> {
    /// Whether the report due now should be withheld.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.manager.borrow().is_suppressed(self.ticks.now())
    }

    /// Records a transmitted report and arms the next schedule point.
    ///
    /// Call immediately after the report actually went out; this is the
    /// only path that advances the schedule outside of a Set Idle request.
    pub fn report_sent(&self) {
        let now = self.ticks.now();
        let mut manager = self.manager.borrow_mut();
        manager.capture_report_time(now);
        manager.schedule_next_default();
    }

    /// Routes a control request into the Set Idle handler.
    ///
    /// Returns `None` for requests this schedule doesn't recognize so they
    /// pass through to the rest of the control dispatch; `Some(Ok(()))`
    /// when the schedule was updated and the caller should complete the
    /// status stage; `Some(Err(_))` when the request was malformed and the
    /// caller should stall.
    pub fn control_request(&self, request: &Request) -> Option<Result<(), HidIdleError>> {
        let set_idle = SetIdleRequest::decode(request)?;
        Some(self.handle_set_idle(&set_idle))
    }

    /// Applies a decoded Set Idle request using a fresh counter sample.
    pub fn handle_set_idle(&self, request: &SetIdleRequest) -> Result<(), HidIdleError> {
        //sample first so the activation decision sees the arrival time
        let now = self.ticks.now();
        self.handler
            .handle(&mut self.manager.borrow_mut(), request, now)
    }

    /// Restores the schedule configured at build time, for bus reset.
    pub fn reset(&self) {
        trace!("Reset idle schedule");
        self.manager.borrow_mut().reset();
    }

    #[must_use]
    pub fn idle_active(&self) -> bool {
        self.manager.borrow().idle_active()
    }

    /// The active idle duration in 4ms wire units, for answering Get Idle.
    #[must_use]
    pub fn idle_duration_units(&self) -> u8 {
        self.manager.borrow().idle_duration_units()
    }
}

/// Builds a [`ReportScheduler`] from a hardware tick rate and the device's
/// default idle duration.
#[must_use = "this `ReportSchedulerBuilder` must be assigned or consumed by `::build()`"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchedulerBuilder {
    ticks_per_ms: u32,
    default_idle: Milliseconds,
    interface: u8,
}

impl ReportSchedulerBuilder {
    pub fn new(ticks_per_ms: u32) -> Self {
        Self {
            ticks_per_ms,
            default_idle: DEFAULT_IDLE,
            interface: 0,
        }
    }

    /// Reporting period used outside idle suppression. Must be nonzero and
    /// representable in ticks.
    pub fn default_idle<D: Into<Milliseconds>>(mut self, duration: D) -> BuilderResult<Self> {
        let d_ms: Milliseconds = duration.into();

        if d_ms == Milliseconds(0_u32) {
            return Err(BuilderError::ZeroDefaultIdle);
        }
        d_ms.integer()
            .checked_mul(self.ticks_per_ms)
            .ok_or(BuilderError::ValueOverflow)?;

        self.default_idle = d_ms;
        Ok(self)
    }

    /// The HID interface number this schedule answers for.
    pub fn interface(mut self, interface: u8) -> Self {
        self.interface = interface;
        self
    }

    pub fn build<S: TickSource>(self, ticks: &S) -> BuilderResult<ReportScheduler<'_, S>> {
        let default_period = self
            .default_idle
            .integer()
            .checked_mul(self.ticks_per_ms)
            .ok_or(BuilderError::ValueOverflow)?;

        //the widest wire duration must also stay representable in ticks
        u32::from(u8::MAX)
            .checked_mul(SET_IDLE_UNIT_MS)
            .and_then(|units| units.checked_mul(self.ticks_per_ms))
            .ok_or(BuilderError::ValueOverflow)?;

        Ok(ReportScheduler {
            ticks,
            handler: SetIdleHandler::new(self.interface, self.ticks_per_ms),
            manager: RefCell::new(IdleManager::new(self.ticks_per_ms, default_period)),
        })
    }
}
