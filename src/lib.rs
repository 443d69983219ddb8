//! USB HID idle rate handling for [`usb-device`](https://crates.io/crates/usb-device) based firmware.
//!
//! Implements the Set Idle class request (HID spec 7.2.4) and the report
//! schedule it governs: a device polling loop asks before every candidate
//! report whether the host has asked for it to be withheld, and the control
//! transfer task feeds newly negotiated idle durations into the same
//! schedule. All timing is done on raw samples of a free-running hardware
//! counter, so the crate works on any platform that can expose one through
//! the [`tick::TickSource`] trait.
//!
//! ```rust, no_run
//! use embedded_time::duration::Milliseconds;
//! use usbd_hid_idle::prelude::*;
//!
//! struct HardwareTimer;
//!
//! impl TickSource for HardwareTimer {
//!     fn now(&self) -> Tick {
//!         // read the free-running counter register
//! #       0
//!     }
//! }
//!
//! let ticks = HardwareTimer;
//!
//! //100_000 counter ticks per millisecond
//! let scheduler = ReportSchedulerBuilder::new(100_000)
//!     .default_idle(Milliseconds(500u32))
//!     .unwrap()
//!     .interface(0)
//!     .build(&ticks)
//!     .unwrap();
//!
//! loop {
//!     //control transfer task - route class requests for the HID interface
//!     //if let Some(result) = scheduler.control_request(&request) { ... }
//!
//!     //report task - poll before every candidate report instant
//!     if !scheduler.is_suppressed() {
//!         //transmit the input report, then re-arm the schedule
//!         scheduler.report_sent();
//!     }
//! }
//! ```

#![no_std]

//Allow the use of std in tests
#[cfg(test)]
#[macro_use]
extern crate std;

pub mod hid_class;
pub mod idle;
pub mod prelude;
pub mod scheduler;
pub mod tick;

/// Failure handling a Set Idle request. The caller is expected to surface
/// either variant as a protocol STALL.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidIdleError {
    /// The request named a report ID but the report descriptor defines none
    UnsupportedReportId,
    /// The request was addressed to an interface this schedule doesn't own
    WrongInterface,
}
