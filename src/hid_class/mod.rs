//! HID class request decoding and validation for the idle schedule.
//!
//! Only the Set Idle request is consumed here; everything else on the
//! control pipe is left untouched for other class handlers.

use log::{info, warn};
use num_enum::IntoPrimitive;
use packed_struct::prelude::*;
use usb_device::control::{Recipient, Request, RequestType};

use crate::idle::{IdleManager, SET_IDLE_UNIT_MS};
use crate::tick::Tick;
use crate::HidIdleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PrimitiveEnum, IntoPrimitive)]
#[repr(u8)]
pub enum HidRequest {
    GetReport = 0x01,
    GetIdle = 0x02,
    GetProtocol = 0x03,
    SetReport = 0x09,
    SetIdle = 0x0A,
    SetProtocol = 0x0B,
}

/// A Set Idle request as split out of the setup packet.
///
/// `wValue` carries the duration in 4ms units in its high byte and the
/// report ID in its low byte; the low byte of `wIndex` is the target
/// interface.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetIdleRequest {
    pub duration_units: u8,
    pub report_id: u8,
    pub interface: u8,
}

impl SetIdleRequest {
    /// Decodes a Set Idle request, returning `None` for any other request
    /// so it passes through to the rest of the control dispatch.
    #[must_use]
    pub fn decode(request: &Request) -> Option<Self> {
        //only Class requests addressed to an interface
        if !(request.request_type == RequestType::Class
            && request.recipient == Recipient::Interface)
        {
            return None;
        }

        if HidRequest::from_primitive(request.request) != Some(HidRequest::SetIdle) {
            return None;
        }

        if request.length != 0 {
            warn!(
                "Expected SetIdle to have length 0, received {:X}",
                request.length
            );
        }

        Some(Self {
            duration_units: (request.value >> 8) as u8,
            report_id: (request.value & 0xFF) as u8,
            interface: (request.index & 0xFF) as u8,
        })
    }
}

/// Validates Set Idle requests and applies them to an [`IdleManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetIdleHandler {
    interface: u8,
    ticks_per_ms: u32,
}

impl SetIdleHandler {
    #[must_use]
    pub fn new(interface: u8, ticks_per_ms: u32) -> Self {
        Self {
            interface,
            ticks_per_ms,
        }
    }

    /// Applies a decoded Set Idle request to the manager.
    ///
    /// `now` must be a fresh counter sample taken at request handling time.
    /// On validation failure the manager is left untouched and the caller
    /// is expected to stall the transfer.
    pub fn handle(
        &self,
        manager: &mut IdleManager,
        request: &SetIdleRequest,
        now: Tick,
    ) -> Result<(), HidIdleError> {
        //the report descriptor defines no report IDs, only the all-reports
        //form of the request is valid - HID spec 7.2.4
        if request.report_id != 0 {
            warn!(
                "Set Idle rejected, unsupported report ID {:X}",
                request.report_id
            );
            return Err(HidIdleError::UnsupportedReportId);
        }

        if request.interface != self.interface {
            warn!(
                "Set Idle rejected, interface {:X} not handled",
                request.interface
            );
            return Err(HidIdleError::WrongInterface);
        }

        let duration = u32::from(request.duration_units) * SET_IDLE_UNIT_MS * self.ticks_per_ms;
        manager.apply_set_idle(duration, now);
        info!("Set idle to {:X} units", request.duration_units);
        Ok(())
    }
}

#[cfg(test)]
mod test;
