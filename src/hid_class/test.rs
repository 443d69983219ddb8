use env_logger::Env;
use usb_device::control::{Recipient, Request, RequestType};
use usb_device::UsbDirection;

use super::*;

fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("trace"))
        .is_test(true)
        .try_init();
}

const TICKS_PER_MS: u32 = 100_000;
const DEFAULT_PERIOD: u32 = 4 * TICKS_PER_MS;

fn set_idle_request(value: u16, index: u16) -> Request {
    Request {
        direction: UsbDirection::Out,
        request_type: RequestType::Class,
        recipient: Recipient::Interface,
        request: HidRequest::SetIdle.into(),
        value,
        index,
        length: 0,
    }
}

#[test]
fn decode_splits_wire_fields() {
    init_logging();

    //duration 0x7D (500ms), report ID 2, interface 3
    let decoded = SetIdleRequest::decode(&set_idle_request(0x7D02, 0x0003)).unwrap();

    assert_eq!(
        decoded,
        SetIdleRequest {
            duration_units: 0x7D,
            report_id: 2,
            interface: 3,
        }
    );
}

#[test]
fn decode_ignores_other_hid_requests() {
    init_logging();

    let mut request = set_idle_request(0x7D00, 0x0000);
    request.request = HidRequest::SetProtocol.into();

    assert_eq!(SetIdleRequest::decode(&request), None);
}

#[test]
fn decode_ignores_standard_and_device_requests() {
    init_logging();

    let mut request = set_idle_request(0x7D00, 0x0000);
    request.request_type = RequestType::Standard;
    assert_eq!(SetIdleRequest::decode(&request), None);

    let mut request = set_idle_request(0x7D00, 0x0000);
    request.recipient = Recipient::Device;
    assert_eq!(SetIdleRequest::decode(&request), None);
}

#[test]
fn decode_tolerates_nonzero_length() {
    init_logging();

    let mut request = set_idle_request(0x7D00, 0x0000);
    request.length = 1;

    assert!(SetIdleRequest::decode(&request).is_some());
}

#[test]
fn handle_converts_wire_units_to_ticks() {
    init_logging();

    let handler = SetIdleHandler::new(0, TICKS_PER_MS);
    let mut manager = IdleManager::new(TICKS_PER_MS, DEFAULT_PERIOD);

    //2 units is 8ms, at or beyond the 4ms default
    let request = SetIdleRequest {
        duration_units: 2,
        report_id: 0,
        interface: 0,
    };
    handler.handle(&mut manager, &request, 0).unwrap();

    assert!(manager.idle_active());
    assert_eq!(manager.period(), 2 * 4 * TICKS_PER_MS);
}

#[test]
fn nonzero_report_id_rejected_without_mutation() {
    init_logging();

    let handler = SetIdleHandler::new(0, TICKS_PER_MS);
    let mut manager = IdleManager::new(TICKS_PER_MS, DEFAULT_PERIOD);
    let before = manager;

    let request = SetIdleRequest {
        duration_units: 0x7D,
        report_id: 3,
        interface: 0,
    };

    assert_eq!(
        handler.handle(&mut manager, &request, 1_000),
        Err(HidIdleError::UnsupportedReportId)
    );
    assert_eq!(manager, before, "Expected engine state left untouched");
}

#[test]
fn wrong_interface_rejected_without_mutation() {
    init_logging();

    let handler = SetIdleHandler::new(2, TICKS_PER_MS);
    let mut manager = IdleManager::new(TICKS_PER_MS, DEFAULT_PERIOD);
    let before = manager;

    let request = SetIdleRequest {
        duration_units: 0x7D,
        report_id: 0,
        interface: 1,
    };

    assert_eq!(
        handler.handle(&mut manager, &request, 1_000),
        Err(HidIdleError::WrongInterface)
    );
    assert_eq!(manager, before, "Expected engine state left untouched");
}
