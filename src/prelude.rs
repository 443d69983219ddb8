//! The USB HID idle prelude.
//!
//! The purpose of this module is to alleviate imports of the structs and
//! traits required to instance the idle schedule:
//!
//! ```
//! # #![allow(unused_imports)]
//! use usbd_hid_idle::prelude::*;
//! ```

pub use crate::hid_class::{HidRequest, SetIdleHandler, SetIdleRequest};
pub use crate::idle::IdleManager;
pub use crate::scheduler::{BuilderError, ReportScheduler, ReportSchedulerBuilder};
pub use crate::tick::{Tick, TickSource};
pub use crate::HidIdleError;
