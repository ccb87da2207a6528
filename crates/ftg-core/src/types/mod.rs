//! Core data types for the trading gateway.
//!
//! Request records use fixed-width byte fields (see [`fixed`]) matching the
//! engine's zero-initialized C-style request structs. Decoded event payloads
//! use owned `String`s since they cross into the callback runtime.

pub mod enums;
pub mod event;
pub mod fixed;
pub mod request;
pub mod trading;

pub use enums::*;
pub use event::*;
pub use fixed::*;
pub use request::*;
pub use trading::*;
