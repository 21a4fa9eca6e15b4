//! Screen state exposed to the presentation layer.

pub mod controller;

pub use controller::{ViewController, ViewError, ViewSnapshot, ViewState};
