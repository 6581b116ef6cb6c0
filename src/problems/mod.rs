//! Ready-made problem instances.
//!
//! - [`reference`] : four-stage drive from 2 to 0 on a six-point grid with
//!   interpolated intermediate states.

pub mod reference;
