//! GymPro Plan Engine - Subscription plan transition and availability rules.
//!
//! Given a member's current subscription and a candidate plan/cycle
//! selection, this crate decides what kind of transition is being requested,
//! whether selecting it is currently allowed, and how much time remains in
//! the current billing period. It performs no I/O: persistence, checkout,
//! and payment execution live in the surrounding platform and consume this
//! engine through plain data.

pub mod application;
pub mod domain;
