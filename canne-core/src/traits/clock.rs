//! Monotonic time source

/// Monotonic milliseconds since boot
pub type Millis = u64;

/// Trait for the loop's time source
///
/// The controller samples this once per tick. Firmware backs it with the
/// embassy time driver; tests advance it by hand.
pub trait Clock {
    /// Current monotonic time in milliseconds
    fn now_ms(&self) -> Millis;
}
