//! Background execution and callback delivery.

mod batch;
mod checksummer;
mod delivery;

pub use checksummer::Checksummer;
pub use delivery::DeliveryQueue;
