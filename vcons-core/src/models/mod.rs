pub mod interval;
pub mod variant;

// re-export for cleaner imports
pub use self::interval::PositionInterval;
pub use self::variant::VariantRecord;
