pub mod debounce;

pub use debounce::DebounceGate;
