//! Registry trait for self-registering implementations.
//!
//! Every pluggable backend declares the name it is configured under and the
//! factory that builds it.

/// Base trait for implementation registries.
///
/// Each implementation module must provide a Registry struct that implements
/// this trait, tying the TOML configuration key (for example `memory` in
/// `[storage.implementations.memory]`) to the factory function.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
