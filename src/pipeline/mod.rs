pub mod builder;
pub mod defaults;
pub mod reconstruction;
pub mod runtime;
pub mod traits;
