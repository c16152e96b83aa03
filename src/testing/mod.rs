pub mod dummies;
pub mod spies;
pub mod stubs;
