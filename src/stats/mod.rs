pub mod clock;

pub use clock::clocked;
