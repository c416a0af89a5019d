pub mod classification;
pub mod outcome;
pub mod state;
pub mod transcript;

pub use classification::*;
pub use outcome::*;
pub use state::*;
pub use transcript::*;
