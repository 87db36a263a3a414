//! Draw engine: roster parsing, unique sampling and the timed spin-then-reveal session.
//! Keep this crate free of terminal and filesystem concerns.

pub mod candidates;
pub mod clamp;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod locale;
pub mod notice;
pub mod ports;
pub mod rng;
pub mod sampler;
pub mod session;
pub mod state;

pub use candidates::*;
pub use clamp::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use history::*;
pub use locale::*;
pub use notice::*;
pub use ports::*;
pub use rng::*;
pub use sampler::*;
pub use session::*;
pub use state::*;
