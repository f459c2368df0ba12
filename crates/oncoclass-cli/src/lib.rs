pub mod analysis;
pub mod classify;
pub mod util;
