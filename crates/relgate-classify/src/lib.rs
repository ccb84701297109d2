mod classify;

pub use classify::classify;
