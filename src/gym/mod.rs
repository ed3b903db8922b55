pub mod k_armed_bandit;
pub mod rooms;

pub use k_armed_bandit::KArmedBandit;
pub use rooms::{Layout, Rooms, RoomsConfig};
