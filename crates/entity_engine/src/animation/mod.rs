//! Animation playback

pub mod frame_player;

pub use frame_player::FramePlayer;
