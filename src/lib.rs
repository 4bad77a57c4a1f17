//! Picture-and-word quiz: the player sees a picture placeholder and picks the
//! matching word out of four, over a fixed number of rounds.
//!
//! The game core (`game`, `question`, `timer`, `effects`) is driven one frame
//! at a time through `GameSession::on_tick` and calls back into its host only
//! through the `Platform` trait. `ui` is the terminal host.

pub mod catalog;
pub mod config;
pub mod effects;
pub mod game;
pub mod platform;
pub mod question;
pub mod save_data;
pub mod timer;
pub mod ui;
