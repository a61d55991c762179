//! Symphony Skirmish — a turn-based harmony battle engine.
//!
//! A player and an AI opponent alternate turns, each playing a melody scored
//! against the environment's wind and birds tones. The harmony tier drives
//! damage, healing, stuns, combos, and power-ups until one side falls.
//! Rendering, audio, and input are left to the presentation layer.

pub mod battle;
pub mod config;
pub mod dice;
pub mod opponent;
pub mod tone;
pub mod tuning;
pub mod weather;
