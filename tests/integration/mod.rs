//! Integration test modules for intone
//!
//! - session: lifecycle, builder, snapshots, audio frames
//! - scoring: life/doom end to end, grace period, game over
//! - sequence: phases, countdown, looping
//! - estimation: pitch estimation through the session

pub mod estimation;
pub mod scoring;
pub mod sequence;
