//! # Equipment Interface
//!
//! This module defines the interface structures exchanged with the robot base.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod drive;
pub mod odom;
