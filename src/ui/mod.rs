//! UI module - standalone widgets for the favorites screen

pub mod components;
