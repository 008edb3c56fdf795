//! # Ecosim
//!
//! Binary-side glue: picks a window, spawns the starting population and
//! drives the frame loop. The simulation itself lives in `ecosim_core`.

pub mod app;
