//! Animated airline-review charts: a timer-driven, legend-filterable
//! playback core (`playback`) over review snapshots (`data`), hosted in an
//! egui window (`app`, `ui`).

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod playback;
pub mod state;
pub mod ui;
