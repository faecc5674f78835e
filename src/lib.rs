//! Easel — a small raster paint application.
//!
//! The crate splits into a GUI-free core (the canvas surface and its raster
//! operations) and a thin egui controller on top.  The binary target in
//! `main.rs` boots the controller; everything else is library code so the
//! engine stays testable without a window.

#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod canvas;
pub mod components;
pub mod io;
pub mod logger;
pub mod ops;
