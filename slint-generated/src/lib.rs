#![no_std]
//! Rust bindings for `ui/app-window.slint`.

extern crate alloc;

slint::include_modules!();
