// src/lib.rs
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod packet;

pub mod extract;
pub mod naming;
pub mod prompt;
pub mod model;

pub mod scan;
pub mod git;
pub mod docgen;
pub mod copyright;

pub mod commands;
