// Application layer: console menu, demo script and text tables over the core.

pub mod demo;
pub mod menu;
pub mod tables;
