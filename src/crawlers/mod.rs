pub mod frontier;
pub mod handler;
pub mod web;
