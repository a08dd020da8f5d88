// UI Module
// Framework-free workflow state for front ends built on the RSA core

pub mod workflow;

pub use workflow::{Input, Session, Stage};
