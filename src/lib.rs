// ABOUTME: Library root for the transfer tool
// ABOUTME: Session state, transfer orchestration, and the backend API client

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod profile;
pub mod remote;
pub mod session;
pub mod transfer;
