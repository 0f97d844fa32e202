//! MCP Brain Server
//!
//! An MCP server that drives structured, multi-step reasoning sessions over
//! the Anthropic Messages API.
//!
//! # Features
//!
//! - Four generated modes (think, analyze, solve, reflect) sharing one
//!   control loop and one session model
//! - Revision of weak thoughts, branch exploration, hypothesis testing and
//!   synthesis into a final answer
//! - A caller-driven `sequential_thinking` tool with persistent sessions
//! - Deterministic problem complexity classification
//!
//! # Quick Start
//!
//! ```bash
//! ANTHROPIC_API_KEY=sk-ant-xxx ./mcp-brain
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     stdin      ┌─────────────────┐
//! │ MCP client  │───────────────▶│  BrainServer    │
//! │             │◀───────────────│  (rmcp tools)   │
//! └─────────────┘     stdout     └────────┬────────┘
//!                                         │
//!                                ┌────────▼────────┐
//!                                │  ControlLoop    │──▶ Generator ──▶ Anthropic API
//!                                └────────┬────────┘
//!                                         │
//!                                ┌────────▼────────┐
//!                                │ SessionManager  │
//!                                └─────────────────┘
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod anthropic;
pub mod config;
pub mod error;
pub mod generator;
pub mod modes;
pub mod prompts;
pub mod server;
pub mod session;
pub mod traits;

#[cfg(test)]
mod test_utils;
