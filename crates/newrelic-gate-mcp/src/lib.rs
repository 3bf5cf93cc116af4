// crates/newrelic-gate-mcp/src/lib.rs
// ============================================================================
// Module: New Relic Gate MCP Library
// Description: Tool catalog and tool router for the New Relic gateway.
// Purpose: Expose adapter operations as named tools with JSON arguments.
// Dependencies: newrelic-gate-client, newrelic-gate-config, newrelic-gate-core
// ============================================================================

//! ## Overview
//! `newrelic-gate-mcp` maps tool names to New Relic adapter operations.
//! Callers pass a tool name, a JSON argument object, and a
//! [`RequestContext`] carrying per-call credentials. Transport and session
//! handling belong to the embedding server.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod router;
pub mod tools;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use router::RequestContext;
pub use router::ToolError;
pub use router::ToolRouter;
pub use tools::ToolDefinition;
pub use tools::ToolName;
pub use tools::tool_definitions;
