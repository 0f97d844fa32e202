//! Workflow integration tests over the public control-loop API.
//!
//! Every generated mode runs against [`scripted::ScriptedGenerator`], so
//! the tests pin down phase order and session bookkeeping without a
//! network.

mod analyze_workflow;
mod error_recovery;
mod reflect_workflow;
mod scripted;
mod sequential_workflow;
mod solve_workflow;
mod think_workflow;

use std::sync::Arc;

use mcp_brain::modes::{ControlLoop, ProcessingMode, ReasoningRequest, ReasoningResult};

use scripted::ScriptedGenerator;

/// Run `mode` to completion, keeping the generator for call inspection.
async fn run(
    generator: &Arc<ScriptedGenerator>,
    request: ReasoningRequest,
    mode: ProcessingMode,
) -> ReasoningResult {
    ControlLoop::new(Arc::clone(generator))
        .run(request, &mode)
        .await
        .expect("run should succeed")
}
