//! Default post-processing services.
//!
//! Each service is held behind an `Arc<dyn Trait>` so callers can replace
//! any one of them without touching the others.

mod context;
mod cost;
mod diff;
mod documentor;
mod formatter;
mod metrics;
mod performance;
mod security;
mod testing;

pub use context::{PLACEHOLDER_PROJECT_CONTEXT, StaticContextAnalyzer};
pub use cost::{COST_PER_CHAR_USD, LengthCostEstimator};
pub use diff::{CONTEXT_LINES, LcsDiffGenerator};
pub use documentor::HeaderDocumentor;
pub use formatter::BracketFormatter;
pub use metrics::{
    COMPLEXITY_RANGE, LineCounts, MAINTAINABILITY_RANGE, MetricsReporter, READABILITY_RANGE,
};
pub use performance::{HeuristicPerformanceOptimizer, MAX_LINES, max_loop_depth};
pub use security::PatternSecurityScanner;
pub use testing::{PASSING_SUMMARY, PlaceholderTestRunner};

use chimera_core::services::{
    CodeDocumentor, CodeFormatter, ContextAnalyzer, CostEstimator, DiffGenerator, MetricsAnalyzer,
    PerformanceOptimizer, SecurityScanner, TestRunner,
};
use std::sync::Arc;

/// The collaborators a migration run threads its output through.
#[derive(Clone)]
pub struct PostProcessingServices {
    pub context: Arc<dyn ContextAnalyzer>,
    pub formatter: Arc<dyn CodeFormatter>,
    pub documentor: Arc<dyn CodeDocumentor>,
    pub metrics: Arc<dyn MetricsAnalyzer>,
    pub security: Arc<dyn SecurityScanner>,
    pub performance: Arc<dyn PerformanceOptimizer>,
    pub testing: Arc<dyn TestRunner>,
    pub cost: Arc<dyn CostEstimator>,
    pub diff: Arc<dyn DiffGenerator>,
}

impl Default for PostProcessingServices {
    fn default() -> Self {
        Self {
            context: Arc::new(StaticContextAnalyzer::new()),
            formatter: Arc::new(BracketFormatter::new()),
            documentor: Arc::new(HeaderDocumentor::new()),
            metrics: Arc::new(MetricsReporter::new()),
            security: Arc::new(PatternSecurityScanner::new()),
            performance: Arc::new(HeuristicPerformanceOptimizer::new()),
            testing: Arc::new(PlaceholderTestRunner::new()),
            cost: Arc::new(LengthCostEstimator::new()),
            diff: Arc::new(LcsDiffGenerator::new()),
        }
    }
}
