// crates/symcalc-server/src/mcp/mod.rs
// MCP Server implementation

pub mod handler;
pub mod requests;

use crate::config::ServerConfig;
use crate::tools::{self, ResultFormatter, Stage, ToolResult};
use requests::{
    DifferentiateRequest, EvaluateRequest, IntegrateRequest, SolveEquationRequest, StatsRequest,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    tool, tool_router,
};
use std::time::Duration;

/// MCP Server state
#[derive(Clone)]
pub struct SymcalcServer {
    pub formatter: ResultFormatter,
    /// Deadline for a single computation
    pub timeout: Duration,
    tool_router: ToolRouter<Self>,
}

impl SymcalcServer {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            formatter: ResultFormatter::new(config.latex),
            timeout: config.timeout,
            tool_router: Self::tool_router(),
        }
    }

    /// Names of all tools exposed over MCP
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }

    pub async fn run_evaluate(&self, req: EvaluateRequest) -> ToolResult {
        let formatter = self.formatter;
        tools::run_blocking(Stage::Evaluate, self.timeout, move || {
            tools::evaluate(&formatter, &req.expression)
        })
        .await
    }

    pub async fn run_differentiate(&self, req: DifferentiateRequest) -> ToolResult {
        let formatter = self.formatter;
        tools::run_blocking(Stage::Differentiate, self.timeout, move || {
            tools::differentiate(&formatter, &req.expression, &req.variable, req.order)
        })
        .await
    }

    pub async fn run_integrate(&self, req: IntegrateRequest) -> ToolResult {
        let formatter = self.formatter;
        tools::run_blocking(Stage::Integrate, self.timeout, move || {
            tools::integrate_expr(
                &formatter,
                &req.expression,
                &req.variable,
                req.lower.as_deref(),
                req.upper.as_deref(),
            )
        })
        .await
    }

    pub async fn run_solve(&self, req: SolveEquationRequest) -> ToolResult {
        let formatter = self.formatter;
        tools::run_blocking(Stage::Solve, self.timeout, move || {
            tools::solve_equation(&formatter, &req.equation, &req.variable, &req.domain)
        })
        .await
    }

    pub async fn run_stats(&self, req: StatsRequest) -> ToolResult {
        let formatter = self.formatter;
        tools::run_blocking(Stage::Statistics, self.timeout, move || {
            tools::stats_expectation_variance(&formatter, &req.distribution, &req.params())
        })
        .await
    }
}

#[tool_router]
impl SymcalcServer {
    #[tool(description = "Evaluate an expression. Numeric when it has no free symbols (e.g. \"2+3*4\", \"sin(pi/3)\"), otherwise simplified.")]
    async fn evaluate(
        &self,
        Parameters(req): Parameters<EvaluateRequest>,
    ) -> Result<String, String> {
        self.run_evaluate(req).await.map_err(String::from)
    }

    #[tool(description = "Differentiate an expression with respect to a variable, optionally to a higher order.")]
    async fn differentiate(
        &self,
        Parameters(req): Parameters<DifferentiateRequest>,
    ) -> Result<String, String> {
        self.run_differentiate(req).await.map_err(String::from)
    }

    #[tool(description = "Integrate an expression. Give both lower and upper for a definite integral, neither for an antiderivative.")]
    async fn integrate_expr(
        &self,
        Parameters(req): Parameters<IntegrateRequest>,
    ) -> Result<String, String> {
        self.run_integrate(req).await.map_err(String::from)
    }

    #[tool(description = "Solve an equation (\"x^2 - 2 = 0\" or \"sin(x) = 1/2\") for a variable over the reals (R) or complexes (C).")]
    async fn solve_equation(
        &self,
        Parameters(req): Parameters<SolveEquationRequest>,
    ) -> Result<String, String> {
        self.run_solve(req).await.map_err(String::from)
    }

    #[tool(description = "Expectation and variance of a Uniform(a, b), Normal(mu, sigma) or Bernoulli(p) distribution.")]
    async fn stats_expectation_variance(
        &self,
        Parameters(req): Parameters<StatsRequest>,
    ) -> Result<String, String> {
        self.run_stats(req).await.map_err(String::from)
    }
}
