// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Snapshots of the coordinator state.
//!
//! A `RoundReport` is produced after every round and handed to the monitors.
//! A `CoordinatorReport` is the on-demand summary returned by the coordinator's
//! reporting hook. Both carry one `AgentReport` per agent in stepping order.

use satchel_core::num::SolverNumeric;

/// The state of a single agent at the end of a round.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReport<T> {
    /// The name of the heuristic driving the agent.
    pub name: String,
    /// The score of the agent's current knapsack.
    pub score: T,
    /// Score gained per evaluation since the agent's last round boundary.
    pub improvement_ratio: f64,
}

impl<T> std::fmt::Display for AgentReport<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: score {}, improvement ratio {:.6}",
            self.name, self.score, self.improvement_ratio
        )
    }
}

/// Summary of one completed round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport<T> {
    /// One-based index of the round.
    pub round: u64,
    /// The best score after the round.
    pub best_score: T,
    /// Whether the round improved the best knapsack.
    pub improved: bool,
    /// Consecutive non-improving rounds, including this one.
    pub rounds_without_improvement: u64,
    /// Number of agents reset to the best knapsack after the round.
    pub redirections: usize,
    /// Evaluation counter value at the end of the round.
    pub evaluations: u64,
    /// Per-agent state before redirection.
    pub agents: Vec<AgentReport<T>>,
}

impl<T> std::fmt::Display for RoundReport<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Round {}: best {}{}, stagnation {}, redirections {}, evaluations {}",
            self.round,
            self.best_score,
            if self.improved { " (improved)" } else { "" },
            self.rounds_without_improvement,
            self.redirections,
            self.evaluations
        )
    }
}

/// Summary of the coordinator state, produced on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorReport<T> {
    /// The best score found so far.
    pub best_score: T,
    /// The weight of the best knapsack.
    pub best_weight: T,
    /// Consecutive non-improving rounds.
    pub rounds_without_improvement: u64,
    /// Number of evaluations performed so far.
    pub evaluations: u64,
    /// Per-agent state in stepping order. Empty before the agents are created.
    pub agents: Vec<AgentReport<T>>,
}

impl<T> std::fmt::Display for CoordinatorReport<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Coordinator Report:")?;
        writeln!(f, "  Best Score: {}", self.best_score)?;
        writeln!(f, "  Best Weight: {}", self.best_weight)?;
        writeln!(
            f,
            "  Rounds Without Improvement: {}",
            self.rounds_without_improvement
        )?;
        writeln!(f, "  Evaluations: {}", self.evaluations)?;
        if self.agents.is_empty() {
            return writeln!(f, "  (No agents)");
        }
        writeln!(f, "  Agents:")?;
        for agent in &self.agents {
            writeln!(f, "    {}", agent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str, score: i64, ratio: f64) -> AgentReport<i64> {
        AgentReport {
            name: name.to_string(),
            score,
            improvement_ratio: ratio,
        }
    }

    #[test]
    fn test_agent_report_display() {
        assert_eq!(
            format!("{}", agent("LocalSearch", 42, 0.25)),
            "LocalSearch: score 42, improvement ratio 0.250000"
        );
    }

    #[test]
    fn test_round_report_display_marks_improvement() {
        let report = RoundReport {
            round: 3,
            best_score: 17i64,
            improved: true,
            rounds_without_improvement: 0,
            redirections: 1,
            evaluations: 900,
            agents: vec![],
        };
        assert_eq!(
            format!("{}", report),
            "Round 3: best 17 (improved), stagnation 0, redirections 1, evaluations 900"
        );
    }

    #[test]
    fn test_coordinator_report_lists_agents() {
        let report = CoordinatorReport {
            best_score: 30i64,
            best_weight: 9,
            rounds_without_improvement: 4,
            evaluations: 1200,
            agents: vec![agent("LocalSearch", 30, 0.0), agent("TabuSearch", 12, -0.5)],
        };
        let rendered = format!("{}", report);
        assert!(rendered.contains("Best Score: 30"));
        assert!(rendered.contains("Rounds Without Improvement: 4"));
        assert!(rendered.contains("    LocalSearch: score 30"));
        assert!(rendered.contains("    TabuSearch: score 12, improvement ratio -0.500000"));
    }

    #[test]
    fn test_coordinator_report_without_agents() {
        let report = CoordinatorReport {
            best_score: 0i64,
            best_weight: 0,
            rounds_without_improvement: 0,
            evaluations: 0,
            agents: vec![],
        };
        assert!(format!("{}", report).contains("(No agents)"));
    }
}
