//! Scenario catalog and driver
//!
//! Synthetic payment scenarios are a small tagged catalog of pure data
//! descriptions, decoupled from timing: a `ScenarioScript` is an ordered
//! list of steps with associated delays, interpreted by one driver loop.
//! The delays are data for the display layer to pace playback with; the
//! driver never sleeps.
//!
//! Branch selection is driven by the deterministic RNG, so a given seed
//! replays the same scenario sequence. Every scenario routes its payment
//! through the policy evaluator; there is no bypass path.

use crate::models::agent::AgentRole;
use crate::models::event::TreasuryEvent;
use crate::rng::RngManager;
use crate::treasury::{PaymentOutcome, PaymentRequest, Treasury, TreasuryError};
use serde::{Deserialize, Serialize};

/// Probability that a cycle picks the dataset purchase over the compute
/// lease
const DATASET_BRANCH_PROBABILITY: f64 = 0.3;

/// Tagged catalog of synthetic payment scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Researcher buys a market dataset from the data provider
    DatasetPurchase { cost: i64 },

    /// Researcher leases GPU time from the compute provider
    ComputeLease { cost: i64 },
}

impl ScenarioKind {
    /// The fixed demo catalog
    pub fn catalog() -> Vec<ScenarioKind> {
        vec![
            ScenarioKind::DatasetPurchase { cost: 200 },
            ScenarioKind::ComputeLease { cost: 600 },
        ]
    }

    /// Payment amount (i64 MNEE base units)
    pub fn cost(&self) -> i64 {
        match self {
            ScenarioKind::DatasetPurchase { cost } => *cost,
            ScenarioKind::ComputeLease { cost } => *cost,
        }
    }

    /// Category the payment is proposed under
    pub fn category(&self) -> &'static str {
        match self {
            ScenarioKind::DatasetPurchase { .. } => "Dataset",
            ScenarioKind::ComputeLease { .. } => "Compute",
        }
    }

    /// Ledger description of the settled payment
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioKind::DatasetPurchase { .. } => "Auto-Payment: Market Data",
            ScenarioKind::ComputeLease { .. } => "Auto-Payment: GPU Cluster",
        }
    }

    /// Item named in the request narration
    pub fn item(&self) -> &'static str {
        match self {
            ScenarioKind::DatasetPurchase { .. } => "Q4 Market CSV",
            ScenarioKind::ComputeLease { .. } => "H100 GPU Instance (1hr)",
        }
    }

    /// Opening narration line
    pub fn announcement(&self) -> &'static str {
        match self {
            ScenarioKind::DatasetPurchase { .. } => {
                "Identifying gap in financial training data..."
            }
            ScenarioKind::ComputeLease { .. } => {
                "Training job pending. Evaluating compute resources..."
            }
        }
    }

    /// Role of the counterparty the payment goes to
    pub fn provider_role(&self) -> AgentRole {
        match self {
            ScenarioKind::DatasetPurchase { .. } => AgentRole::DataProvider,
            ScenarioKind::ComputeLease { .. } => AgentRole::ComputeProvider,
        }
    }

    /// Whether the provider issues an invoice before settlement
    fn has_invoice(&self) -> bool {
        matches!(self, ScenarioKind::DatasetPurchase { .. })
    }
}

/// Action carried by one scenario step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepAction {
    /// Source agent announces what it is about to do
    Announce,

    /// Source agent asks the provider for the item
    Request,

    /// Provider issues an invoice
    Invoice,

    /// Payment is submitted through the policy evaluator and settled
    Settle,
}

/// One step of a scenario: an action plus the display delay preceding it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Milliseconds the display layer should wait before this step
    pub delay_ms: u64,
    pub action: StepAction,
}

/// A fully-routed scenario: variant, parties, and the ordered step list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioScript {
    pub kind: ScenarioKind,
    pub source_id: String,
    pub destination_id: String,
    pub steps: Vec<ScenarioStep>,
}

impl ScenarioScript {
    /// Build the step pipeline for a scenario variant
    ///
    /// Step delays pace the narration for playback.
    pub fn new(kind: ScenarioKind, source_id: String, destination_id: String) -> Self {
        let mut steps = vec![
            ScenarioStep {
                delay_ms: 0,
                action: StepAction::Announce,
            },
            ScenarioStep {
                delay_ms: 1_000,
                action: StepAction::Request,
            },
        ];
        if kind.has_invoice() {
            steps.push(ScenarioStep {
                delay_ms: 1_500,
                action: StepAction::Invoice,
            });
            steps.push(ScenarioStep {
                delay_ms: 0,
                action: StepAction::Settle,
            });
        } else {
            steps.push(ScenarioStep {
                delay_ms: 1_200,
                action: StepAction::Settle,
            });
        }
        Self {
            kind,
            source_id,
            destination_id,
            steps,
        }
    }
}

/// Drives synthetic payment attempts through the treasury
///
/// # Example
///
/// ```
/// use agent_treasury_core_rs::scenario::ScenarioDriver;
/// use agent_treasury_core_rs::{seed, Treasury};
///
/// let mut treasury = Treasury::new(seed::initial_agents());
/// let mut driver = ScenarioDriver::new(42);
///
/// let script = driver.next_script(&treasury).unwrap();
/// let outcome = driver.execute(&mut treasury, &script).unwrap();
/// assert!(outcome.is_some());
/// ```
pub struct ScenarioDriver {
    rng: RngManager,
}

impl ScenarioDriver {
    /// Create a driver with a deterministic seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RngManager::new(seed),
        }
    }

    /// Pick and route the next scenario
    ///
    /// Returns `None` when the roster has no researcher or no agent in the
    /// scenario's provider role.
    pub fn next_script(&mut self, treasury: &Treasury) -> Option<ScenarioScript> {
        let kind = if self.rng.chance(DATASET_BRANCH_PROBABILITY) {
            ScenarioKind::DatasetPurchase { cost: 200 }
        } else {
            ScenarioKind::ComputeLease { cost: 600 }
        };

        let source = treasury
            .state()
            .agents_ordered()
            .find(|a| a.role() == AgentRole::Researcher)?;
        let destination = treasury
            .state()
            .agents_ordered()
            .find(|a| a.role() == kind.provider_role())?;

        Some(ScenarioScript::new(
            kind,
            source.id().to_string(),
            destination.id().to_string(),
        ))
    }

    /// Interpret a script against the treasury, step by step
    ///
    /// Narration steps append to the log feed; the Settle step submits the
    /// payment through the policy evaluator. Returns the payment outcome
    /// if the script reached its Settle step.
    pub fn execute(
        &mut self,
        treasury: &mut Treasury,
        script: &ScenarioScript,
    ) -> Result<Option<PaymentOutcome>, TreasuryError> {
        let source_name = agent_name(treasury, &script.source_id)?;
        let destination_name = agent_name(treasury, &script.destination_id)?;

        let mut outcome = None;
        for step in &script.steps {
            match step.action {
                StepAction::Announce => {
                    treasury.log_event(TreasuryEvent::OpportunityIdentified {
                        agent_name: source_name.clone(),
                        message: script.kind.announcement().to_string(),
                    });
                }
                StepAction::Request => {
                    treasury.log_event(TreasuryEvent::PaymentRequested {
                        requester_name: source_name.clone(),
                        provider_name: destination_name.clone(),
                        item: script.kind.item().to_string(),
                    });
                }
                StepAction::Invoice => {
                    let invoice_no = self.rng.range(0, 10_000) as u32;
                    treasury.log_event(TreasuryEvent::InvoiceIssued {
                        provider_name: destination_name.clone(),
                        invoice_no,
                        amount: script.kind.cost(),
                    });
                }
                StepAction::Settle => {
                    outcome = Some(treasury.submit_payment(PaymentRequest {
                        from_agent_id: script.source_id.clone(),
                        to_agent_id: script.destination_id.clone(),
                        amount: script.kind.cost(),
                        category: script.kind.category().to_string(),
                        description: script.kind.description().to_string(),
                    })?);
                }
            }
        }
        Ok(outcome)
    }
}

fn agent_name(treasury: &Treasury, agent_id: &str) -> Result<String, TreasuryError> {
    treasury
        .state()
        .get_agent(agent_id)
        .map(|a| a.name().to_string())
        .ok_or_else(|| TreasuryError::UnknownAgent {
            id: agent_id.to_string(),
        })
}
