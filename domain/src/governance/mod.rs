//! Decision governance domain
//!
//! A decision is proposed by any agent, voted on by the HEAD tier (CEO +
//! DAO), and either resolved by their agreement, advanced into a C-level
//! advisory round when they split, or escalated to a human when the round
//! budget or the round deadline runs out.
//!
//! ```text
//!            ┌──────────┐  approve+approve  ┌──────────┐
//!  propose ─►│ pending  │──────────────────►│ approved │
//!            │ round N  │  veto+veto        ├──────────┤
//!            │          │──────────────────►│ vetoed   │
//!            │          │  split, N >= max  ├──────────┤
//!            │          │──────────────────►│escalated │
//!            └──────────┘  deadline lapsed  └──────────┘
//!              │    ▲
//!   split, N<max    │ HEAD re-votes
//!              ▼    │
//!          C-level advisory round (N + 1)
//! ```

pub mod decision;
pub mod escalation;
pub mod transition;
pub mod vote;

pub use decision::{Decision, DecisionStatus, DecisionTier, Resolution};
pub use escalation::{Escalation, EscalationStatus, NotificationChannel};
pub use transition::{Transition, evaluate, human_override, lapse};
pub use vote::{HumanVerdict, VoteValue};
