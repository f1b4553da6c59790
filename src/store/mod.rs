//! Constraint store.
//!
//! Holds the hard constraints (eligibility, capacity and load bounds) and
//! the soft objective over a [`Model`](crate::Model), and answers the
//! questions the search asks at every node:
//!
//! - which groups an assistant may still take ([`SearchState::legal_groups`]),
//! - whether a group already meets its minimum ([`SearchState::meets_minimum`]),
//! - the cost so far and an optimistic bound ([`SearchState::lower_bound`]).
//!
//! Mutations are recorded on a trail ([`TrailEntry`]) and undone on
//! backtrack; each costs O(1) apart from the "group became full"
//! (O(assistants)) and "assistant closed" (O(groups)) events.

mod assignment;
mod score;
mod state;
mod trail;

pub use assignment::Assignment;
pub use score::{Mode, Score};
pub use state::SearchState;
pub use trail::TrailEntry;
