pub use self::{
    atm::{Atm, Outcome, Report, Trace},
    batch::{Batch, InputError},
    command::{Action, Amount, Command, Parameter},
    state::State,
};

mod atm;
mod batch;
mod command;
pub mod rule;
mod state;
