use std::fmt;

use crate::rule::{self, Evaluation, Rule};
use crate::{Amount, Command, Parameter, State};

/// The result of applying an action to the ATM
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    /// Only populated for successful balance queries
    pub result: Option<Amount>,
}

impl Outcome {
    const REJECTED: Outcome = Outcome { success: false, result: None };
}

/// One line of the result log
///
/// Formats as `Success=<bool> <state>` with the result value appended,
/// if there is one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    pub success: bool,
    /// The state of the session after the action was attempted
    pub state: State,
    pub result: Option<Amount>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Success={} {}", self.success, self.state)?;
        if let Some(result) = self.result {
            write!(f, " {}", result)?;
        }
        Ok(())
    }
}

/// What the trace hook gets to see after every call to [`Atm::apply`]
#[derive(Clone, Copy, Debug)]
pub struct Trace<'a> {
    pub action: &'a str,
    pub parameter: &'a Parameter,
    pub success: bool,
    pub state: State,
    pub balance: Amount,
}

type TraceHook = Box<dyn FnMut(&Trace<'_>) + Send>;

/// A single ATM session
///
/// All mutation goes through [`Atm::apply`], which takes the session
/// exclusively, so a rule that passed its guard is always committed before
/// anyone can look at the session again.
pub struct Atm {
    state: State,
    balance: Amount,
    password: String,
    trace: Option<TraceHook>,
}

impl Atm {
    /// Opens an unauthorized session for an account
    pub fn new(password: impl Into<String>, balance: Amount) -> Self {
        Self {
            state: State::INITIAL,
            balance,
            password: password.into(),
            trace: None,
        }
    }

    /// Installs a hook that is called after every applied action,
    /// no matter whether it succeeded
    pub fn with_trace<F>(mut self, hook: F) -> Self
        where F: FnMut(&Trace<'_>) + Send + 'static
    {
        self.trace = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Applies an action to the session
    ///
    /// Unknown actions and actions whose guard fails are rejected and leave
    /// the session untouched.
    pub fn apply(&mut self, action: &str, parameter: &Parameter) -> Outcome {
        let outcome = match rule::lookup(self.state, action) {
            Some(rule) => {
                let evaluation = rule.evaluate(parameter, &self.password, self.balance);
                self.commit(rule, evaluation)
            }
            None => Outcome::REJECTED,
        };

        if let Some(hook) = self.trace.as_mut() {
            hook(&Trace {
                action,
                parameter,
                success: outcome.success,
                state: self.state,
                balance: self.balance,
            });
        }

        outcome
    }

    /// Applies a command and reports the outcome together with the new state
    pub fn process(&mut self, command: &Command) -> Report {
        let outcome = self.apply(command.action(), command.parameter());
        Report {
            success: outcome.success,
            state: self.state,
            result: outcome.result,
        }
    }

    /// Processes all commands in order
    pub fn run<'a, I>(&mut self, commands: I) -> Vec<Report>
        where I: IntoIterator<Item = &'a Command>
    {
        commands
            .into_iter()
            .map(|command| self.process(command))
            .collect()
    }

    fn commit(&mut self, rule: &Rule, evaluation: Evaluation) -> Outcome {
        if !evaluation.passed {
            return Outcome::REJECTED;
        }

        self.balance = evaluation.balance;
        self.state = rule.next();

        Outcome {
            success: true,
            result: evaluation.result,
        }
    }
}

impl fmt::Debug for Atm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atm")
            .field("state", &self.state)
            .field("balance", &self.balance)
            .field("trace", &self.trace.is_some())
            .finish_non_exhaustive()
    }
}
