//! The transition table of the ATM.
//!
//! Every state owns an ordered list of [`Rule`]s. A rule pairs an action with
//! a pure effect function and the state the session moves to when the effect
//! reports success.

use std::fmt;

use crate::{Action, Amount, Parameter, State};

/// The proposed outcome of evaluating a rule against the session
///
/// Evaluations are only proposals. Nothing changes until the ATM commits
/// one that has `passed` set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the guard of the rule held
    pub passed: bool,
    /// The balance after the action
    pub balance: Amount,
    /// The value reported back to the caller, if the action has one
    pub result: Option<Amount>,
}

impl Evaluation {
    fn pass(balance: Amount) -> Self {
        Self { passed: true, balance, result: None }
    }

    fn reject(balance: Amount) -> Self {
        Self { passed: false, balance, result: None }
    }
}

/// Evaluates an action given (parameter, stored password, current balance)
pub type Effect = fn(&Parameter, &str, Amount) -> Evaluation;

/// A single entry of the transition table
#[derive(Clone, Copy)]
pub struct Rule {
    action: Action,
    effect: Effect,
    next: State,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("action", &self.action)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

impl Rule {
    const fn new(action: Action, effect: Effect, next: State) -> Self {
        Self { action, effect, next }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// The state the session is in after this rule passed
    pub fn next(&self) -> State {
        self.next
    }

    /// Runs the effect of the rule without touching any session
    pub fn evaluate(&self, parameter: &Parameter, password: &str, balance: Amount) -> Evaluation {
        (self.effect)(parameter, password, balance)
    }
}

static AUTHORIZED: [Rule; 5] = [
    Rule::new(Action::Login, refuse, State::Authorized),
    Rule::new(Action::Logout, accept, State::Unauthorized),
    Rule::new(Action::Deposit, deposit, State::Authorized),
    Rule::new(Action::Withdraw, withdraw, State::Authorized),
    Rule::new(Action::Balance, balance, State::Authorized),
];

static UNAUTHORIZED: [Rule; 5] = [
    Rule::new(Action::Login, login, State::Authorized),
    Rule::new(Action::Logout, refuse, State::Unauthorized),
    Rule::new(Action::Deposit, refuse, State::Unauthorized),
    Rule::new(Action::Withdraw, refuse, State::Unauthorized),
    Rule::new(Action::Balance, refuse, State::Unauthorized),
];

/// All rules applicable in `state`, in evaluation order
pub fn rules(state: State) -> &'static [Rule] {
    match state {
        State::Authorized => &AUTHORIZED,
        State::Unauthorized => &UNAUTHORIZED,
    }
}

/// Finds the first rule of `state` matching the action name
pub fn lookup(state: State, action: &str) -> Option<&'static Rule> {
    rules(state)
        .iter()
        .find(|rule| rule.action.name() == action)
}

fn refuse(_: &Parameter, _: &str, balance: Amount) -> Evaluation {
    Evaluation::reject(balance)
}

fn accept(_: &Parameter, _: &str, balance: Amount) -> Evaluation {
    Evaluation::pass(balance)
}

fn login(parameter: &Parameter, password: &str, balance: Amount) -> Evaluation {
    match parameter.text() {
        Some(attempt) if attempt == password => Evaluation::pass(balance),
        _ => Evaluation::reject(balance),
    }
}

fn deposit(parameter: &Parameter, _: &str, balance: Amount) -> Evaluation {
    parameter
        .amount()
        .and_then(|amount| balance.checked_add(amount))
        .map(Evaluation::pass)
        .unwrap_or_else(|| Evaluation::reject(balance))
}

fn withdraw(parameter: &Parameter, _: &str, balance: Amount) -> Evaluation {
    parameter
        .amount()
        .and_then(|amount| balance.checked_sub(amount))
        .map(Evaluation::pass)
        .unwrap_or_else(|| Evaluation::reject(balance))
}

fn balance(_: &Parameter, _: &str, balance: Amount) -> Evaluation {
    Evaluation {
        result: Some(balance),
        ..Evaluation::pass(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "1234";

    fn eval(state: State, action: &str, parameter: Parameter, balance: Amount) -> Evaluation {
        lookup(state, action)
            .expect("rule exists")
            .evaluate(&parameter, PASSWORD, balance)
    }

    #[test]
    fn every_state_covers_every_action_once() {
        for state in [State::Authorized, State::Unauthorized] {
            for action in Action::ALL {
                let matching = rules(state)
                    .iter()
                    .filter(|rule| rule.action() == action)
                    .count();
                assert_eq!(matching, 1, "{} in {}", action, state);
            }
        }
    }

    #[test]
    fn unknown_actions_have_no_rule() {
        assert!(lookup(State::Authorized, "transfer").is_none());
        assert!(lookup(State::Unauthorized, "transfer").is_none());
        assert!(lookup(State::Unauthorized, "").is_none());
    }

    #[test]
    fn destinations() {
        let next = |state, action| lookup(state, action).unwrap().next();
        assert_eq!(next(State::Unauthorized, "login"), State::Authorized);
        assert_eq!(next(State::Authorized, "logout"), State::Unauthorized);
        assert_eq!(next(State::Authorized, "login"), State::Authorized);
        assert_eq!(next(State::Authorized, "deposit"), State::Authorized);
        assert_eq!(next(State::Unauthorized, "balance"), State::Unauthorized);
    }

    #[test]
    fn login_checks_password() {
        assert!(eval(State::Unauthorized, "login", "1234".into(), 10).passed);
        assert!(!eval(State::Unauthorized, "login", "4321".into(), 10).passed);
        assert!(!eval(State::Unauthorized, "login", Parameter::Missing, 10).passed);
        assert!(!eval(State::Unauthorized, "login", Parameter::Amount(1234), 10).passed);
        assert!(!eval(State::Authorized, "login", "1234".into(), 10).passed);
    }

    #[test]
    fn unauthorized_refuses_everything_else() {
        for action in ["logout", "deposit", "withdraw", "balance"] {
            let evaluation = eval(State::Unauthorized, action, Parameter::Amount(1), 10);
            assert_eq!(evaluation, Evaluation::reject(10), "{}", action);
        }
    }

    #[test]
    fn deposit_adds() {
        assert_eq!(
            eval(State::Authorized, "deposit", Parameter::Amount(50), 100),
            Evaluation::pass(150),
        );
        assert!(!eval(State::Authorized, "deposit", "fifty".into(), 100).passed);
        assert!(!eval(State::Authorized, "deposit", Parameter::Amount(1), Amount::MAX).passed);
    }

    #[test]
    fn withdraw_boundary() {
        assert_eq!(
            eval(State::Authorized, "withdraw", Parameter::Amount(100), 100),
            Evaluation::pass(0),
        );
        assert_eq!(
            eval(State::Authorized, "withdraw", Parameter::Amount(101), 100),
            Evaluation::reject(100),
        );
    }

    #[test]
    fn balance_reports_result() {
        let evaluation = eval(State::Authorized, "balance", Parameter::Missing, 42);
        assert!(evaluation.passed);
        assert_eq!(evaluation.balance, 42);
        assert_eq!(evaluation.result, Some(42));
    }
}
