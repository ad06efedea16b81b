use std::fmt;

/// An amount of money, in whole units
pub type Amount = u64;

/// The actions the transition table knows about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Authenticate with the session password
    Login,
    /// End an authenticated session
    Logout,
    /// A credit to the account balance
    Deposit,
    /// A debit to the account balance
    Withdraw,
    /// A query of the current balance
    Balance,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Login,
        Action::Logout,
        Action::Deposit,
        Action::Withdraw,
        Action::Balance,
    ];

    /// The name of the action as it appears in the command stream
    pub fn name(&self) -> &'static str {
        match self {
            Action::Login => "login",
            Action::Logout => "logout",
            Action::Deposit => "deposit",
            Action::Withdraw => "withdraw",
            Action::Balance => "balance",
        }
    }

    /// Resolves a command name, if it names a known action
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// Whether the parameter of this action is read as an [`Amount`]
    pub fn takes_amount(&self) -> bool {
        matches!(self, Action::Deposit | Action::Withdraw)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The argument passed along with an action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parameter {
    /// An amount for deposits and withdrawals
    Amount(Amount),
    /// Any other token, e.g. a password
    Text(String),
    /// The command line carried no parameter
    Missing,
}

impl Parameter {
    pub fn amount(&self) -> Option<Amount> {
        match self {
            Parameter::Amount(amount) => Some(*amount),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Parameter::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Amount> for Parameter {
    fn from(amount: Amount) -> Self {
        Parameter::Amount(amount)
    }
}

impl From<&str> for Parameter {
    fn from(text: &str) -> Self {
        Parameter::Text(text.to_owned())
    }
}

impl From<String> for Parameter {
    fn from(text: String) -> Self {
        Parameter::Text(text)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Amount(amount) => write!(f, "{}", amount),
            Parameter::Text(text) => f.write_str(text),
            Parameter::Missing => f.write_str("-"),
        }
    }
}

/// A single line of the command stream
///
/// The action is kept as its raw name, since commands naming unknown
/// actions are valid input and simply get rejected by the ATM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    action: String,
    parameter: Parameter,
}

impl Command {
    pub fn new(action: impl Into<String>, parameter: impl Into<Parameter>) -> Self {
        Self {
            action: action.into(),
            parameter: parameter.into(),
        }
    }

    /// A command without a parameter
    pub fn bare(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            parameter: Parameter::Missing,
        }
    }

    /// The name of the requested action
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn parameter(&self) -> &Parameter {
        &self.parameter
    }
}
