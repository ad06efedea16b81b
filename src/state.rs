use std::fmt;

/// The states an ATM session can be in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// The correct password has been entered
    Authorized,
    /// No one is logged in, or the last login attempt failed
    Unauthorized,
}

impl State {
    /// The state every new session starts in
    pub const INITIAL: State = State::Unauthorized;

    /// The lowercase name used in the result log
    pub fn name(&self) -> &'static str {
        match self {
            State::Authorized => "authorized",
            State::Unauthorized => "unauthorized",
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
