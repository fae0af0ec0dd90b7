//! The contract's dispatch table.
//!
//! Each invocable function is a variant of [`Operation`]; its wire name,
//! argument rule and handler are all resolved from the variant, so the
//! table can be enumerated and matched exhaustively.

use std::fmt;
use std::str::FromStr;

use crate::error::{ContractError, ContractResult};

/// A function the contract can be invoked with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Store a new user role and index it by name.
    CreateUserRole,
    /// Read one user role by id.
    GetUserRole,
    /// List the user roles with a given name.
    GetUserByRoleName,
    /// List every user role.
    GetAllUserRoles,
}

/// How many positional arguments an operation accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
            Self::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
            Self::Any => f.write_str("any number of"),
        }
    }
}

impl Operation {
    /// Every operation, in the order they are documented.
    pub const ALL: [Operation; 4] = [
        Operation::CreateUserRole,
        Operation::GetUserRole,
        Operation::GetUserByRoleName,
        Operation::GetAllUserRoles,
    ];

    /// The function name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateUserRole => "CreateUserRole",
            Self::GetUserRole => "GetUserRole",
            Self::GetUserByRoleName => "GetUserByRoleName",
            Self::GetAllUserRoles => "GetAllUserRoles",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Self::CreateUserRole => Arity::Exactly(2),
            Self::GetUserRole => Arity::Exactly(1),
            Self::GetUserByRoleName => Arity::AtLeast(1),
            Self::GetAllUserRoles => Arity::Any,
        }
    }

    /// Positional argument names, used in validation messages.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::CreateUserRole => &["id", "name"],
            Self::GetUserRole => &["id"],
            Self::GetUserByRoleName => &["name"],
            Self::GetAllUserRoles => &[],
        }
    }

    /// Check the argument count against [`Operation::arity`].
    pub fn check_args<S: AsRef<str>>(self, args: &[S]) -> ContractResult<()> {
        let arity = self.arity();
        if arity.accepts(args.len()) {
            return Ok(());
        }
        Err(ContractError::Validation(format!(
            "incorrect number of arguments for {self}: expecting {arity} ({}), got {}",
            self.parameters().join(", "),
            args.len()
        )))
    }

    /// `'A', 'B' or 'C'`, for the unknown-action message.
    pub fn expected_names() -> String {
        let quoted: Vec<String> = Self::ALL.iter().map(|op| format!("'{op}'")).collect();
        match quoted.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ContractError;

    fn from_str(function: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == function)
            .ok_or_else(|| ContractError::UnknownOperation {
                function: function.to_string(),
            })
    }
}
