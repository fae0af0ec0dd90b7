//! Contract entry points.
//!
//! The host hands the contract a function name, positional string
//! arguments and a store session valid for this one call. The name is
//! resolved through [`Operation`], the arguments are checked against the
//! operation's arity, and the matching [`UserRoleStore`] method runs.

use rolestate_index::SecondaryIndex;
use rolestate_store::KeyValueStore;
use tracing::{debug, error, info};

use crate::config::ContractConfig;
use crate::error::{ContractError, ContractResult};
use crate::operation::Operation;
use crate::store::UserRoleStore;

/// Host-facing result of one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    pub const OK: u16 = 200;
    pub const ERROR: u16 = 500;

    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Self::ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

impl From<ContractResult<Vec<u8>>> for Response {
    fn from(result: ContractResult<Vec<u8>>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// The user-role contract.
#[derive(Clone, Debug)]
pub struct UserRoleContract {
    config: ContractConfig,
    index: SecondaryIndex,
}

impl UserRoleContract {
    pub fn new(config: ContractConfig) -> ContractResult<Self> {
        let index =
            SecondaryIndex::new(config.index_name.clone())?.with_sentinel(config.sentinel.clone())?;
        Ok(Self { config, index })
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn index(&self) -> &SecondaryIndex {
        &self.index
    }

    /// Instantiation hook. Nothing is written.
    pub fn init(&self) -> Response {
        info!(index = %self.index.namespace(), "user role contract initialized");
        Response::success(Vec::new())
    }

    /// User-role operations bound to `store`.
    pub fn roles<'a, K>(&'a self, store: &'a K) -> UserRoleStore<'a, K>
    where
        K: KeyValueStore + ?Sized,
    {
        UserRoleStore::new(store, &self.index)
    }

    /// Resolve `function`, check `args` and run the operation.
    pub fn invoke<K, S>(&self, store: &K, function: &str, args: &[S]) -> ContractResult<Vec<u8>>
    where
        K: KeyValueStore + ?Sized,
        S: AsRef<str>,
    {
        let operation: Operation = function.parse()?;
        operation.check_args(args)?;
        debug!(%operation, args = args.len(), "invoking");
        self.dispatch(store, operation, args)
    }

    /// Like [`invoke`](Self::invoke), folded into a [`Response`].
    pub fn handle<K, S>(&self, store: &K, function: &str, args: &[S]) -> Response
    where
        K: KeyValueStore + ?Sized,
        S: AsRef<str>,
    {
        let result = self.invoke(store, function, args);
        if let Err(e) = &result {
            error!(function, error = %e, "invocation failed");
        }
        result.into()
    }

    /// Run `operation`. `args` must already satisfy its arity.
    fn dispatch<K, S>(&self, store: &K, operation: Operation, args: &[S]) -> ContractResult<Vec<u8>>
    where
        K: KeyValueStore + ?Sized,
        S: AsRef<str>,
    {
        let roles = self.roles(store);
        match operation {
            Operation::CreateUserRole => roles
                .create(arg(operation, args, 0)?, arg(operation, args, 1)?)
                .map(|()| Vec::new()),
            Operation::GetUserRole => roles.get_by_id(arg(operation, args, 0)?),
            Operation::GetUserByRoleName => roles.get_by_indexed_name(arg(operation, args, 0)?),
            Operation::GetAllUserRoles => roles.get_all(),
        }
    }
}

fn arg<S: AsRef<str>>(operation: Operation, args: &[S], position: usize) -> ContractResult<&str> {
    args.get(position)
        .map(|value| value.as_ref())
        .ok_or_else(|| {
            ContractError::Validation(format!("missing argument {position} for {operation}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::UserRole;
    use rolestate_store::InMemoryStore;

    fn contract() -> UserRoleContract {
        UserRoleContract::new(ContractConfig::default()).unwrap()
    }

    fn roles_in(payload: &[u8]) -> Vec<UserRole> {
        serde_json::from_slice(payload).unwrap()
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    #[test]
    fn create_then_get_through_dispatch() {
        let store = InMemoryStore::new();
        let cc = contract();
        assert!(cc.invoke(&store, "CreateUserRole", &["u1", "admin"]).unwrap().is_empty());

        let payload = cc.invoke(&store, "GetUserRole", &["u1"]).unwrap();
        assert_eq!(UserRole::from_bytes(&payload).unwrap(), UserRole::new("u1", "admin"));
    }

    #[test]
    fn index_consistency_through_dispatch() {
        let store = InMemoryStore::new();
        let cc = contract();
        cc.invoke(&store, "CreateUserRole", &["u1", "admin"]).unwrap();
        cc.invoke(&store, "CreateUserRole", &["u2", "admin"]).unwrap();
        cc.invoke(&store, "CreateUserRole", &["u3", "viewer"]).unwrap();

        let payload = cc.invoke(&store, "GetUserByRoleName", &["admin"]).unwrap();
        assert_eq!(
            roles_in(&payload),
            vec![UserRole::new("u1", "admin"), UserRole::new("u2", "admin")]
        );
    }

    #[test]
    fn by_name_uses_first_argument_only() {
        let store = InMemoryStore::new();
        let cc = contract();
        cc.invoke(&store, "CreateUserRole", &["u1", "admin"]).unwrap();
        let payload = cc
            .invoke(&store, "GetUserByRoleName", &["admin", "viewer"])
            .unwrap();
        assert_eq!(roles_in(&payload).len(), 1);
    }

    #[test]
    fn get_all_on_empty_store() {
        let store = InMemoryStore::new();
        let payload = contract().invoke::<_, &str>(&store, "GetAllUserRoles", &[]).unwrap();
        assert_eq!(payload, b"[]");
    }

    #[test]
    fn get_all_ignores_arguments() {
        let store = InMemoryStore::new();
        let cc = contract();
        cc.invoke(&store, "CreateUserRole", &["u1", "admin"]).unwrap();
        let payload = cc.invoke(&store, "GetAllUserRoles", &["whatever"]).unwrap();
        assert_eq!(roles_in(&payload), vec![UserRole::new("u1", "admin")]);
    }

    #[test]
    fn create_with_one_argument_writes_nothing() {
        let store = InMemoryStore::new();
        let err = contract()
            .invoke(&store, "CreateUserRole", &["onlyid"])
            .unwrap_err();
        assert!(matches!(err, ContractError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn get_with_wrong_arity_fails() {
        let store = InMemoryStore::new();
        let cc = contract();
        assert!(matches!(
            cc.invoke::<_, &str>(&store, "GetUserRole", &[]).unwrap_err(),
            ContractError::Validation(_)
        ));
        assert!(matches!(
            cc.invoke(&store, "GetUserRole", &["u1", "u2"]).unwrap_err(),
            ContractError::Validation(_)
        ));
    }

    #[test]
    fn by_name_without_argument_fails() {
        let store = InMemoryStore::new();
        let err = contract()
            .invoke::<_, &str>(&store, "GetUserByRoleName", &[])
            .unwrap_err();
        assert!(matches!(err, ContractError::Validation(_)));
    }

    #[test]
    fn absent_id_is_empty_success() {
        // Absent ids are an empty payload by contract, not a failure.
        let store = InMemoryStore::new();
        let payload = contract().invoke(&store, "GetUserRole", &["never-created"]).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn empty_id_is_empty_success() {
        let store = InMemoryStore::new();
        let cc = contract();
        cc.invoke(&store, "CreateUserRole", &["u1", "admin"]).unwrap();
        assert_eq!(cc.invoke(&store, "GetUserRole", &[""]), Ok(Vec::new()));
    }

    #[test]
    fn unknown_operation_names_function() {
        let store = InMemoryStore::new();
        let err = contract()
            .invoke(&store, "DeleteUserRole", &["u1"])
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::UnknownOperation {
                function: "DeleteUserRole".into()
            }
        );
        assert!(err.to_string().contains("DeleteUserRole"));
    }

    #[test]
    fn owned_string_arguments() {
        let store = InMemoryStore::new();
        let args: Vec<String> = vec!["u1".into(), "admin".into()];
        contract().invoke(&store, "CreateUserRole", args.as_slice()).unwrap();
        assert_eq!(store.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Responses
    // -----------------------------------------------------------------------

    #[test]
    fn handle_wraps_success() {
        let store = InMemoryStore::new();
        let response = contract().handle(&store, "CreateUserRole", &["u1", "admin"]);
        assert!(response.is_ok());
        assert_eq!(response, Response::success(Vec::new()));
    }

    #[test]
    fn handle_wraps_failure() {
        let store = InMemoryStore::new();
        let response = contract().handle(&store, "DeleteUserRole", &["u1"]);
        assert_eq!(response.status, Response::ERROR);
        assert!(response.message.contains("DeleteUserRole"));
        assert!(response.payload.is_empty());
    }

    #[test]
    fn init_is_a_no_op() {
        let store = InMemoryStore::new();
        let response = contract().init();
        assert!(response.is_ok());
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    #[test]
    fn configured_index_namespace_is_used() {
        let store = InMemoryStore::new();
        let config = ContractConfig {
            index_name: "orgRoleIndex".into(),
            sentinel: b"+".to_vec(),
        };
        let cc = UserRoleContract::new(config).unwrap();
        cc.invoke(&store, "CreateUserRole", &["u1", "admin"]).unwrap();

        let key = rolestate_index::encode("orgRoleIndex", &["admin", "u1"]).unwrap();
        assert_eq!(store.get(&key).unwrap().unwrap(), b"+");
        assert_eq!(cc.index().namespace(), "orgRoleIndex");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ContractConfig {
            index_name: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            UserRoleContract::new(config).unwrap_err(),
            ContractError::Encoding(_)
        ));

        let config = ContractConfig {
            sentinel: Vec::new(),
            ..Default::default()
        };
        assert!(UserRoleContract::new(config).is_err());
    }
}
