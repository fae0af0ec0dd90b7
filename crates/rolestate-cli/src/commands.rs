use anyhow::Context;
use colored::Colorize;
use rolestate_contract::{Operation, UserRole, UserRoleContract};
use rolestate_store::FileStore;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(cli.config.as_deref(), cli.store.as_deref())?;
    let contract = UserRoleContract::new(config.contract.clone())?;

    let (function, args) = match cli.command {
        Command::Operations(_) => return cmd_operations(cli.format),
        Command::Init(_) => return cmd_init(&contract, &config),
        Command::Create(args) => (
            Operation::CreateUserRole.name().to_string(),
            vec![args.id, args.name],
        ),
        Command::Get(args) => (Operation::GetUserRole.name().to_string(), vec![args.id]),
        Command::ByName(args) => (
            Operation::GetUserByRoleName.name().to_string(),
            vec![args.name],
        ),
        Command::All(_) => (Operation::GetAllUserRoles.name().to_string(), Vec::new()),
        Command::Invoke(args) => (args.function, args.args),
    };

    let store = FileStore::open(&config.store_path)
        .with_context(|| format!("opening store {}", config.store_path.display()))?;
    let payload = contract.invoke(&store, &function, args.as_slice())?;
    render(cli.format, &function, &args, &payload)
}

fn cmd_init(contract: &UserRoleContract, config: &CliConfig) -> anyhow::Result<()> {
    let response = contract.init();
    anyhow::ensure!(response.is_ok(), "init failed: {}", response.message);
    println!("{} Contract initialized", "✓".green().bold());
    println!("  Index: {}", contract.index().namespace().cyan());
    println!("  Store: {}", config.store_path.display());
    Ok(())
}

fn cmd_operations(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let names: Vec<&str> = Operation::ALL.iter().map(|op| op.name()).collect();
            println!("{}", serde_json::to_string(&names)?);
        }
        OutputFormat::Text => {
            for op in Operation::ALL {
                let params = op.parameters().join(" ");
                println!(
                    "  {} {}  ({} args)",
                    op.name().bold(),
                    params.dimmed(),
                    op.arity()
                );
            }
        }
    }
    Ok(())
}

fn render(
    format: OutputFormat,
    function: &str,
    args: &[String],
    payload: &[u8],
) -> anyhow::Result<()> {
    let operation = function.parse::<Operation>()?;
    if format == OutputFormat::Json {
        println!("{}", String::from_utf8_lossy(payload));
        return Ok(());
    }

    match operation {
        Operation::CreateUserRole => {
            println!(
                "{} Created user role {} ({})",
                "✓".green().bold(),
                args[0].yellow(),
                args[1]
            );
        }
        Operation::GetUserRole => {
            if payload.is_empty() {
                println!("No user role stored at {}", args[0].yellow());
            } else {
                let role = UserRole::from_bytes(payload)?;
                print_roles(std::slice::from_ref(&role));
            }
        }
        Operation::GetUserByRoleName | Operation::GetAllUserRoles => {
            let roles: Vec<UserRole> =
                serde_json::from_slice(payload).context("decoding user role list")?;
            if roles.is_empty() {
                println!("No user roles.");
            } else {
                print_roles(&roles);
            }
        }
    }
    Ok(())
}

fn print_roles(roles: &[UserRole]) {
    let width = roles.iter().map(|r| r.id.len()).max().unwrap_or(0);
    for role in roles {
        println!("{:<width$}  {}", role.id.yellow(), role.name.cyan());
    }
}
