use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use csv_async::{AsyncReaderBuilder, AsyncSerializer, Trim};
use futures::TryStreamExt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::{fs::File, io::AsyncWrite};
use tracing::{info, warn, Level};

use account_ledger::{AccountPolicy, Command, Directory};

/// A command type represented by the CSV field `type`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CsvCommandType {
    Open,
    Deposit,
    Withdraw,
    Transfer,
    Interest,
}

/// A command represented by a CSV row
#[derive(Debug, Deserialize)]
struct CsvCommand {
    #[serde(rename = "type")]
    command_type: CsvCommandType,
    account: String,
    amount: Option<Decimal>,
    owner: Option<String>,
    #[serde(rename = "kind")]
    account_type: Option<String>,
    target: Option<String>,
    rate: Option<Decimal>,
}

impl TryFrom<CsvCommand> for Command {
    type Error = anyhow::Error;

    fn try_from(row: CsvCommand) -> Result<Self> {
        let account = row.account;
        let missing = {
            let account = account.clone();
            move |field: &str| anyhow!("{field} is required for account {account}")
        };
        use CsvCommandType::*;
        Ok(match row.command_type {
            Open => Command::Open {
                owner: row.owner.unwrap_or_default(),
                account_type: row.account_type.ok_or_else(|| missing("kind"))?,
                initial_deposit: row.amount.unwrap_or(Decimal::ZERO),
                account,
            },
            Deposit => Command::Deposit {
                amount: row.amount.ok_or_else(|| missing("amount"))?,
                account,
            },
            Withdraw => Command::Withdraw {
                amount: row.amount.ok_or_else(|| missing("amount"))?,
                account,
            },
            Transfer => Command::Transfer {
                to: row.target.ok_or_else(|| missing("target"))?,
                amount: row.amount.ok_or_else(|| missing("amount"))?,
                from: account,
            },
            Interest => Command::Interest {
                rate: row.rate.ok_or_else(|| missing("rate"))?,
                account,
            },
        })
    }
}

/// Render an amount with exactly two decimal places
fn to_cents(amount: Decimal) -> Decimal {
    let mut amount = amount;
    amount.rescale(2);
    amount
}

/// A transaction history line
#[derive(Serialize)]
struct HistoryRow<'a> {
    account: &'a str,
    timestamp: DateTime<Utc>,
    label: String,
    amount: Decimal,
}

/// In-memory account ledger
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Ledger commands filename
    #[clap(value_parser, value_name = "COMMANDS_FILE", value_hint = clap::ValueHint::FilePath)]
    commands_filename: PathBuf,

    /// JSON file with the account policy
    #[clap(long, value_parser, value_name = "POLICY_FILE", value_hint = clap::ValueHint::FilePath)]
    policy: Option<PathBuf>,

    /// Write every account's transaction history to this CSV file
    #[clap(long, value_parser, value_name = "HISTORY_FILE", value_hint = clap::ValueHint::FilePath)]
    history: Option<PathBuf>,

    /// Log every applied operation
    #[clap(short, long)]
    verbose: bool,
}

async fn load_policy(path: Option<&PathBuf>) -> Result<AccountPolicy> {
    let Some(path) = path else {
        return Ok(AccountPolicy::default());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read policy from {}", path.display()))?;
    AccountPolicy::from_json(&json)
        .with_context(|| format!("Invalid policy in {}", path.display()))
}

async fn write_history<W: AsyncWrite + Unpin>(directory: &Directory, writer: W) -> Result<()> {
    let mut serializer = AsyncSerializer::from_writer(writer);
    for snapshot in directory.snapshots() {
        for tx in directory.history(&snapshot.account_number)? {
            serializer
                .serialize(HistoryRow {
                    account: &snapshot.account_number,
                    timestamp: tx.timestamp(),
                    label: tx.label(),
                    amount: to_cents(tx.amount()),
                })
                .await?;
        }
    }
    serializer.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let directory = Directory::new(load_policy(args.policy.as_ref()).await?);

    // stream commands file
    let commands_file = File::open(&args.commands_filename)
        .await
        .with_context(|| {
            format!(
                "Failed to read commands from {}",
                args.commands_filename.display()
            )
        })?;
    // create async csv deserializer
    let mut reader = AsyncReaderBuilder::new()
        .trim(Trim::All)
        .create_deserializer(commands_file);
    let records = reader.deserialize::<CsvCommand>();

    // apply commands in file order; rejected operations do not stop the run
    let mut rejected = 0usize;
    records
        .map_err(anyhow::Error::from)
        .try_for_each(|row| {
            let outcome = Command::try_from(row).map(|command| {
                let account = command.account().to_string();
                if let Err(err) = directory.apply(command) {
                    warn!(account = %account, error = %err, "operation rejected");
                    rejected += 1;
                }
            });
            futures::future::ready(outcome)
        })
        .await?;
    info!(
        accounts = directory.len(),
        opened = directory.opened(),
        rejected,
        "commands applied"
    );

    // print account summaries
    let mut stdout = AsyncSerializer::from_writer(tokio::io::stdout());
    for mut snapshot in directory.snapshots() {
        snapshot.balance = to_cents(snapshot.balance);
        stdout.serialize(snapshot).await?;
    }
    stdout.flush().await?;

    if let Some(path) = &args.history {
        let file = File::create(path)
            .await
            .with_context(|| format!("Failed to write history to {}", path.display()))?;
        write_history(&directory, file).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_ledger::{DirectoryError, ValidationError};
    use rust_decimal_macros::dec;

    const HEADER: &str = "type,account,amount,owner,kind,target,rate\n";

    async fn commands(rows: &str) -> Vec<Result<Command>> {
        let csv = format!("{HEADER}{rows}");
        let mut reader = AsyncReaderBuilder::new()
            .trim(Trim::All)
            .create_deserializer(csv.as_bytes());
        let records: Vec<CsvCommand> = reader
            .deserialize::<CsvCommand>()
            .try_collect()
            .await
            .unwrap();
        records.into_iter().map(Command::try_from).collect()
    }

    #[tokio::test]
    async fn rows_map_to_commands() {
        let parsed = commands(
            "open, 1000000001, 500, John Doe, savings, ,\n\
             deposit,1000000001,20.5,,,,\n\
             withdraw,1000000001,10,,,,\n\
             transfer,1000000001,100,,,1000000002,\n\
             interest,1000000001,,,,,0.02\n",
        )
        .await;
        let parsed: Vec<_> = parsed.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            parsed,
            vec![
                Command::Open {
                    account: "1000000001".to_string(),
                    owner: "John Doe".to_string(),
                    account_type: "savings".to_string(),
                    initial_deposit: dec!(500),
                },
                Command::Deposit {
                    account: "1000000001".to_string(),
                    amount: dec!(20.5),
                },
                Command::Withdraw {
                    account: "1000000001".to_string(),
                    amount: dec!(10),
                },
                Command::Transfer {
                    from: "1000000001".to_string(),
                    to: "1000000002".to_string(),
                    amount: dec!(100),
                },
                Command::Interest {
                    account: "1000000001".to_string(),
                    rate: dec!(0.02),
                },
            ]
        );
    }

    #[tokio::test]
    async fn open_without_amount_starts_empty() {
        let parsed = commands("open,1000000001,,John Doe,Checking,,\n").await;
        let command = parsed.into_iter().next().unwrap().unwrap();
        assert_eq!(
            command,
            Command::Open {
                account: "1000000001".to_string(),
                owner: "John Doe".to_string(),
                account_type: "Checking".to_string(),
                initial_deposit: Decimal::ZERO,
            }
        );
    }

    #[tokio::test]
    async fn open_without_owner_is_rejected_by_directory() {
        let parsed = commands("open,1000000001,100,,Savings,,\n").await;
        let command = parsed.into_iter().next().unwrap().unwrap();
        assert_eq!(
            Directory::default().apply(command),
            Err(DirectoryError::Validation(ValidationError::EmptyOwnerName))
        );
    }

    #[tokio::test]
    async fn missing_fields_fail() {
        let parsed = commands(
            "open,1000000001,100,John,,,\n\
             deposit,1000000001,,,,,\n\
             withdraw,1000000001,,,,,\n\
             transfer,1000000001,10,,,,\n\
             transfer,1000000001,,,,1000000002,\n\
             interest,1000000001,,,,,\n",
        )
        .await;
        let errors: Vec<_> = parsed
            .into_iter()
            .map(|command| command.unwrap_err().to_string())
            .collect();
        assert_eq!(
            errors,
            [
                "kind is required for account 1000000001",
                "amount is required for account 1000000001",
                "amount is required for account 1000000001",
                "target is required for account 1000000001",
                "amount is required for account 1000000001",
                "rate is required for account 1000000001",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_command_type_fails_to_parse() {
        let csv = format!("{HEADER}dispute,1000000001,,,,,\n");
        let mut reader = AsyncReaderBuilder::new().create_deserializer(csv.as_bytes());
        let records: std::result::Result<Vec<CsvCommand>, _> =
            reader.deserialize::<CsvCommand>().try_collect().await;
        assert!(records.is_err());
    }

    #[test]
    fn amounts_render_with_two_places() {
        assert_eq!(to_cents(dec!(800)).to_string(), "800.00");
        assert_eq!(to_cents(dec!(765.00)).to_string(), "765.00");
        assert_eq!(to_cents(dec!(-150.5)).to_string(), "-150.50");
    }
}
