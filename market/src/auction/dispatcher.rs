//! Text command front-end for the auction coordinator.

use std::fmt::Write as _;

use tracing::{debug, error};

use super::coordinator::{AuctionCoordinator, NotificationStatus};
use crate::error::{AuctionError, AuctionResult};
use crate::traits::{KeyValueStore, RpcTransport};

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `sell <name> <price>`
    Sell { name: String, price: u64 },
    /// `close <name>`
    Close { name: String },
    /// `bid <name> <price>`
    Bid { name: String, price: u64 },
}

impl Command {
    /// Parse one input line.
    ///
    /// The verb must be an exact token. Extra trailing tokens, a missing
    /// argument or a price that is not a non-negative integer all yield
    /// [`AuctionError::InvalidCommand`].
    pub fn parse(line: &str) -> AuctionResult<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["sell", name, price] => Ok(Self::Sell {
                name: (*name).to_string(),
                price: parse_price(price)?,
            }),
            ["close", name] => Ok(Self::Close {
                name: (*name).to_string(),
            }),
            ["bid", name, price] => Ok(Self::Bid {
                name: (*name).to_string(),
                price: parse_price(price)?,
            }),
            _ => Err(AuctionError::InvalidCommand(line.trim().to_string())),
        }
    }
}

fn parse_price(text: &str) -> AuctionResult<u64> {
    text.parse::<u64>()
        .map_err(|_| AuctionError::InvalidCommand(format!("'{text}' is not a valid price")))
}

/// What a dispatched command produced.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Lines to show the user, newline separated.
    pub message: String,
    /// The failure behind the message, if the command did not succeed.
    pub error: Option<AuctionError>,
}

impl DispatchOutcome {
    fn ok(message: String) -> Self {
        Self {
            message,
            error: None,
        }
    }

    fn failed(message: String, error: AuctionError) -> Self {
        Self {
            message,
            error: Some(error),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Turns text commands into coordinator calls and reports the outcome.
pub struct CommandDispatcher<S, T>
where
    S: KeyValueStore,
    T: RpcTransport,
{
    coordinator: AuctionCoordinator<S, T>,
}

impl<S, T> CommandDispatcher<S, T>
where
    S: KeyValueStore,
    T: RpcTransport,
{
    pub const fn new(coordinator: AuctionCoordinator<S, T>) -> Self {
        Self { coordinator }
    }

    pub const fn coordinator(&self) -> &AuctionCoordinator<S, T> {
        &self.coordinator
    }

    /// Run one input line to completion.
    pub async fn execute(&self, line: &str) -> DispatchOutcome {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                debug!("Ignoring input: {}", e);
                return DispatchOutcome::failed("Invalid command".to_string(), e);
            }
        };

        let outcome = match command {
            Command::Sell { name, price } => self.sell(&name, price).await,
            Command::Close { name } => self.close(&name).await,
            Command::Bid { name, price } => self.bid(&name, price).await,
        };

        if let Some(e) = outcome.error.as_ref().filter(|e| !e.is_rejection()) {
            error!("Command '{}' failed: {}", line.trim(), e);
        }
        outcome
    }

    async fn sell(&self, name: &str, price: u64) -> DispatchOutcome {
        match self.coordinator.open_auction(name, price).await {
            Ok(receipt) => {
                let mut message =
                    format!("Auction opened: {} for price ${}", receipt.name, receipt.price);
                append_notification(&mut message, &receipt.notification);
                DispatchOutcome::ok(message)
            }
            Err(e) => DispatchOutcome::failed(format!("Selling failed: {e}"), e),
        }
    }

    async fn close(&self, name: &str) -> DispatchOutcome {
        match self.coordinator.close_auction(name).await {
            Ok(receipt) => {
                let mut message = format!("Winning price is: ${}", receipt.winning_price);
                append_notification(&mut message, &receipt.notification);
                DispatchOutcome::ok(message)
            }
            Err(e @ AuctionError::NotFound(_)) => DispatchOutcome::failed(
                "Closing failed, product doesn't exist...".to_string(),
                e,
            ),
            Err(e) => DispatchOutcome::failed(format!("Closing failed: {e}"), e),
        }
    }

    async fn bid(&self, name: &str, price: u64) -> DispatchOutcome {
        let mut message = String::from("Bidding...");
        match self.coordinator.bid_product(name, price).await {
            Ok(receipt) => {
                let _ = write!(
                    message,
                    "\nCurrent price is: ${}\nBidding success, new price is: ${}",
                    receipt.previous, receipt.price
                );
                DispatchOutcome::ok(message)
            }
            Err(e @ AuctionError::BidTooLow { current, .. }) => {
                let _ = write!(
                    message,
                    "\nCurrent price is: ${current}\nBidding for less price is not allowed, price is: ${current}"
                );
                DispatchOutcome::failed(message, e)
            }
            Err(e @ AuctionError::NotFound(_)) => {
                message.push_str("\nBidding failed, product doesn't exist...");
                DispatchOutcome::failed(message, e)
            }
            Err(e) => {
                let _ = write!(message, "\nBidding failed: {e}");
                DispatchOutcome::failed(message, e)
            }
        }
    }
}

fn append_notification(message: &mut String, status: &NotificationStatus) {
    if let NotificationStatus::Failed(reason) = status {
        let _ = write!(message, "\nCoordinator was not notified: {reason}");
    }
}
