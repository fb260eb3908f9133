//! Interactive TCP client for the matchbook server.
//!
//! Commands:
//!   ask <price> <volume>    submit a sell order
//!   bid <price> <volume>    submit a buy order
//!   book [limit]            request a snapshot
//!   watch [limit]           subscribe to book changes
//!   quit / exit

use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

use matchbook_core::{Side, TradeSymbol};
use matchbook_protocol::{
    codec, ClientRequest, NewOrderRequest, SnapshotRequest, SubscribeRequest, DEFAULT_BOOK_DEPTH,
};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("MATCHBOOK_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:9000".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected.");
    println!("Commands:");
    println!("  ask 60100 0.05");
    println!("  bid 59000.50 0.01");
    println!("  book 10");
    println!("  watch");
    println!("Type 'quit' or 'exit' to leave.\n");

    let (read_half, mut write_half) = stream.into_split();
    let mut responses = BufReader::new(read_half).lines();

    let stdin = io::stdin();

    loop {
        // Prompt
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            // EOF
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }

        let request = match parse_command(trimmed) {
            Some(request) => request,
            None => {
                eprintln!("Could not parse command. See the list above.");
                continue;
            }
        };

        let payload = codec::encode_request(&request)?;
        write_half.write_all(payload.as_bytes()).await?;
        write_half.write_all(b"\n").await?;

        // Read back everything that arrives shortly after; a small
        // timeout with no more data means we're done for this command.
        loop {
            match timeout(Duration::from_millis(300), responses.next_line()).await {
                Ok(Ok(Some(response))) => println!("<< {}", response),
                Ok(Ok(None)) => {
                    println!("Server closed the connection.");
                    return Ok(());
                }
                Ok(Err(err)) => {
                    eprintln!("Read error: {:?}", err);
                    return Ok(());
                }
                Err(_) => break,
            }
        }
    }

    Ok(())
}

fn parse_command(line: &str) -> Option<ClientRequest> {
    let mut tokens = line.split_whitespace();

    match tokens.next()? {
        "ask" | "bid" => {
            let side = if line.starts_with("ask") { Side::Ask } else { Side::Bid };
            let price = Decimal::from_str(tokens.next()?).ok()?;
            let volume = Decimal::from_str(tokens.next()?).ok()?;

            Some(ClientRequest::ProcessOrder(NewOrderRequest {
                price,
                volume,
                symbol: TradeSymbol::Btc,
                side,
            }))
        }
        "book" => {
            let limit = parse_limit(tokens.next())?;
            Some(ClientRequest::GetSnapshot(SnapshotRequest { limit }))
        }
        "watch" => {
            let limit = parse_limit(tokens.next())?;
            Some(ClientRequest::Subscribe(SubscribeRequest { limit }))
        }
        _ => None,
    }
}

fn parse_limit(token: Option<&str>) -> Option<usize> {
    match token {
        Some(raw) => raw.parse().ok(),
        None => Some(DEFAULT_BOOK_DEPTH),
    }
}
