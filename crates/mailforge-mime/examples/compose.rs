//! Composes a message with an attachment and prints it.
//!
//! Run with `RUST_LOG=mailforge_mime=trace cargo run --example compose` to
//! see the assembly steps.

use std::io::{self, Write};

use mailforge_mime::{Attachment, ComposeConfig, Message};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = ComposeConfig::builder().encode_headers(true).build();
    let mut message = Message::with_config(config)
        .from("dom@example.com")
        .sender_name("Dom")
        .to("test@example.com")
        .cc("team@example.com")
        .reply_to("help@example.com")
        .subject("Quarterly numbers")
        .html("<p>The numbers are attached.</p>")
        .attach(Attachment::from_bytes(
            "numbers.csv",
            "quarter,revenue\nQ1,100\nQ2,140\n",
        ));
    writeln!(message.plain_mut(), "The numbers are attached.")?;

    println!("Recipients: {}", message.recipients().join(", "));

    let bytes = message.build()?;
    io::stdout().write_all(&bytes)?;
    Ok(())
}
