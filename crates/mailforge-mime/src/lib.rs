//! # mailforge-mime
//!
//! MIME message composition for outgoing email.
//!
//! ## Features
//!
//! - **Envelope headers**: From, Mime-Version, Reply-To, Subject, To and Cc
//!   in a fixed, deterministic order
//! - **Alternative bodies**: plain-text and HTML parts inside a nested
//!   `multipart/alternative` section
//! - **Attachments**: base64-encoded parts with `Content-Disposition`
//!   metadata inside the outer `multipart/mixed` section
//! - **Pluggable boundaries**: random per build, or fixed for reproducible output
//!
//! The finished message is a byte buffer ready to hand to a mail transport.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailforge_mime::{Attachment, Message};
//!
//! let bytes = Message::new()
//!     .from("dom@example.com")
//!     .sender_name("Dom")
//!     .to("test@example.com")
//!     .subject("Report")
//!     .plain("Please find the report attached.")
//!     .html("<p>Please find the report attached.</p>")
//!     .attach(Attachment::new("report.pdf", std::fs::File::open("report.pdf")?))
//!     .build()?;
//! ```
//!
//! ### Deterministic Output
//!
//! ```ignore
//! use mailforge_mime::{ComposeConfig, Message};
//!
//! let config = ComposeConfig::builder()
//!     .fixed_boundaries("mixed", "alt")
//!     .build();
//!
//! let bytes = Message::with_config(config).to("a@example.com").build()?;
//! ```
//!
//! ### Streaming Bodies
//!
//! ```ignore
//! use std::io::Write;
//!
//! let mut message = Message::new().to("a@example.com");
//! write!(message.plain_mut(), "Hello, {name}!")?;
//! message.write_to(&mut socket_buffer)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod attachment;
mod body;
mod boundary;
mod config;
mod content_type;
mod error;
mod header;
mod message;
mod multipart;

pub mod encoding;

pub use attachment::{Attachment, write_attachment};
pub use body::{BodyPart, write_body};
pub use boundary::{BOUNDARY_LENGTH, Boundaries, BoundaryStrategy, random_boundary};
pub use config::{ComposeConfig, ComposeConfigBuilder, DEFAULT_LINE_LENGTH};
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::{Headers, sanitize};
pub use message::{AssemblyState, Message};
pub use multipart::MultipartWriter;
