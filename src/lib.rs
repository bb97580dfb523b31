//! lamekit - managed invocation of a bundled `lame` encoder
//!
//! The encoder ships as a read-only binary next to the running program.
//! [`Encoder`] stages a runnable copy of it once, runs it against the
//! caller's files, and reports a single [`InvocationResult`] per call. The
//! output file, not the exit status, decides whether a run succeeded.
//!
//! ```no_run
//! use lamekit::{Encoder, EncoderConfig, InputDescriptor, OutputDescriptor};
//!
//! # async fn example() -> lamekit::Result<()> {
//! let encoder = Encoder::new(EncoderConfig::default())?;
//! encoder
//!     .lame(
//!         InputDescriptor::new("/tmp/in.wav"),
//!         OutputDescriptor::with_postfix(".mp3").with_parameters(["-V", "2"]),
//!         |result| match result.error {
//!             None => println!("{} bytes", result.output_size),
//!             Some(e) => eprintln!("{e}\n{}", result.stderr),
//!         },
//!     )
//!     .await
//!     .ok();
//! # Ok(())
//! # }
//! ```

pub mod encoder;
pub mod request;

pub use encoder::Encoder;
pub use request::InvocationRequest;

pub use lamekit_core::{
    EncoderConfig, Error, ErrorKind, InputDescriptor, InvocationResult, OutputDescriptor, Result,
    Stage,
};
pub use lamekit_exec::{StagedExecutable, Stager};
