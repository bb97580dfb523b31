//! Encoder argument layout and command rendering.
//!
//! The encoder is always invoked as
//! `[...input.parameters, input.path, ...output.parameters, output_path]`.
//! The vector is passed to the process directly; [`render`] only produces
//! the quoted single-line form recorded for diagnostics.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::Path;

use lamekit_core::InputDescriptor;

/// Build the encoder argument vector.
pub fn compose(
    input: &InputDescriptor,
    output_params: &[String],
    output_path: &Path,
) -> Vec<OsString> {
    let mut args = Vec::with_capacity(input.parameters.len() + output_params.len() + 2);
    args.extend(input.parameters.iter().map(OsString::from));
    args.push(input.path.as_os_str().to_os_string());
    args.extend(output_params.iter().map(OsString::from));
    args.push(output_path.as_os_str().to_os_string());
    args
}

/// Render `program` and `args` as one POSIX shell command line.
///
/// Each token is quoted on its own, so whitespace, quotes and shell
/// metacharacters stay inside their argument.
pub fn render(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|token| quote(&token.to_string_lossy()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(token: &str) -> Cow<'_, str> {
    match shlex::try_quote(token) {
        Ok(quoted) => quoted,
        // A NUL byte cannot be expressed in a shell word.
        Err(_) => Cow::Owned(format!("{token:?}")),
    }
}
