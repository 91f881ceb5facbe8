use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Very little in `xamlscope` is allowed to fail. Incomplete markup is the normal input of a
/// completion request, so the parsers never report errors, and lookup misses are expressed as
/// `None` or empty results. Errors are reserved for the boundary with the outside world: loading
/// a target binary through a reflection provider and parsing assembly identities.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::Malformed`] - A display name or grant string could not be parsed
///
/// ## Provider Errors
/// - [`Error::TargetMissing`] - The target binary does not exist, no metadata is available
/// - [`Error::Provider`] - The reflection provider failed to load an assembly or type
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// ## Setup Errors
/// - [`Error::Pattern`] - A built-in search pattern failed to compile
///
/// ## Internal Errors
/// - [`Error::Error`] - Miscellaneous failures
///
/// # Examples
///
/// ```rust,no_run
/// use xamlscope::{Error, metadata::MetadataReader, metadata::provider::InMemoryProvider};
/// use std::path::Path;
///
/// let reader = MetadataReader::new(Box::new(InMemoryProvider::default()));
/// match reader.for_target_assembly(Path::new("bin/Debug/App.dll")) {
///     Ok(metadata) => println!("{} namespaces", metadata.namespaces().count()),
///     Err(Error::TargetMissing(path)) => println!("{} not built yet", path.display()),
///     Err(e) => println!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An input string did not have the expected shape.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The target binary does not exist on disk.
    ///
    /// This is the only fatal condition of the engine. Callers treat it as "no metadata
    /// available" and return no completions until the binary reappears.
    #[error("Target assembly does not exist - {}", .0.display())]
    TargetMissing(PathBuf),

    /// The reflection provider failed to load an assembly or a type.
    ///
    /// The metadata builder logs and skips these, a partial model is always preferred
    /// over no model at all.
    #[error("Reflection provider failure - {0}")]
    Provider(String),

    /// A built-in search pattern failed to compile.
    #[error("Invalid pattern - {0}")]
    Pattern(#[from] regex::Error),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while inspecting the target binary.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}
