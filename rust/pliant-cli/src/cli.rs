use clap::{Parser, ValueEnum};
use pliant_core::DocumentFormat;

#[derive(Parser, Debug)]
#[command(
    name = "pliant",
    version,
    about = "Convert a dynamically typed literal to a concrete type",
    allow_negative_numbers = true
)]
pub struct Cli {
    /// Type to convert into
    #[arg(value_enum)]
    pub target: Target,

    /// Input literal, read as a document unless --raw is given
    pub input: String,

    /// Treat INPUT as plain text
    #[arg(long)]
    pub raw: bool,

    /// Document format used to read INPUT
    #[arg(long, default_value = "json")]
    pub from: DocumentFormat,

    /// Separator for sequence targets (default: letter and digit runs)
    #[arg(long, env = "PLIANT_SEPARATOR")]
    pub separator: Option<String>,

    /// Exact text that means `true` for bool targets
    #[arg(long)]
    pub truthy: Option<String>,

    /// chrono pattern INPUT must match for time targets
    #[arg(long)]
    pub layout: Option<String>,

    /// chrono pattern used by the time-string target
    #[arg(long)]
    pub output_layout: Option<String>,

    /// Value returned for null input (string and numeric targets)
    #[arg(long)]
    pub default: Option<String>,

    /// Dot-separated path for the get target
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    #[value(name = "string")]
    Text,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Time,
    TimeString,
    Strings,
    Ints,
    Bools,
    Times,
    Map,
    Get,
}
