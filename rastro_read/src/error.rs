use rastro::DecodeError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{file}: {source}")]
    Decode {
        file: String,
        #[source]
        source: DecodeError,
    },

    #[error("{file}: the file does not start with an INIT record")]
    MissingInit { file: String },

    #[error("{file}: record at offset {offset} has no time reference")]
    MissingTimeReference { file: String, offset: usize },

    #[error("{file}: time of record at offset {offset} overflows 64 bits")]
    TimeOverflow { file: String, offset: usize },

    #[error("sync description, line {line}: {message}")]
    Sync { line: usize, message: String },
}
