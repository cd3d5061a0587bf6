pub mod batch;
pub mod columns;
pub mod config;
pub mod error;

pub use batch::*;
pub use columns::*;
pub use config::{load_dotenv, parse_delimiter, AnnotationConfig, AnnotationFormat, Config, CsvConfig};
pub use error::*;
